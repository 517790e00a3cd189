//! Article workflow state machine

mod decision;
mod machine;
mod table;

pub use decision::{Decision, DecisionKind, RevisionType};
pub use machine::{
    required_permission, Evidence, PlannedTransition, TransitionRequest, WorkflowMachine,
};
pub use table::{rule, rules_from, valid_targets, Guard, TransitionRule, TRANSITIONS};
