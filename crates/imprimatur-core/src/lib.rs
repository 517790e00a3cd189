//! Imprimatur Core - editorial workflow engine
//!
//! This crate decides which workflow steps are legal and who may take them:
//!
//! - **Workflow**: the article status machine with one transition table of
//!   (from, to, required permission, guard) rules
//! - **Screening**: pure evaluation of the editorial pre-check checklist
//! - **Review**: the 1-2 reviewer invitation lifecycle and the decision quorum
//! - **Store**: repository traits for articles, assignments and reviews, with
//!   in-memory implementations
//! - **Plagiarism**: the seam to the external scanning service
//! - **Config**: thresholds, quorum and deadlines
//!
//! # Flow
//!
//! ```text
//! caller → GrantResolver (may U do X in J?) → WorkflowMachine (legal? guards?) → ArticleStore (conditional update)
//! ```
//!
//! Nothing is persisted here beyond what the stores are told; every status
//! change is a single conditional update keyed on the status it started from.

pub mod config;
pub mod error;
pub mod plagiarism;
pub mod review;
pub mod screening;
pub mod service;
pub mod store;
pub mod workflow;

pub use config::{ConfigError, DecisionConfig, EditorialConfig, ReviewConfig};
pub use error::{EditorialError, Result};
pub use plagiarism::{refresh_checklist, DocumentRef, PlagiarismService, ScanId, ScanStatus};
pub use review::{InvitationResponse, ReviewerAssignments, MAX_REVIEWERS};
pub use screening::{ScreeningEvaluation, ScreeningRules};
pub use service::EditorialWorkflow;
pub use store::{
    ArticleStore, AssignmentStore, InMemoryArticleStore, InMemoryAssignmentStore,
    InMemoryReviewStore, ReviewStore, StoreError,
};
pub use workflow::{
    Decision, DecisionKind, Evidence, Guard, PlannedTransition, RevisionType, TransitionRequest,
    TransitionRule, WorkflowMachine, TRANSITIONS,
};
