//! The article status machine
//!
//! `WorkflowMachine::plan` is synchronous and side-effect free: it either
//! returns the new status together with the note that records it, or the
//! reason the transition cannot happen. Persisting the plan is left to the
//! caller, which must do it with a conditional update on `from`.

use chrono::Utc;
use imprimatur_access::{Grant, Permissions};
use imprimatur_domain::{
    Article, ArticleStatus, ArticleUpdate, Note, PlagiarismResult, ScreeningChecklist,
};
use serde_json::{json, Value};

use super::decision::Decision;
use super::table::{rule, valid_targets, Guard, TransitionRule};
use crate::config::EditorialConfig;
use crate::error::{EditorialError, Result};

/// What the actor asks for
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    pub target: ArticleStatus,
    /// Required when returning an article to its author
    pub reason: Option<String>,
    /// Required for decision edges
    pub decision: Option<Decision>,
}

impl TransitionRequest {
    pub fn to(target: ArticleStatus) -> Self {
        Self {
            target,
            reason: None,
            decision: None,
        }
    }

    /// A decision request; the target follows from the decision kind
    pub fn decide(decision: Decision) -> Self {
        Self {
            target: decision.kind.target(),
            reason: None,
            decision: Some(decision),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Facts gathered by the caller that guards are checked against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    /// Screening checklist filled in by the editor
    pub checklist: Option<ScreeningChecklist>,
    /// Completed reviews of the article
    pub completed_reviews: u32,
}

impl Evidence {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn checklist(checklist: ScreeningChecklist) -> Self {
        Self {
            checklist: Some(checklist),
            completed_reviews: 0,
        }
    }

    pub fn reviews(completed: u32) -> Self {
        Self {
            checklist: None,
            completed_reviews: completed,
        }
    }
}

/// A checked transition, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTransition {
    pub from: ArticleStatus,
    pub to: ArticleStatus,
    pub note: Note,
    /// Scan figures recorded on the article when screening passes
    pub plagiarism: Option<PlagiarismResult>,
}

impl PlannedTransition {
    /// The article update that applies this transition
    pub fn into_update(self) -> ArticleUpdate {
        ArticleUpdate {
            plagiarism: self.plagiarism,
            ..ArticleUpdate::transition(self.to, self.note)
        }
    }
}

/// Decides which transitions are legal and what they record
#[derive(Debug, Clone, Default)]
pub struct WorkflowMachine {
    config: EditorialConfig,
}

impl WorkflowMachine {
    pub fn new(config: EditorialConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EditorialConfig {
        &self.config
    }

    /// Statuses reachable from `from` in one step
    pub fn targets(&self, from: ArticleStatus) -> Vec<ArticleStatus> {
        valid_targets(from)
    }

    /// Check a requested transition of `article` by the holder of `grant`.
    ///
    /// Checks run in a fixed order: an empty grant or a grant for another
    /// journal is denied before anything else, then the edge must exist,
    /// then the permission and author rules apply, and guards come last.
    pub fn plan(
        &self,
        article: &Article,
        grant: &Grant,
        request: &TransitionRequest,
        evidence: &Evidence,
    ) -> Result<PlannedTransition> {
        if grant.is_empty() || grant.journal != article.journal {
            return Err(EditorialError::PermissionDenied(format!(
                "user {} has no permissions for article {}",
                grant.user, article.id
            )));
        }

        let from = article.status;
        let to = request.target;
        let edge = rule(from, to).ok_or(EditorialError::IllegalTransition { from, to })?;

        let is_author = article.is_authored_by(&grant.user);
        Self::authorize(edge, grant, is_author)?;

        let payload = self.check_guard(edge, request, evidence)?;
        let plagiarism = match edge.guard {
            Guard::ScreeningPassed => evidence
                .checklist
                .as_ref()
                .and_then(ScreeningChecklist::plagiarism_result),
            _ => None,
        };
        Ok(PlannedTransition {
            from,
            to,
            note: Note::new(edge.note, grant.user, from, to, payload),
            plagiarism,
        })
    }

    fn authorize(edge: &TransitionRule, grant: &Grant, is_author: bool) -> Result<()> {
        grant.require(edge.action)?;
        match (edge.guard.is_editorial(), is_author) {
            (true, true) => Err(EditorialError::PermissionDenied(format!(
                "authors cannot move their own article from {} to {}",
                edge.from, edge.to
            ))),
            (false, false) => Err(EditorialError::PermissionDenied(format!(
                "only the author can move the article from {} to {}",
                edge.from, edge.to
            ))),
            _ => Ok(()),
        }
    }

    /// Check the edge's guard and build the note payload
    fn check_guard(
        &self,
        edge: &TransitionRule,
        request: &TransitionRequest,
        evidence: &Evidence,
    ) -> Result<Value> {
        if edge.guard.needs_quorum() {
            self.check_quorum(evidence.completed_reviews)?;
        }

        match edge.guard {
            Guard::ScreeningPassed => {
                let checklist = evidence
                    .checklist
                    .as_ref()
                    .ok_or_else(|| EditorialError::invalid("screening checklist is required"))?;
                let evaluation = self.config.screening.evaluate(checklist);
                if !evaluation.passed {
                    return Err(EditorialError::ValidationFailed(evaluation.problems));
                }
                Ok(json!({
                    "decision": "allow",
                    "checklist": checklist,
                    "problems": evaluation.problems,
                }))
            }
            Guard::Reason => {
                let reason = non_empty(request.reason.as_deref())
                    .ok_or_else(|| EditorialError::invalid("a reason is required"))?;
                Ok(json!({ "decision": "return", "reason": reason }))
            }
            Guard::Decision { .. } => {
                let decision = request
                    .decision
                    .as_ref()
                    .ok_or_else(|| EditorialError::invalid("a decision is required"))?;
                if decision.kind.target() != edge.to {
                    return Err(EditorialError::invalid(format!(
                        "decision {:?} does not lead to {}",
                        decision.kind, edge.to
                    )));
                }
                let deadline = decision.effective_deadline(&self.config.decision, Utc::now());
                Ok(json!({
                    "decision": decision.kind,
                    "revision_type": decision.kind.revision_type(),
                    "deadline": deadline,
                    "comment": decision.comment,
                }))
            }
            Guard::None | Guard::Author | Guard::Quorum => {
                Ok(match non_empty(request.reason.as_deref()) {
                    Some(reason) => json!({ "reason": reason }),
                    None => json!({}),
                })
            }
        }
    }

    fn check_quorum(&self, completed: u32) -> Result<()> {
        let required = self.config.review.quorum;
        if completed < required {
            return Err(EditorialError::QuorumNotMet {
                required,
                completed,
            });
        }
        Ok(())
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Permission needed to take the edge, if it exists
pub fn required_permission(from: ArticleStatus, to: ArticleStatus) -> Option<Permissions> {
    rule(from, to).map(|edge| edge.action)
}
