//! Error types for imprimatur-core
//!
//! Each variant maps to one logical response code for callers.

use imprimatur_access::AccessError;
use imprimatur_domain::{ArticleId, ArticleStatus, AssignmentTransitionError};
use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, EditorialError>;

/// Main error type for workflow operations
#[derive(Debug, Clone, Error)]
pub enum EditorialError {
    /// Target status is not reachable from the current one
    #[error("Illegal transition from {from} to {to}")]
    IllegalTransition {
        from: ArticleStatus,
        to: ArticleStatus,
    },

    /// Review assignment status change not allowed by its lifecycle
    #[error("Illegal assignment transition: {0}")]
    IllegalAssignmentTransition(#[from] AssignmentTransitionError),

    /// The actor's grant lacks the required action
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Checklist or request validation failed; all problems are listed
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// Not enough completed reviews for a decision
    #[error("Quorum not met: {completed} of {required} reviews completed")]
    QuorumNotMet { required: u32, completed: u32 },

    /// The article already has the maximum number of active reviewers
    #[error("Assignment limit exceeded for article {article}: {active} active, limit {limit}")]
    AssignmentLimitExceeded {
        article: ArticleId,
        active: usize,
        limit: usize,
    },

    /// A collaborator failed or timed out; nothing was changed
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Another request changed the entity first
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl EditorialError {
    /// Logical response code for this error
    pub fn code(&self) -> &'static str {
        match self {
            EditorialError::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            EditorialError::IllegalAssignmentTransition(_) => "ILLEGAL_TRANSITION",
            EditorialError::PermissionDenied(_) => "FORBIDDEN",
            EditorialError::ValidationFailed(_) => "VALIDATION_FAILED",
            EditorialError::QuorumNotMet { .. } => "QUORUM_NOT_MET",
            EditorialError::AssignmentLimitExceeded { .. } => "ASSIGNMENT_LIMIT_EXCEEDED",
            EditorialError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            EditorialError::NotFound(_) => "NOT_FOUND",
            EditorialError::Conflict(_) => "CONFLICT",
        }
    }

    /// Only collaborator failures may be retried by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, EditorialError::UpstreamUnavailable(_))
    }

    /// Problems carried by a validation failure
    pub fn problems(&self) -> &[String] {
        match self {
            EditorialError::ValidationFailed(problems) => problems,
            _ => &[],
        }
    }

    /// Shorthand for a single-problem validation failure
    pub fn invalid(problem: impl Into<String>) -> Self {
        EditorialError::ValidationFailed(vec![problem.into()])
    }
}

impl From<AccessError> for EditorialError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::PermissionDenied { .. } | AccessError::Unauthenticated => {
                EditorialError::PermissionDenied(err.to_string())
            }
            AccessError::JournalNotFound(journal) => {
                EditorialError::NotFound(format!("journal {}", journal))
            }
            AccessError::UnknownRole(_) => EditorialError::ValidationFailed(vec![err.to_string()]),
            AccessError::Upstream(message) => EditorialError::UpstreamUnavailable(message),
        }
    }
}

impl From<StoreError> for EditorialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => EditorialError::NotFound(what),
            StoreError::Conflict(message) => EditorialError::Conflict(message),
            StoreError::AlreadyExists(what) => {
                EditorialError::ValidationFailed(vec![format!("{} already exists", what)])
            }
            StoreError::CapacityExceeded {
                article,
                active,
                limit,
            } => EditorialError::AssignmentLimitExceeded {
                article,
                active,
                limit,
            },
            StoreError::Unavailable(message) => EditorialError::UpstreamUnavailable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imprimatur_domain::{JournalId, UserId};

    #[test]
    fn test_error_codes() {
        let illegal = EditorialError::IllegalTransition {
            from: ArticleStatus::Draft,
            to: ArticleStatus::Published,
        };
        assert_eq!(illegal.code(), "ILLEGAL_TRANSITION");
        assert_eq!(EditorialError::PermissionDenied("x".into()).code(), "FORBIDDEN");
        assert_eq!(EditorialError::invalid("x").code(), "VALIDATION_FAILED");
        assert_eq!(
            EditorialError::QuorumNotMet {
                required: 2,
                completed: 1
            }
            .code(),
            "QUORUM_NOT_MET"
        );
        assert_eq!(
            EditorialError::AssignmentLimitExceeded {
                article: ArticleId::new(),
                active: 2,
                limit: 2
            }
            .code(),
            "ASSIGNMENT_LIMIT_EXCEEDED"
        );
    }

    #[test]
    fn test_only_upstream_is_retryable() {
        assert!(EditorialError::UpstreamUnavailable("timeout".into()).is_retryable());
        assert!(!EditorialError::Conflict("raced".into()).is_retryable());
        assert!(!EditorialError::invalid("bad").is_retryable());
    }

    #[test]
    fn test_validation_lists_all_problems() {
        let err = EditorialError::ValidationFailed(vec!["first".into(), "second".into()]);
        assert_eq!(err.problems().len(), 2);
        assert_eq!(err.to_string(), "Validation failed: first; second");
    }

    #[test]
    fn test_access_error_mapping() {
        let denied: EditorialError = AccessError::PermissionDenied {
            user: UserId::new(),
            journal: JournalId::new(),
            required: imprimatur_access::Permissions::ISSUE_PUBLISH,
        }
        .into();
        assert_eq!(denied.code(), "FORBIDDEN");

        let upstream: EditorialError = AccessError::Upstream("down".into()).into();
        assert!(upstream.is_retryable());
    }
}
