//! Error types for permission resolution

use imprimatur_domain::{JournalId, UserId};
use thiserror::Error;

use crate::permissions::Permissions;

/// Errors from grant resolution and permission checks
#[derive(Debug, Clone, Error)]
pub enum AccessError {
    /// The grant lacks a required action
    #[error("user {user} lacks {required} in journal {journal}")]
    PermissionDenied {
        user: UserId,
        journal: JournalId,
        required: Permissions,
    },

    /// The session could not be mapped to a user
    #[error("session is not authenticated")]
    Unauthenticated,

    /// The journal does not exist
    #[error("journal not found: {0}")]
    JournalNotFound(JournalId),

    /// Role name not in the role table
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// A membership or identity lookup failed
    #[error("upstream lookup failed: {0}")]
    Upstream(String),
}

impl AccessError {
    /// Only collaborator failures are worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, AccessError::Upstream(_))
    }
}
