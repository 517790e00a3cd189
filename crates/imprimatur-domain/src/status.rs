//! Article status values
//!
//! Primary path:
//! ```text
//! Draft → Submitted → Screening → UnderReview → DecisionPending → Accepted → InProduction → Published
//!                         ↓            ↕                 ↓
//!                ReturnedToAuthor  RevisionMinor/Major  Rejected
//! ```
//!
//! Which edges are legal, and who may take them, is decided by the workflow
//! transition table in `imprimatur-core`.

use serde::{Deserialize, Serialize};

/// The lifecycle status of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    /// Being prepared by the author, not visible to editors
    Draft,
    /// Submitted and waiting for the editorial office
    Submitted,
    /// Editorial pre-check in progress
    Screening,
    /// Sent back to the author after screening
    ReturnedToAuthor,
    /// Out with peer reviewers
    UnderReview,
    /// Author asked for minor changes
    RevisionMinor,
    /// Author asked for major changes
    RevisionMajor,
    /// Reviews are in, waiting for the chief editor
    DecisionPending,
    /// Accepted for publication
    Accepted,
    /// Rejected
    Rejected,
    /// Being typeset for an issue
    InProduction,
    /// Published in an issue
    Published,
}

impl ArticleStatus {
    /// Every status, in lifecycle order
    pub const ALL: [ArticleStatus; 12] = [
        ArticleStatus::Draft,
        ArticleStatus::Submitted,
        ArticleStatus::Screening,
        ArticleStatus::ReturnedToAuthor,
        ArticleStatus::UnderReview,
        ArticleStatus::RevisionMinor,
        ArticleStatus::RevisionMajor,
        ArticleStatus::DecisionPending,
        ArticleStatus::Accepted,
        ArticleStatus::Rejected,
        ArticleStatus::InProduction,
        ArticleStatus::Published,
    ];

    /// Check if the article can no longer change status
    pub fn is_terminal(&self) -> bool {
        matches!(self, ArticleStatus::Published | ArticleStatus::Rejected)
    }

    /// Check if the article is waiting on its author
    pub fn is_with_author(&self) -> bool {
        matches!(
            self,
            ArticleStatus::Draft
                | ArticleStatus::ReturnedToAuthor
                | ArticleStatus::RevisionMinor
                | ArticleStatus::RevisionMajor
        )
    }

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Submitted => "submitted",
            ArticleStatus::Screening => "screening",
            ArticleStatus::ReturnedToAuthor => "returned_to_author",
            ArticleStatus::UnderReview => "under_review",
            ArticleStatus::RevisionMinor => "revision_minor",
            ArticleStatus::RevisionMajor => "revision_major",
            ArticleStatus::DecisionPending => "decision_pending",
            ArticleStatus::Accepted => "accepted",
            ArticleStatus::Rejected => "rejected",
            ArticleStatus::InProduction => "in_production",
            ArticleStatus::Published => "published",
        }
    }

    /// Get a human-readable description of the status
    pub fn description(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "Draft, not yet submitted",
            ArticleStatus::Submitted => "Submitted, awaiting screening",
            ArticleStatus::Screening => "Editorial screening in progress",
            ArticleStatus::ReturnedToAuthor => "Returned to the author after screening",
            ArticleStatus::UnderReview => "Under peer review",
            ArticleStatus::RevisionMinor => "Minor revision requested",
            ArticleStatus::RevisionMajor => "Major revision requested",
            ArticleStatus::DecisionPending => "Awaiting editorial decision",
            ArticleStatus::Accepted => "Accepted for publication",
            ArticleStatus::Rejected => "Rejected",
            ArticleStatus::InProduction => "In production",
            ArticleStatus::Published => "Published",
        }
    }
}

impl Default for ArticleStatus {
    fn default() -> Self {
        ArticleStatus::Draft
    }
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown status name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown article status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for ArticleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArticleStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
