//! Workflow notes appended to an article's history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ArticleStatus, UserId};

/// Kind of workflow event a note records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Submission,
    Screening,
    ReturnToAuthor,
    StatusChange,
    Decision,
    ReviewInvitation,
    Publication,
}

impl NoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::Submission => "submission",
            NoteKind::Screening => "screening",
            NoteKind::ReturnToAuthor => "return_to_author",
            NoteKind::StatusChange => "status_change",
            NoteKind::Decision => "decision",
            NoteKind::ReviewInvitation => "review_invitation",
            NoteKind::Publication => "publication",
        }
    }
}

impl std::fmt::Display for NoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the article's ordered workflow log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// What happened
    #[serde(rename = "type")]
    pub kind: NoteKind,
    /// Who made the decision
    pub actor: UserId,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// Status before the event
    pub from: ArticleStatus,
    /// Status after the event (equal to `from` for non-transition notes)
    pub to: ArticleStatus,
    /// Event-specific data
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Note {
    /// Create a note stamped with the current time
    pub fn new(
        kind: NoteKind,
        actor: UserId,
        from: ArticleStatus,
        to: ArticleStatus,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            kind,
            actor,
            timestamp: Utc::now(),
            from,
            to,
            payload,
        }
    }

    /// Check if the note records a status change
    pub fn is_transition(&self) -> bool {
        self.from != self.to
    }
}
