//! Articles and the update shape sent to the article store

use serde::{Deserialize, Serialize};

use crate::{ArticleId, ArticleStatus, JournalId, Note, PlagiarismResult, UserId};

/// A manuscript submitted to a journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub journal: JournalId,
    pub title: String,
    pub author: UserId,
    pub status: ArticleStatus,
    /// Ordered workflow log, oldest first
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub plagiarism: Option<PlagiarismResult>,
}

impl Article {
    /// Create a new draft article
    pub fn new(journal: JournalId, author: UserId, title: impl Into<String>) -> Self {
        Self {
            id: ArticleId::new(),
            journal,
            title: title.into(),
            author,
            status: ArticleStatus::Draft,
            notes: Vec::new(),
            plagiarism: None,
        }
    }

    /// Start the article in a given status (e.g. created directly as submitted)
    pub fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = status;
        self
    }

    /// Check if the given user wrote this article
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author == user
    }

    /// Most recent note, if any
    pub fn last_note(&self) -> Option<&Note> {
        self.notes.last()
    }

    /// Apply an update in place
    pub fn apply(&mut self, update: ArticleUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(plagiarism) = update.plagiarism {
            self.plagiarism = Some(plagiarism);
        }
        self.notes.extend(update.notes_append);
    }
}

/// Partial update of an article: `{status?, title?, plagiarism?, notes_append?}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plagiarism: Option<PlagiarismResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes_append: Vec<Note>,
}

impl ArticleUpdate {
    /// A status change together with the note that records it
    pub fn transition(status: ArticleStatus, note: Note) -> Self {
        Self {
            status: Some(status),
            title: None,
            plagiarism: None,
            notes_append: vec![note],
        }
    }

    /// Append a note without changing status
    pub fn note(note: Note) -> Self {
        Self {
            status: None,
            title: None,
            plagiarism: None,
            notes_append: vec![note],
        }
    }
}
