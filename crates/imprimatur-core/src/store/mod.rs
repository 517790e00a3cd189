//! Repository abstraction for articles, assignments and reviews.
//!
//! The external store owns durability and uniqueness. The workflow relies
//! on it for one thing beyond plain reads and writes: conditional updates,
//! so that two requests starting from the same status cannot both succeed.

mod memory;

pub use memory::{InMemoryArticleStore, InMemoryAssignmentStore, InMemoryReviewStore};

use async_trait::async_trait;
use imprimatur_domain::{
    Article, ArticleId, ArticleStatus, ArticleUpdate, AssignmentFilter, AssignmentId,
    AssignmentPatch, AssignmentStatus, JournalId, Review, ReviewAssignment,
};
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    /// A conditional update found a different current state
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("article {article} has {active} active assignments, limit {limit}")]
    CapacityExceeded {
        article: ArticleId,
        active: usize,
        limit: usize,
    },

    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Article persistence
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Get an article, returning None if not found
    async fn get(&self, id: ArticleId) -> Result<Option<Article>, StoreError>;

    /// Store an article (upsert semantics)
    async fn save(&self, article: Article) -> Result<(), StoreError>;

    /// Articles of a journal currently in `status`
    async fn list_by_status(
        &self,
        journal: JournalId,
        status: ArticleStatus,
    ) -> Result<Vec<Article>, StoreError>;

    /// Apply `update` only if the article is still in `expected`.
    ///
    /// Returns the updated article, or `StoreError::Conflict` if the status
    /// has moved on.
    async fn update_if_status(
        &self,
        id: ArticleId,
        expected: ArticleStatus,
        update: ArticleUpdate,
    ) -> Result<Article, StoreError>;
}

/// Review assignment persistence
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn get(&self, id: AssignmentId) -> Result<Option<ReviewAssignment>, StoreError>;

    async fn list(&self, filter: &AssignmentFilter) -> Result<Vec<ReviewAssignment>, StoreError>;

    /// Insert all `assignments` for `article`, or none of them.
    ///
    /// Fails with `CapacityExceeded` if the article would end up with more
    /// than `limit` active assignments, and with `AlreadyExists` if a
    /// reviewer already holds an active assignment on it.
    async fn insert_within_limit(
        &self,
        article: ArticleId,
        assignments: Vec<ReviewAssignment>,
        limit: usize,
    ) -> Result<(), StoreError>;

    /// Set a new status if the assignment is still in `expected`
    async fn update_status(
        &self,
        id: AssignmentId,
        expected: AssignmentStatus,
        patch: AssignmentPatch,
    ) -> Result<ReviewAssignment, StoreError>;

    /// Delete an assignment
    async fn remove(&self, id: AssignmentId) -> Result<Option<ReviewAssignment>, StoreError>;
}

/// Review persistence
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn get_for_assignment(
        &self,
        assignment: AssignmentId,
    ) -> Result<Option<Review>, StoreError>;

    /// Insert a review; `AlreadyExists` if the assignment already has one
    async fn insert(&self, review: Review) -> Result<(), StoreError>;

    async fn list_for_assignments(
        &self,
        assignments: &[AssignmentId],
    ) -> Result<Vec<Review>, StoreError>;

    /// Delete the review of an assignment
    async fn remove_for_assignment(
        &self,
        assignment: AssignmentId,
    ) -> Result<Option<Review>, StoreError>;
}
