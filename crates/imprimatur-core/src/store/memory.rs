//! In-memory store implementations.
//!
//! All state is held in maps behind `RwLock`s and lost on drop. Each store
//! can be switched to fail every call, to exercise upstream failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use imprimatur_domain::{
    Article, ArticleId, ArticleStatus, ArticleUpdate, AssignmentFilter, AssignmentId,
    AssignmentPatch, AssignmentStatus, JournalId, Review, ReviewAssignment,
};
use tokio::sync::RwLock;

use super::{ArticleStore, AssignmentStore, ReviewStore, StoreError};

#[derive(Debug, Default)]
struct Availability(AtomicBool);

impl Availability {
    fn set_unavailable(&self, unavailable: bool) {
        self.0.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self, store: &str) -> Result<(), StoreError> {
        if self.0.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(format!("{} store unavailable", store)))
        } else {
            Ok(())
        }
    }
}

/// In-memory article store
#[derive(Debug, Default)]
pub struct InMemoryArticleStore {
    articles: RwLock<HashMap<ArticleId, Article>>,
    availability: Availability,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with `StoreError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.availability.set_unavailable(unavailable);
    }
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn get(&self, id: ArticleId) -> Result<Option<Article>, StoreError> {
        self.availability.check("article")?;
        Ok(self.articles.read().await.get(&id).cloned())
    }

    async fn save(&self, article: Article) -> Result<(), StoreError> {
        self.availability.check("article")?;
        self.articles.write().await.insert(article.id, article);
        Ok(())
    }

    async fn list_by_status(
        &self,
        journal: JournalId,
        status: ArticleStatus,
    ) -> Result<Vec<Article>, StoreError> {
        self.availability.check("article")?;
        let articles = self.articles.read().await;
        Ok(articles
            .values()
            .filter(|a| a.journal == journal && a.status == status)
            .cloned()
            .collect())
    }

    async fn update_if_status(
        &self,
        id: ArticleId,
        expected: ArticleStatus,
        update: ArticleUpdate,
    ) -> Result<Article, StoreError> {
        self.availability.check("article")?;
        let mut articles = self.articles.write().await;
        let article = articles
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("article {}", id)))?;
        if article.status != expected {
            return Err(StoreError::Conflict(format!(
                "article {} is {}, expected {}",
                id, article.status, expected
            )));
        }
        article.apply(update);
        Ok(article.clone())
    }
}

/// In-memory review assignment store
#[derive(Debug, Default)]
pub struct InMemoryAssignmentStore {
    assignments: RwLock<HashMap<AssignmentId, ReviewAssignment>>,
    availability: Availability,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.availability.set_unavailable(unavailable);
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn get(&self, id: AssignmentId) -> Result<Option<ReviewAssignment>, StoreError> {
        self.availability.check("assignment")?;
        Ok(self.assignments.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &AssignmentFilter) -> Result<Vec<ReviewAssignment>, StoreError> {
        self.availability.check("assignment")?;
        let assignments = self.assignments.read().await;
        let mut matching: Vec<_> = assignments
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        matching.sort_by_key(|a| a.created_at);
        Ok(matching)
    }

    async fn insert_within_limit(
        &self,
        article: ArticleId,
        new_assignments: Vec<ReviewAssignment>,
        limit: usize,
    ) -> Result<(), StoreError> {
        self.availability.check("assignment")?;
        let mut assignments = self.assignments.write().await;
        let active: Vec<&ReviewAssignment> = assignments
            .values()
            .filter(|a| a.article == article && a.status.is_active())
            .collect();

        if let Some(duplicate) = new_assignments
            .iter()
            .find(|new| active.iter().any(|a| a.reviewer == new.reviewer))
        {
            return Err(StoreError::AlreadyExists(format!(
                "active assignment of reviewer {} on article {}",
                duplicate.reviewer, article
            )));
        }

        if active.len() + new_assignments.len() > limit {
            return Err(StoreError::CapacityExceeded {
                article,
                active: active.len(),
                limit,
            });
        }

        for assignment in new_assignments {
            assignments.insert(assignment.id, assignment);
        }
        Ok(())
    }

    async fn update_status(
        &self,
        id: AssignmentId,
        expected: AssignmentStatus,
        patch: AssignmentPatch,
    ) -> Result<ReviewAssignment, StoreError> {
        self.availability.check("assignment")?;
        let mut assignments = self.assignments.write().await;
        let assignment = assignments
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("assignment {}", id)))?;
        if assignment.status != expected {
            return Err(StoreError::Conflict(format!(
                "assignment {} is {}, expected {}",
                id, assignment.status, expected
            )));
        }
        let mut updated = assignment.clone();
        updated
            .transition_to(patch.status)
            .map_err(|e| StoreError::Conflict(e.to_string()))?;
        *assignment = updated.clone();
        Ok(updated)
    }

    async fn remove(&self, id: AssignmentId) -> Result<Option<ReviewAssignment>, StoreError> {
        self.availability.check("assignment")?;
        Ok(self.assignments.write().await.remove(&id))
    }
}

/// In-memory review store, keyed by assignment
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    reviews: RwLock<HashMap<AssignmentId, Review>>,
    availability: Availability,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.availability.set_unavailable(unavailable);
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn get_for_assignment(
        &self,
        assignment: AssignmentId,
    ) -> Result<Option<Review>, StoreError> {
        self.availability.check("review")?;
        Ok(self.reviews.read().await.get(&assignment).cloned())
    }

    async fn insert(&self, review: Review) -> Result<(), StoreError> {
        self.availability.check("review")?;
        let mut reviews = self.reviews.write().await;
        if reviews.contains_key(&review.assignment) {
            return Err(StoreError::AlreadyExists(format!(
                "review for assignment {}",
                review.assignment
            )));
        }
        reviews.insert(review.assignment, review);
        Ok(())
    }

    async fn list_for_assignments(
        &self,
        assignments: &[AssignmentId],
    ) -> Result<Vec<Review>, StoreError> {
        self.availability.check("review")?;
        let reviews = self.reviews.read().await;
        Ok(assignments
            .iter()
            .filter_map(|id| reviews.get(id).cloned())
            .collect())
    }

    async fn remove_for_assignment(
        &self,
        assignment: AssignmentId,
    ) -> Result<Option<Review>, StoreError> {
        self.availability.check("review")?;
        Ok(self.reviews.write().await.remove(&assignment))
    }
}
