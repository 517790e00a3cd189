//! Reviewer assignment
//!
//! An article under review has at most [`MAX_REVIEWERS`] active (not
//! declined) assignments at a time. Each assignment yields at most one
//! review, and submitting it completes the assignment. Completed
//! assignments count towards the decision quorum.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use imprimatur_access::{Grant, GrantResolver, Permissions};
use imprimatur_domain::{
    Article, ArticleId, ArticleStatus, ArticleUpdate, AssignmentFilter, AssignmentId,
    AssignmentPatch, AssignmentStatus, AssignmentTransitionError, Note, NoteKind, Review,
    ReviewAssignment, UserId,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ReviewConfig;
use crate::error::{EditorialError, Result};
use crate::store::{ArticleStore, AssignmentStore, ReviewStore};

/// Maximum number of active reviewers per article
pub const MAX_REVIEWERS: usize = 2;

/// A reviewer's answer to an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationResponse {
    Accept,
    Decline,
}

impl InvitationResponse {
    fn target(&self) -> AssignmentStatus {
        match self {
            InvitationResponse::Accept => AssignmentStatus::Accepted,
            InvitationResponse::Decline => AssignmentStatus::Declined,
        }
    }
}

/// Statuses in which reviewers may answer invitations and file reviews
fn accepts_reviews(status: ArticleStatus) -> bool {
    matches!(
        status,
        ArticleStatus::UnderReview | ArticleStatus::DecisionPending
    )
}

/// Invitation lifecycle and review aggregation
pub struct ReviewerAssignments {
    articles: Arc<dyn ArticleStore>,
    assignments: Arc<dyn AssignmentStore>,
    reviews: Arc<dyn ReviewStore>,
    grants: Arc<GrantResolver>,
    config: ReviewConfig,
}

impl ReviewerAssignments {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        assignments: Arc<dyn AssignmentStore>,
        reviews: Arc<dyn ReviewStore>,
        grants: Arc<GrantResolver>,
        config: ReviewConfig,
    ) -> Self {
        Self {
            articles,
            assignments,
            reviews,
            grants,
            config,
        }
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    async fn article(&self, id: ArticleId) -> Result<Article> {
        self.articles
            .get(id)
            .await?
            .ok_or_else(|| EditorialError::NotFound(format!("article {}", id)))
    }

    async fn assignment(&self, id: AssignmentId) -> Result<ReviewAssignment> {
        self.assignments
            .get(id)
            .await?
            .ok_or_else(|| EditorialError::NotFound(format!("assignment {}", id)))
    }

    /// Grant of `actor` in the article's journal, required to allow `action`
    async fn require(&self, actor: UserId, article: &Article, action: Permissions) -> Result<Grant> {
        let grant = self.grants.resolve(actor, article.journal).await?;
        grant.require(action)?;
        Ok(grant)
    }

    /// The assignment, provided `actor` is its reviewer and may review, and
    /// its article is still being reviewed
    async fn own_assignment(&self, actor: UserId, id: AssignmentId) -> Result<ReviewAssignment> {
        let assignment = self.assignment(id).await?;
        if assignment.reviewer != actor {
            return Err(EditorialError::PermissionDenied(format!(
                "assignment {} belongs to another reviewer",
                id
            )));
        }
        let article = self.article(assignment.article).await?;
        self.require(actor, &article, Permissions::REVIEW_SUBMIT)
            .await?;
        if !accepts_reviews(article.status) {
            return Err(EditorialError::invalid(format!(
                "reviews are closed for article {}, it is {}",
                article.id, article.status
            )));
        }
        Ok(assignment)
    }

    /// Invite one or two reviewers to an article under review.
    ///
    /// Either every reviewer gets an assignment or none does. A due date of
    /// `None` falls back to the configured default.
    pub async fn invite(
        &self,
        actor: UserId,
        article_id: ArticleId,
        reviewers: &[UserId],
        due_at: Option<DateTime<Utc>>,
    ) -> Result<Vec<ReviewAssignment>> {
        let article = self.article(article_id).await?;
        self.require(actor, &article, Permissions::REVIEW_ASSIGN)
            .await?;
        if reviewers.is_empty() || reviewers.len() > MAX_REVIEWERS {
            return Err(EditorialError::invalid(format!(
                "between 1 and {} reviewers must be invited, got {}",
                MAX_REVIEWERS,
                reviewers.len()
            )));
        }
        let unique: HashSet<&UserId> = reviewers.iter().collect();
        if unique.len() != reviewers.len() {
            return Err(EditorialError::invalid("the same reviewer is listed twice"));
        }
        if article.is_authored_by(&actor) {
            return Err(EditorialError::PermissionDenied(
                "authors cannot assign reviewers to their own article".to_string(),
            ));
        }
        if reviewers.iter().any(|r| article.is_authored_by(r)) {
            return Err(EditorialError::invalid(
                "the author cannot review their own article",
            ));
        }
        if article.status != ArticleStatus::UnderReview {
            return Err(EditorialError::invalid(format!(
                "reviewers can only be invited while the article is under review, it is {}",
                article.status
            )));
        }

        let due_at = due_at
            .unwrap_or_else(|| Utc::now() + Duration::days(i64::from(self.config.default_due_days)));
        let created: Vec<ReviewAssignment> = reviewers
            .iter()
            .map(|reviewer| {
                ReviewAssignment::new(article.id, *reviewer)
                    .with_due_date(due_at)
                    .with_blind(self.config.blind_by_default)
            })
            .collect();
        self.assignments
            .insert_within_limit(article.id, created.clone(), MAX_REVIEWERS)
            .await?;

        let note = Note::new(
            NoteKind::ReviewInvitation,
            actor,
            article.status,
            article.status,
            json!({ "reviewers": reviewers, "due_at": due_at }),
        );
        if let Err(err) = self
            .articles
            .update_if_status(article.id, ArticleStatus::UnderReview, ArticleUpdate::note(note))
            .await
        {
            self.discard(&created).await;
            return Err(err.into());
        }

        tracing::info!(
            article = %article.id,
            %actor,
            invited = created.len(),
            "reviewers invited"
        );
        Ok(created)
    }

    /// Undo assignments whose invitation could not be recorded
    async fn discard(&self, created: &[ReviewAssignment]) {
        for assignment in created {
            if let Err(err) = self.assignments.remove(assignment.id).await {
                tracing::warn!(assignment = %assignment.id, error = %err, "failed to discard assignment");
            }
        }
    }

    /// Accept or decline an invitation. A decline frees the slot.
    pub async fn respond(
        &self,
        actor: UserId,
        assignment_id: AssignmentId,
        response: InvitationResponse,
    ) -> Result<ReviewAssignment> {
        let assignment = self.own_assignment(actor, assignment_id).await?;
        let target = response.target();
        if !assignment.status.can_transition_to(&target) {
            return Err(AssignmentTransitionError {
                from: assignment.status,
                to: target,
            }
            .into());
        }

        let updated = self
            .assignments
            .update_status(assignment.id, assignment.status, AssignmentPatch { status: target })
            .await?;
        tracing::info!(assignment = %updated.id, status = %updated.status, "invitation answered");
        Ok(updated)
    }

    /// Store the review of an assignment and complete it.
    ///
    /// Allowed once per assignment, from `assigned` or `accepted`.
    pub async fn submit_review(&self, actor: UserId, review: Review) -> Result<Review> {
        let assignment = self.own_assignment(actor, review.assignment).await?;
        match assignment.status {
            AssignmentStatus::Assigned | AssignmentStatus::Accepted => {}
            AssignmentStatus::Completed => {
                return Err(EditorialError::invalid(format!(
                    "assignment {} already has a review",
                    assignment.id
                )))
            }
            AssignmentStatus::Declined => {
                return Err(AssignmentTransitionError {
                    from: assignment.status,
                    to: AssignmentStatus::Completed,
                }
                .into())
            }
        }

        let mut problems = review.scores.problems();
        if review.public_comment.trim().is_empty() {
            problems.push("review comment is required".to_string());
        }
        if !problems.is_empty() {
            return Err(EditorialError::ValidationFailed(problems));
        }

        self.reviews.insert(review.clone()).await?;
        let completed = self
            .assignments
            .update_status(
                assignment.id,
                assignment.status,
                AssignmentPatch {
                    status: AssignmentStatus::Completed,
                },
            )
            .await;
        if let Err(err) = completed {
            if let Err(cleanup) = self.reviews.remove_for_assignment(assignment.id).await {
                tracing::warn!(assignment = %assignment.id, error = %cleanup, "failed to discard review");
            }
            return Err(err.into());
        }

        tracing::info!(
            assignment = %assignment.id,
            article = %assignment.article,
            recommendation = ?review.recommendation,
            "review submitted"
        );
        Ok(review)
    }

    /// All assignments of an article, oldest first
    pub async fn assignments_for(&self, article: ArticleId) -> Result<Vec<ReviewAssignment>> {
        Ok(self
            .assignments
            .list(&AssignmentFilter::for_article(article))
            .await?)
    }

    /// Reviews submitted for an article
    pub async fn reviews_for_article(&self, article: ArticleId) -> Result<Vec<Review>> {
        let ids: Vec<AssignmentId> = self
            .assignments_for(article)
            .await?
            .iter()
            .map(|a| a.id)
            .collect();
        Ok(self.reviews.list_for_assignments(&ids).await?)
    }

    /// Number of completed assignments of an article
    pub async fn completed_count(&self, article: ArticleId) -> Result<u32> {
        let completed = self
            .assignments
            .list(&AssignmentFilter::for_article(article).with_status(AssignmentStatus::Completed))
            .await?;
        Ok(u32::try_from(completed.len()).unwrap_or(u32::MAX))
    }

    /// Whether enough reviews are in for an editorial decision
    pub async fn is_ready_for_decision(&self, article: ArticleId) -> Result<bool> {
        Ok(self.completed_count(article).await? >= self.config.quorum)
    }
}
