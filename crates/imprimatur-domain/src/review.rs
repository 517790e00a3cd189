//! Peer review assignments and the reviews they produce

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ArticleId, AssignmentId, ReviewId, UserId};

/// Status of a review assignment.
///
/// ```text
/// Assigned → Accepted → Completed
///     ↓  ↘________________↗
///  Declined
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Invitation sent, no answer yet
    #[default]
    Assigned,
    /// Reviewer agreed to review
    Accepted,
    /// Reviewer declined; the slot is free again
    Declined,
    /// Review submitted
    Completed,
}

impl AssignmentStatus {
    /// Check if a status change is valid.
    ///
    /// Submitting a review straight from `Assigned` counts as accepting it.
    pub fn can_transition_to(&self, target: &AssignmentStatus) -> bool {
        matches!(
            (self, target),
            (AssignmentStatus::Assigned, AssignmentStatus::Accepted)
                | (AssignmentStatus::Assigned, AssignmentStatus::Declined)
                | (AssignmentStatus::Assigned, AssignmentStatus::Completed)
                | (AssignmentStatus::Accepted, AssignmentStatus::Completed)
        )
    }

    /// Active assignments occupy one of the article's reviewer slots
    pub fn is_active(&self) -> bool {
        !matches!(self, AssignmentStatus::Declined)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Accepted => "accepted",
            AssignmentStatus::Declined => "declined",
            AssignmentStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An assignment status change that the lifecycle does not allow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("assignment cannot move from {from} to {to}")]
pub struct AssignmentTransitionError {
    pub from: AssignmentStatus,
    pub to: AssignmentStatus,
}

/// A reviewer invited to review one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAssignment {
    pub id: AssignmentId,
    pub article: ArticleId,
    pub reviewer: UserId,
    pub status: AssignmentStatus,
    pub due_at: Option<DateTime<Utc>>,
    /// Hide author identity from the reviewer
    pub blind: bool,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl ReviewAssignment {
    /// Create a new assignment in the `Assigned` state
    pub fn new(article: ArticleId, reviewer: UserId) -> Self {
        Self {
            id: AssignmentId::new(),
            article,
            reviewer,
            status: AssignmentStatus::Assigned,
            due_at: None,
            blind: true,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    pub fn with_due_date(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    pub fn with_blind(mut self, blind: bool) -> Self {
        self.blind = blind;
        self
    }

    /// Check if the review is past its due date
    pub fn is_overdue(&self) -> bool {
        match self.due_at {
            Some(due_at) => self.status != AssignmentStatus::Completed && Utc::now() > due_at,
            None => false,
        }
    }

    /// Move to a new status
    pub fn transition_to(
        &mut self,
        target: AssignmentStatus,
    ) -> Result<(), AssignmentTransitionError> {
        if !self.status.can_transition_to(&target) {
            return Err(AssignmentTransitionError {
                from: self.status,
                to: target,
            });
        }
        if self.status == AssignmentStatus::Assigned {
            self.responded_at = Some(Utc::now());
        }
        self.status = target;
        Ok(())
    }

    pub fn accept(&mut self) -> Result<(), AssignmentTransitionError> {
        self.transition_to(AssignmentStatus::Accepted)
    }

    pub fn decline(&mut self) -> Result<(), AssignmentTransitionError> {
        self.transition_to(AssignmentStatus::Declined)
    }

    pub fn complete(&mut self) -> Result<(), AssignmentTransitionError> {
        self.transition_to(AssignmentStatus::Completed)
    }
}

/// Reviewer's overall recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Accept,
    Minor,
    Major,
    Reject,
}

/// Numeric scores, each from 1 (poor) to 5 (excellent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewScores {
    pub originality: u8,
    pub methodology: u8,
    pub clarity: u8,
    pub significance: u8,
}

impl ReviewScores {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Problems with the score values, empty when all are in range
    pub fn problems(&self) -> Vec<String> {
        [
            ("originality", self.originality),
            ("methodology", self.methodology),
            ("clarity", self.clarity),
            ("significance", self.significance),
        ]
        .into_iter()
        .filter(|(_, score)| !(Self::MIN..=Self::MAX).contains(score))
        .map(|(name, score)| {
            format!(
                "{} score {} is outside {}..={}",
                name,
                score,
                Self::MIN,
                Self::MAX
            )
        })
        .collect()
    }

    /// Mean of the four scores
    pub fn mean(&self) -> f64 {
        let sum = self.originality as u32
            + self.methodology as u32
            + self.clarity as u32
            + self.significance as u32;
        sum as f64 / 4.0
    }
}

impl Default for ReviewScores {
    fn default() -> Self {
        Self {
            originality: 3,
            methodology: 3,
            clarity: 3,
            significance: 3,
        }
    }
}

/// A submitted review; exactly one per completed assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub assignment: AssignmentId,
    pub recommendation: Recommendation,
    pub scores: ReviewScores,
    /// Shared with the author
    pub public_comment: String,
    /// Visible to editors only
    pub confidential_comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        assignment: AssignmentId,
        recommendation: Recommendation,
        public_comment: impl Into<String>,
    ) -> Self {
        Self {
            id: ReviewId::new(),
            assignment,
            recommendation,
            scores: ReviewScores::default(),
            public_comment: public_comment.into(),
            confidential_comment: None,
            submitted_at: Utc::now(),
        }
    }

    pub fn with_scores(mut self, scores: ReviewScores) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_confidential_comment(mut self, comment: impl Into<String>) -> Self {
        self.confidential_comment = Some(comment.into());
        self
    }
}

/// Request to create an assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentCreate {
    pub article: ArticleId,
    pub reviewer: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    pub blind: bool,
}

impl From<&ReviewAssignment> for AssignmentCreate {
    fn from(assignment: &ReviewAssignment) -> Self {
        Self {
            article: assignment.article,
            reviewer: assignment.reviewer,
            due_at: assignment.due_at,
            blind: assignment.blind,
        }
    }
}

/// Status patch for an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPatch {
    pub status: AssignmentStatus,
}

/// Filter for listing assignments; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<ArticleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AssignmentStatus>,
}

impl AssignmentFilter {
    pub fn for_article(article: ArticleId) -> Self {
        Self {
            article: Some(article),
            ..Default::default()
        }
    }

    pub fn for_reviewer(reviewer: UserId) -> Self {
        Self {
            reviewer: Some(reviewer),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: AssignmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, assignment: &ReviewAssignment) -> bool {
        self.article.map_or(true, |a| a == assignment.article)
            && self.reviewer.map_or(true, |r| r == assignment.reviewer)
            && self.status.map_or(true, |s| s == assignment.status)
    }
}

/// Review in the shape the external store accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub assignment: AssignmentId,
    pub recommendation: Recommendation,
    pub body: String,
}

impl From<&Review> for ReviewCreate {
    fn from(review: &Review) -> Self {
        Self {
            assignment: review.assignment,
            recommendation: review.recommendation,
            body: review.public_comment.clone(),
        }
    }
}
