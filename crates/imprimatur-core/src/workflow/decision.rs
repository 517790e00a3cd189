//! Editorial decisions and where they route an article

use chrono::{DateTime, Duration, Utc};
use imprimatur_domain::{ArticleStatus, Recommendation};
use serde::{Deserialize, Serialize};

use crate::config::DecisionConfig;

/// Outcome chosen by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Accept,
    Minor,
    Major,
    Reject,
}

/// Size of a requested revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionType {
    Minor,
    Major,
}

impl DecisionKind {
    /// Status the article moves to
    pub fn target(&self) -> ArticleStatus {
        match self {
            DecisionKind::Accept => ArticleStatus::Accepted,
            DecisionKind::Minor => ArticleStatus::RevisionMinor,
            DecisionKind::Major => ArticleStatus::RevisionMajor,
            DecisionKind::Reject => ArticleStatus::Rejected,
        }
    }

    pub fn revision_type(&self) -> Option<RevisionType> {
        match self {
            DecisionKind::Minor => Some(RevisionType::Minor),
            DecisionKind::Major => Some(RevisionType::Major),
            DecisionKind::Accept | DecisionKind::Reject => None,
        }
    }
}

impl From<Recommendation> for DecisionKind {
    fn from(recommendation: Recommendation) -> Self {
        match recommendation {
            Recommendation::Accept => DecisionKind::Accept,
            Recommendation::Minor => DecisionKind::Minor,
            Recommendation::Major => DecisionKind::Major,
            Recommendation::Reject => DecisionKind::Reject,
        }
    }
}

/// An editorial decision on a reviewed article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub kind: DecisionKind,
    /// Revision deadline; defaulted from configuration for revisions
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Letter to the author
    #[serde(default)]
    pub comment: Option<String>,
}

impl Decision {
    pub fn new(kind: DecisionKind) -> Self {
        Self {
            kind,
            deadline: None,
            comment: None,
        }
    }

    pub fn accept() -> Self {
        Self::new(DecisionKind::Accept)
    }

    pub fn reject() -> Self {
        Self::new(DecisionKind::Reject)
    }

    pub fn minor_revision() -> Self {
        Self::new(DecisionKind::Minor)
    }

    pub fn major_revision() -> Self {
        Self::new(DecisionKind::Major)
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Deadline to record: the explicit one, or the configured default for
    /// revisions. Accept and reject carry none.
    pub fn effective_deadline(
        &self,
        config: &DecisionConfig,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let days = match self.kind.revision_type()? {
            RevisionType::Minor => config.minor_revision_days,
            RevisionType::Major => config.major_revision_days,
        };
        Some(
            self.deadline
                .unwrap_or_else(|| now + Duration::days(i64::from(days))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_targets() {
        assert_eq!(DecisionKind::Accept.target(), ArticleStatus::Accepted);
        assert_eq!(DecisionKind::Minor.target(), ArticleStatus::RevisionMinor);
        assert_eq!(DecisionKind::Major.target(), ArticleStatus::RevisionMajor);
        assert_eq!(DecisionKind::Reject.target(), ArticleStatus::Rejected);
    }

    #[test]
    fn test_default_revision_deadlines() {
        let config = DecisionConfig::default();
        let now = Utc::now();
        assert_eq!(
            Decision::minor_revision().effective_deadline(&config, now),
            Some(now + Duration::days(14))
        );
        assert_eq!(
            Decision::major_revision().effective_deadline(&config, now),
            Some(now + Duration::days(30))
        );
        assert_eq!(Decision::accept().effective_deadline(&config, now), None);
    }

    #[test]
    fn test_explicit_deadline_wins() {
        let now = Utc::now();
        let deadline = now + Duration::days(3);
        let decision = Decision::major_revision().with_deadline(deadline);
        assert_eq!(
            decision.effective_deadline(&DecisionConfig::default(), now),
            Some(deadline)
        );
    }

    #[test]
    fn test_reject_ignores_deadline() {
        let now = Utc::now();
        let decision = Decision::reject().with_deadline(now);
        assert_eq!(
            decision.effective_deadline(&DecisionConfig::default(), now),
            None
        );
    }
}
