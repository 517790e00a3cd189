//! The transition table
//!
//! Every legal status change is one row of (from, to, required permission,
//! guard). Anything not listed is illegal.

use imprimatur_access::Permissions;
use imprimatur_domain::{ArticleStatus, NoteKind};

/// Precondition checked before a transition is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Only the permission is required
    None,
    /// Only the article's author may take this edge
    Author,
    /// A passed screening evaluation must be supplied
    ScreeningPassed,
    /// A non-empty reason must be supplied
    Reason,
    /// The review quorum must be met
    Quorum,
    /// A decision matching the target must be supplied, with the quorum
    /// checked when `quorum` is set
    Decision { quorum: bool },
}

impl Guard {
    /// Editorial edges may never be taken by the article's own author
    pub fn is_editorial(&self) -> bool {
        !matches!(self, Guard::Author)
    }

    pub fn needs_quorum(&self) -> bool {
        matches!(self, Guard::Quorum | Guard::Decision { quorum: true })
    }
}

/// One legal edge of the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: ArticleStatus,
    pub to: ArticleStatus,
    pub action: Permissions,
    pub guard: Guard,
    /// Kind of the note recorded when the edge is taken
    pub note: NoteKind,
}

const fn edge(
    from: ArticleStatus,
    to: ArticleStatus,
    action: Permissions,
    guard: Guard,
    note: NoteKind,
) -> TransitionRule {
    TransitionRule {
        from,
        to,
        action,
        guard,
        note,
    }
}

use ArticleStatus::*;

const SUBMIT: Permissions = Permissions::ARTICLE_SUBMIT;
const SCREEN: Permissions = Permissions::ARTICLE_SCREENING;
const DECIDE: Permissions = Permissions::ARTICLE_STATUS_CHANGE;
const PUBLISH: Permissions = Permissions::ISSUE_PUBLISH;

const REVIEWED_DECISION: Guard = Guard::Decision { quorum: true };
const PENDING_DECISION: Guard = Guard::Decision { quorum: false };

/// All legal transitions
pub const TRANSITIONS: &[TransitionRule] = &[
    // Author side
    edge(Draft, Submitted, SUBMIT, Guard::Author, NoteKind::Submission),
    edge(ReturnedToAuthor, Submitted, SUBMIT, Guard::Author, NoteKind::Submission),
    edge(ReturnedToAuthor, Draft, SUBMIT, Guard::Author, NoteKind::StatusChange),
    edge(RevisionMinor, UnderReview, SUBMIT, Guard::Author, NoteKind::Submission),
    edge(RevisionMajor, UnderReview, SUBMIT, Guard::Author, NoteKind::Submission),
    // Screening
    edge(Submitted, Screening, SCREEN, Guard::None, NoteKind::StatusChange),
    edge(Screening, UnderReview, SCREEN, Guard::ScreeningPassed, NoteKind::Screening),
    edge(Screening, ReturnedToAuthor, SCREEN, Guard::Reason, NoteKind::ReturnToAuthor),
    // Review and decision
    edge(UnderReview, DecisionPending, DECIDE, Guard::Quorum, NoteKind::StatusChange),
    edge(UnderReview, Accepted, DECIDE, REVIEWED_DECISION, NoteKind::Decision),
    edge(UnderReview, Rejected, DECIDE, REVIEWED_DECISION, NoteKind::Decision),
    edge(UnderReview, RevisionMinor, DECIDE, REVIEWED_DECISION, NoteKind::Decision),
    edge(UnderReview, RevisionMajor, DECIDE, REVIEWED_DECISION, NoteKind::Decision),
    edge(DecisionPending, Accepted, DECIDE, PENDING_DECISION, NoteKind::Decision),
    edge(DecisionPending, Rejected, DECIDE, PENDING_DECISION, NoteKind::Decision),
    edge(DecisionPending, RevisionMinor, DECIDE, PENDING_DECISION, NoteKind::Decision),
    edge(DecisionPending, RevisionMajor, DECIDE, PENDING_DECISION, NoteKind::Decision),
    // Production
    edge(Accepted, InProduction, DECIDE, Guard::None, NoteKind::StatusChange),
    edge(InProduction, Published, PUBLISH, Guard::None, NoteKind::Publication),
];

/// Look up the rule for one edge
pub fn rule(from: ArticleStatus, to: ArticleStatus) -> Option<&'static TransitionRule> {
    TRANSITIONS.iter().find(|r| r.from == from && r.to == to)
}

/// All rules leaving `from`
pub fn rules_from(from: ArticleStatus) -> impl Iterator<Item = &'static TransitionRule> {
    TRANSITIONS.iter().filter(move |r| r.from == from)
}

/// Statuses reachable from `from` in one step
pub fn valid_targets(from: ArticleStatus) -> Vec<ArticleStatus> {
    rules_from(from).map(|r| r.to).collect()
}
