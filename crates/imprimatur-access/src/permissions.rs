//! Workflow actions as bitflags.
//!
//! A permission set is the union of the flags granted by every role a user
//! holds in a journal.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Bitflag-based set of workflow actions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        /// View articles of the journal
        const ARTICLE_VIEW = 1 << 0;
        /// Submit and resubmit one's own manuscripts
        const ARTICLE_SUBMIT = 1 << 1;
        /// Run the editorial screening
        const ARTICLE_SCREENING = 1 << 2;
        /// Invite reviewers
        const REVIEW_ASSIGN = 1 << 3;
        /// Respond to invitations and submit reviews
        const REVIEW_SUBMIT = 1 << 4;
        /// Record editorial decisions and move articles between review stages
        const ARTICLE_STATUS_CHANGE = 1 << 5;
        /// Publish articles in an issue
        const ISSUE_PUBLISH = 1 << 6;
        /// Manage journal memberships
        const MEMBER_MANAGE = 1 << 7;
    }
}

impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Permissions::from_bits(bits).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid permission bits: {}", bits))
        })
    }
}

impl Permissions {
    /// Every action
    pub const ALL: Permissions = Permissions::all();

    /// The empty set
    pub const NONE: Permissions = Permissions::empty();

    /// Wire names of the contained actions, in flag order
    pub fn action_names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::NONE
    }
}

impl std::fmt::Display for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        f.write_str(&self.action_names().join(" | "))
    }
}
