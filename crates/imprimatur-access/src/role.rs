//! Journal and organization roles, and the role → permission table

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::permissions::Permissions;

/// A role held within one journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalRole {
    Author,
    Reviewer,
    /// Editorial office staff handling screening
    Secretary,
    Editor,
    ChiefEditor,
    LayoutEditor,
    /// Journal administrator
    Manager,
}

impl JournalRole {
    pub const ALL: [JournalRole; 7] = [
        JournalRole::Author,
        JournalRole::Reviewer,
        JournalRole::Secretary,
        JournalRole::Editor,
        JournalRole::ChiefEditor,
        JournalRole::LayoutEditor,
        JournalRole::Manager,
    ];

    const EDITOR: Permissions = Permissions::ARTICLE_VIEW
        .union(Permissions::ARTICLE_SCREENING)
        .union(Permissions::REVIEW_ASSIGN);

    /// The static permission set of this role
    pub const fn permissions(&self) -> Permissions {
        match self {
            JournalRole::Author => Permissions::ARTICLE_VIEW.union(Permissions::ARTICLE_SUBMIT),
            JournalRole::Reviewer => Permissions::ARTICLE_VIEW.union(Permissions::REVIEW_SUBMIT),
            JournalRole::Secretary => {
                Permissions::ARTICLE_VIEW.union(Permissions::ARTICLE_SCREENING)
            }
            JournalRole::Editor => Self::EDITOR,
            JournalRole::ChiefEditor => Self::EDITOR.union(Permissions::ARTICLE_STATUS_CHANGE),
            JournalRole::LayoutEditor => {
                Permissions::ARTICLE_VIEW.union(Permissions::ISSUE_PUBLISH)
            }
            JournalRole::Manager => Permissions::ALL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JournalRole::Author => "author",
            JournalRole::Reviewer => "reviewer",
            JournalRole::Secretary => "secretary",
            JournalRole::Editor => "editor",
            JournalRole::ChiefEditor => "chief_editor",
            JournalRole::LayoutEditor => "layout_editor",
            JournalRole::Manager => "manager",
        }
    }
}

impl std::fmt::Display for JournalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JournalRole {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JournalRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AccessError::UnknownRole(s.to_string()))
    }
}

/// A role held within an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRole {
    /// Implicitly holds every permission in every journal of the organization
    Admin,
    Member,
}

impl OrganizationRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, OrganizationRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationRole::Admin => "admin",
            OrganizationRole::Member => "member",
        }
    }
}

impl std::fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrganizationRole {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(OrganizationRole::Admin),
            "member" => Ok(OrganizationRole::Member),
            other => Err(AccessError::UnknownRole(other.to_string())),
        }
    }
}

/// Union of the permission sets of the given roles
pub fn permissions_for<'a>(roles: impl IntoIterator<Item = &'a JournalRole>) -> Permissions {
    roles
        .into_iter()
        .fold(Permissions::NONE, |acc, role| acc | role.permissions())
}
