//! Membership records read from the external store

use imprimatur_domain::{JournalId, OrganizationId, UserId};
use serde::{Deserialize, Serialize};

use crate::role::{JournalRole, OrganizationRole};

/// A role held by a user in one journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalMembership {
    pub user: UserId,
    pub journal: JournalId,
    pub role: JournalRole,
    pub is_active: bool,
}

impl JournalMembership {
    pub fn new(user: UserId, journal: JournalId, role: JournalRole) -> Self {
        Self {
            user,
            journal,
            role,
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// A role held by a user in one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMembership {
    pub user: UserId,
    pub organization: OrganizationId,
    pub role: OrganizationRole,
    pub is_active: bool,
}

impl OrganizationMembership {
    pub fn new(user: UserId, organization: OrganizationId, role: OrganizationRole) -> Self {
        Self {
            user,
            organization,
            role,
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Notification that a membership was created, changed or revoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum MembershipEvent {
    Journal {
        user: UserId,
        journal: JournalId,
    },
    Organization {
        user: UserId,
        organization: OrganizationId,
    },
}

impl MembershipEvent {
    pub fn user(&self) -> UserId {
        match self {
            MembershipEvent::Journal { user, .. } | MembershipEvent::Organization { user, .. } => {
                *user
            }
        }
    }
}
