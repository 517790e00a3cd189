//! Resolved permissions of one user in one journal

use std::collections::BTreeSet;

use imprimatur_domain::{JournalId, OrganizationId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::membership::{JournalMembership, OrganizationMembership};
use crate::permissions::Permissions;
use crate::role::{permissions_for, JournalRole};

/// The effective permission set of a user in a journal.
///
/// Derived on demand from memberships and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub user: UserId,
    pub journal: JournalId,
    pub organization: OrganizationId,
    pub roles: BTreeSet<JournalRole>,
    pub is_org_admin: bool,
    pub permissions: Permissions,
}

impl Grant {
    /// Build a grant from raw memberships.
    ///
    /// Inactive memberships and memberships for another user or scope are
    /// ignored; duplicate roles collapse into one.
    pub fn from_memberships(
        user: UserId,
        journal: JournalId,
        organization: OrganizationId,
        journal_memberships: &[JournalMembership],
        organization_memberships: &[OrganizationMembership],
    ) -> Self {
        let roles: BTreeSet<JournalRole> = journal_memberships
            .iter()
            .filter(|m| m.is_active && m.user == user && m.journal == journal)
            .map(|m| m.role)
            .collect();

        let is_org_admin = organization_memberships.iter().any(|m| {
            m.is_active && m.user == user && m.organization == organization && m.role.is_admin()
        });

        let mut permissions = permissions_for(&roles);
        if is_org_admin {
            permissions |= Permissions::ALL;
        }

        Self {
            user,
            journal,
            organization,
            roles,
            is_org_admin,
            permissions,
        }
    }

    /// A grant with no roles at all
    pub fn empty(user: UserId, journal: JournalId, organization: OrganizationId) -> Self {
        Self::from_memberships(user, journal, organization, &[], &[])
    }

    /// Check if every given action is allowed
    pub fn allows(&self, required: Permissions) -> bool {
        self.permissions.contains(required)
    }

    /// Like `allows`, but as a typed error
    pub fn require(&self, required: Permissions) -> Result<(), AccessError> {
        if self.allows(required) {
            Ok(())
        } else {
            Err(AccessError::PermissionDenied {
                user: self.user,
                journal: self.journal,
                required,
            })
        }
    }

    pub fn has_role(&self, role: JournalRole) -> bool {
        self.roles.contains(&role)
    }

    /// Check if the grant allows nothing
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::OrganizationRole;

    struct Scope {
        user: UserId,
        journal: JournalId,
        organization: OrganizationId,
    }

    fn scope() -> Scope {
        Scope {
            user: UserId::new(),
            journal: JournalId::new(),
            organization: OrganizationId::new(),
        }
    }

    #[test]
    fn test_no_memberships_is_empty() {
        let s = scope();
        let grant = Grant::empty(s.user, s.journal, s.organization);
        assert!(grant.is_empty());
        assert!(!grant.is_org_admin);
        assert!(grant.require(Permissions::ARTICLE_VIEW).is_err());
    }

    #[test]
    fn test_roles_are_unioned_and_deduplicated() {
        let s = scope();
        let memberships = vec![
            JournalMembership::new(s.user, s.journal, JournalRole::Reviewer),
            JournalMembership::new(s.user, s.journal, JournalRole::Secretary),
            JournalMembership::new(s.user, s.journal, JournalRole::Secretary),
        ];
        let grant = Grant::from_memberships(s.user, s.journal, s.organization, &memberships, &[]);
        assert_eq!(grant.roles.len(), 2);
        assert!(grant.allows(Permissions::REVIEW_SUBMIT | Permissions::ARTICLE_SCREENING));
        assert!(!grant.allows(Permissions::ARTICLE_STATUS_CHANGE));
    }

    #[test]
    fn test_inactive_and_foreign_memberships_ignored() {
        let s = scope();
        let memberships = vec![
            JournalMembership::new(s.user, s.journal, JournalRole::Manager).inactive(),
            JournalMembership::new(s.user, JournalId::new(), JournalRole::ChiefEditor),
            JournalMembership::new(UserId::new(), s.journal, JournalRole::ChiefEditor),
        ];
        let org = vec![OrganizationMembership::new(
            s.user,
            OrganizationId::new(),
            OrganizationRole::Admin,
        )];
        let grant = Grant::from_memberships(s.user, s.journal, s.organization, &memberships, &org);
        assert!(grant.is_empty());
    }

    #[test]
    fn test_org_admin_override() {
        let s = scope();
        let org = vec![OrganizationMembership::new(
            s.user,
            s.organization,
            OrganizationRole::Admin,
        )];
        let grant = Grant::from_memberships(s.user, s.journal, s.organization, &[], &org);
        assert!(grant.is_org_admin);
        assert!(grant.roles.is_empty());
        assert_eq!(grant.permissions, Permissions::ALL);
    }

    #[test]
    fn test_org_member_grants_nothing() {
        let s = scope();
        let org = vec![OrganizationMembership::new(
            s.user,
            s.organization,
            OrganizationRole::Member,
        )];
        let grant = Grant::from_memberships(s.user, s.journal, s.organization, &[], &org);
        assert!(!grant.is_org_admin);
        assert!(grant.is_empty());
    }
}
