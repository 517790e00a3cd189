//! External collaborators consulted during grant resolution.
//!
//! `MembershipDirectory` and `IdentityService` are implemented by the host
//! against its membership store and session layer. `InMemoryDirectory`
//! implements both for embedding and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use imprimatur_domain::{Journal, JournalId, OrganizationId, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::AccessError;
use crate::membership::{JournalMembership, MembershipEvent, OrganizationMembership};
use crate::role::{JournalRole, OrganizationRole};

/// Opaque session credential presented by a caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

/// Lookup of journals and memberships in the external store
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// Get a journal, including the organization that owns it
    async fn journal(&self, id: JournalId) -> Result<Option<Journal>, AccessError>;

    /// Memberships of `user` in `journal`
    async fn journal_memberships(
        &self,
        user: UserId,
        journal: JournalId,
    ) -> Result<Vec<JournalMembership>, AccessError>;

    /// Memberships of `user` in `organization`
    async fn organization_memberships(
        &self,
        user: UserId,
        organization: OrganizationId,
    ) -> Result<Vec<OrganizationMembership>, AccessError>;
}

/// Maps a session to the user behind it
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Resolve the caller, `None` if the session is unknown or expired
    async fn resolve(&self, session: &SessionToken) -> Result<Option<UserId>, AccessError>;
}

/// In-memory directory.
///
/// Mutations return the `MembershipEvent` the caller should forward to the
/// grant cache.
#[derive(Default)]
pub struct InMemoryDirectory {
    journals: RwLock<HashMap<JournalId, Journal>>,
    journal_memberships: RwLock<Vec<JournalMembership>>,
    organization_memberships: RwLock<Vec<OrganizationMembership>>,
    sessions: RwLock<HashMap<SessionToken, UserId>>,
    unavailable: AtomicBool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every lookup fail with `AccessError::Upstream`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AccessError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(AccessError::Upstream("membership directory unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn add_journal(&self, journal: Journal) {
        self.journals.write().await.insert(journal.id, journal);
    }

    pub async fn add_session(&self, token: SessionToken, user: UserId) {
        self.sessions.write().await.insert(token, user);
    }

    pub async fn end_session(&self, token: &SessionToken) -> Option<UserId> {
        self.sessions.write().await.remove(token)
    }

    pub async fn grant_journal_role(
        &self,
        user: UserId,
        journal: JournalId,
        role: JournalRole,
    ) -> MembershipEvent {
        self.journal_memberships
            .write()
            .await
            .push(JournalMembership::new(user, journal, role));
        MembershipEvent::Journal { user, journal }
    }

    /// Deactivate every membership of `user` with `role` in `journal`
    pub async fn revoke_journal_role(
        &self,
        user: UserId,
        journal: JournalId,
        role: JournalRole,
    ) -> MembershipEvent {
        let mut memberships = self.journal_memberships.write().await;
        for membership in memberships
            .iter_mut()
            .filter(|m| m.user == user && m.journal == journal && m.role == role)
        {
            membership.is_active = false;
        }
        MembershipEvent::Journal { user, journal }
    }

    pub async fn grant_organization_role(
        &self,
        user: UserId,
        organization: OrganizationId,
        role: OrganizationRole,
    ) -> MembershipEvent {
        self.organization_memberships
            .write()
            .await
            .push(OrganizationMembership::new(user, organization, role));
        MembershipEvent::Organization { user, organization }
    }

    pub async fn revoke_organization_role(
        &self,
        user: UserId,
        organization: OrganizationId,
        role: OrganizationRole,
    ) -> MembershipEvent {
        let mut memberships = self.organization_memberships.write().await;
        for membership in memberships
            .iter_mut()
            .filter(|m| m.user == user && m.organization == organization && m.role == role)
        {
            membership.is_active = false;
        }
        MembershipEvent::Organization { user, organization }
    }
}

#[async_trait]
impl MembershipDirectory for InMemoryDirectory {
    async fn journal(&self, id: JournalId) -> Result<Option<Journal>, AccessError> {
        self.check_available()?;
        Ok(self.journals.read().await.get(&id).cloned())
    }

    async fn journal_memberships(
        &self,
        user: UserId,
        journal: JournalId,
    ) -> Result<Vec<JournalMembership>, AccessError> {
        self.check_available()?;
        Ok(self
            .journal_memberships
            .read()
            .await
            .iter()
            .filter(|m| m.user == user && m.journal == journal)
            .cloned()
            .collect())
    }

    async fn organization_memberships(
        &self,
        user: UserId,
        organization: OrganizationId,
    ) -> Result<Vec<OrganizationMembership>, AccessError> {
        self.check_available()?;
        Ok(self
            .organization_memberships
            .read()
            .await
            .iter()
            .filter(|m| m.user == user && m.organization == organization)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IdentityService for InMemoryDirectory {
    async fn resolve(&self, session: &SessionToken) -> Result<Option<UserId>, AccessError> {
        self.check_available()?;
        Ok(self.sessions.read().await.get(session).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_filters_by_user_and_journal() {
        let directory = InMemoryDirectory::new();
        let user = UserId::new();
        let journal = JournalId::new();
        directory
            .grant_journal_role(user, journal, JournalRole::Editor)
            .await;
        directory
            .grant_journal_role(user, JournalId::new(), JournalRole::Manager)
            .await;

        let memberships = directory.journal_memberships(user, journal).await.unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].role, JournalRole::Editor);
    }

    #[tokio::test]
    async fn test_revoke_deactivates() {
        let directory = InMemoryDirectory::new();
        let user = UserId::new();
        let journal = JournalId::new();
        directory
            .grant_journal_role(user, journal, JournalRole::Editor)
            .await;
        let event = directory
            .revoke_journal_role(user, journal, JournalRole::Editor)
            .await;

        assert_eq!(event, MembershipEvent::Journal { user, journal });
        let memberships = directory.journal_memberships(user, journal).await.unwrap();
        assert!(!memberships[0].is_active);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let directory = InMemoryDirectory::new();
        directory.set_unavailable(true);
        let err = directory.journal(JournalId::new()).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_sessions() {
        let directory = InMemoryDirectory::new();
        let user = UserId::new();
        let token = SessionToken::new("s-1");
        directory.add_session(token.clone(), user).await;
        assert_eq!(directory.resolve(&token).await.unwrap(), Some(user));
        directory.end_session(&token).await;
        assert_eq!(directory.resolve(&token).await.unwrap(), None);
    }
}
