//! Grant resolution and the per-session grant cache

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use imprimatur_domain::{JournalId, OrganizationId, UserId};
use tokio::sync::RwLock;

use crate::directory::{IdentityService, MembershipDirectory, SessionToken};
use crate::error::AccessError;
use crate::grant::Grant;
use crate::membership::MembershipEvent;
use crate::permissions::Permissions;

/// Cache of resolved grants keyed by (user, journal).
///
/// Every invalidation bumps a generation counter under the write lock. A
/// resolution only stores its result if no invalidation happened since it
/// started, so a grant computed from memberships that were revoked
/// mid-flight is never cached.
#[derive(Debug, Default)]
pub struct GrantCache {
    entries: RwLock<HashMap<(UserId, JournalId), Grant>>,
    generation: AtomicU64,
}

impl GrantCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user: UserId, journal: JournalId) -> Option<Grant> {
        self.entries.read().await.get(&(user, journal)).cloned()
    }

    /// Current invalidation generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store a grant computed at `generation`; returns false if it is stale
    pub async fn insert_if_current(&self, grant: Grant, generation: u64) -> bool {
        let mut entries = self.entries.write().await;
        if self.generation() != generation {
            return false;
        }
        entries.insert((grant.user, grant.journal), grant);
        true
    }

    async fn retain(&self, keep: impl Fn(&Grant) -> bool) -> usize {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        let before = entries.len();
        entries.retain(|_, grant| keep(grant));
        before - entries.len()
    }

    pub async fn invalidate(&self, user: UserId, journal: JournalId) {
        let removed = self
            .retain(|g| !(g.user == user && g.journal == journal))
            .await;
        tracing::debug!(%user, %journal, removed, "invalidated grant");
    }

    pub async fn invalidate_user(&self, user: UserId) {
        let removed = self.retain(|g| g.user != user).await;
        tracing::debug!(%user, removed, "invalidated grants for user");
    }

    pub async fn invalidate_journal(&self, journal: JournalId) {
        let removed = self.retain(|g| g.journal != journal).await;
        tracing::debug!(%journal, removed, "invalidated grants for journal");
    }

    /// Drop every grant of `user` within journals of `organization`
    pub async fn invalidate_organization(&self, user: UserId, organization: OrganizationId) {
        let removed = self
            .retain(|g| !(g.user == user && g.organization == organization))
            .await;
        tracing::debug!(%user, %organization, removed, "invalidated grants for organization");
    }

    /// React to a membership change reported by the store
    pub async fn on_membership_event(&self, event: &MembershipEvent) {
        match *event {
            MembershipEvent::Journal { user, journal } => self.invalidate(user, journal).await,
            MembershipEvent::Organization { user, organization } => {
                self.invalidate_organization(user, organization).await
            }
        }
    }

    /// Drop everything, e.g. at session end
    pub async fn clear(&self) {
        let removed = self.retain(|_| false).await;
        tracing::debug!(removed, "cleared grant cache");
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Computes and caches grants from the membership directory
pub struct GrantResolver {
    directory: Arc<dyn MembershipDirectory>,
    identity: Arc<dyn IdentityService>,
    cache: GrantCache,
}

impl GrantResolver {
    pub fn new(directory: Arc<dyn MembershipDirectory>, identity: Arc<dyn IdentityService>) -> Self {
        Self {
            directory,
            identity,
            cache: GrantCache::new(),
        }
    }

    pub fn cache(&self) -> &GrantCache {
        &self.cache
    }

    /// Resolve the caller of a session
    pub async fn identify(&self, session: &SessionToken) -> Result<UserId, AccessError> {
        self.identity
            .resolve(session)
            .await?
            .ok_or(AccessError::Unauthenticated)
    }

    /// Grant of the session's user in `journal`
    pub async fn resolve_session(
        &self,
        session: &SessionToken,
        journal: JournalId,
    ) -> Result<Grant, AccessError> {
        let user = self.identify(session).await?;
        self.resolve(user, journal).await
    }

    /// Grant of `user` in `journal`, from the cache when possible
    pub async fn resolve(&self, user: UserId, journal: JournalId) -> Result<Grant, AccessError> {
        if let Some(grant) = self.cache.get(user, journal).await {
            return Ok(grant);
        }

        let generation = self.cache.generation();
        let journal_record = self
            .directory
            .journal(journal)
            .await?
            .ok_or(AccessError::JournalNotFound(journal))?;
        let journal_memberships = self.directory.journal_memberships(user, journal).await?;
        let organization_memberships = self
            .directory
            .organization_memberships(user, journal_record.organization)
            .await?;

        let grant = Grant::from_memberships(
            user,
            journal,
            journal_record.organization,
            &journal_memberships,
            &organization_memberships,
        );
        let cached = self.cache.insert_if_current(grant.clone(), generation).await;
        tracing::debug!(
            %user,
            %journal,
            permissions = %grant.permissions,
            org_admin = grant.is_org_admin,
            cached,
            "resolved grant"
        );
        Ok(grant)
    }

    /// Check whether `user` may perform `action` in `journal`
    pub async fn can(
        &self,
        user: UserId,
        action: Permissions,
        journal: JournalId,
    ) -> Result<bool, AccessError> {
        Ok(self.resolve(user, journal).await?.allows(action))
    }

    /// Forward a membership change to the cache
    pub async fn on_membership_event(&self, event: &MembershipEvent) {
        self.cache.on_membership_event(event).await;
    }
}
