//! Role and permission resolution for editorial workflows.
//!
//! This crate answers "can user U perform action A in journal J":
//! - Permission flags for every workflow action
//! - One authoritative role → permission table
//! - Grant resolution from journal and organization memberships
//! - A per-session grant cache with event-driven invalidation

pub mod directory;
pub mod error;
pub mod grant;
pub mod membership;
pub mod permissions;
pub mod resolver;
pub mod role;

pub use directory::{IdentityService, InMemoryDirectory, MembershipDirectory, SessionToken};
pub use error::AccessError;
pub use grant::Grant;
pub use membership::{JournalMembership, MembershipEvent, OrganizationMembership};
pub use permissions::Permissions;
pub use resolver::{GrantCache, GrantResolver};
pub use role::{JournalRole, OrganizationRole};
