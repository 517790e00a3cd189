//! Journals and the organizations that own them

use serde::{Deserialize, Serialize};

use crate::{JournalId, OrganizationId};

/// A journal, the scope under which articles and roles are defined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    pub id: JournalId,
    pub organization: OrganizationId,
    pub title: String,
}

impl Journal {
    pub fn new(organization: OrganizationId, title: impl Into<String>) -> Self {
        Self {
            id: JournalId::new(),
            organization,
            title: title.into(),
        }
    }
}
