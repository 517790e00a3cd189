//! Shared setup for workflow integration tests

#![allow(dead_code)]

use std::sync::Arc;

use imprimatur_access::{GrantResolver, InMemoryDirectory, JournalRole, OrganizationRole};
use imprimatur_core::{
    EditorialConfig, EditorialWorkflow, InMemoryArticleStore, InMemoryAssignmentStore,
    InMemoryReviewStore,
};
use imprimatur_domain::{
    Article, ArticleId, FormattingChecks, Journal, OrganizationId, ScreeningChecklist,
    ThematicFit, UserId,
};

pub struct Harness {
    pub directory: Arc<InMemoryDirectory>,
    pub articles: Arc<InMemoryArticleStore>,
    pub assignments: Arc<InMemoryAssignmentStore>,
    pub workflow: EditorialWorkflow,
    pub journal: Journal,
    pub author: UserId,
    pub secretary: UserId,
    pub editor: UserId,
    pub chief: UserId,
    pub layout: UserId,
    pub reviewers: [UserId; 3],
}

impl Harness {
    pub async fn new(config: EditorialConfig) -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let journal = Journal::new(OrganizationId::new(), "Journal of Applied Hydrology");
        directory.add_journal(journal.clone()).await;

        let articles = Arc::new(InMemoryArticleStore::new());
        let assignments = Arc::new(InMemoryAssignmentStore::new());
        let grants = Arc::new(GrantResolver::new(directory.clone(), directory.clone()));
        let workflow = EditorialWorkflow::new(
            config,
            articles.clone(),
            assignments.clone(),
            Arc::new(InMemoryReviewStore::new()),
            grants,
        )
        .unwrap();

        let harness = Self {
            directory,
            articles,
            assignments,
            workflow,
            journal,
            author: UserId::new(),
            secretary: UserId::new(),
            editor: UserId::new(),
            chief: UserId::new(),
            layout: UserId::new(),
            reviewers: [UserId::new(), UserId::new(), UserId::new()],
        };
        harness.give(harness.author, JournalRole::Author).await;
        harness.give(harness.secretary, JournalRole::Secretary).await;
        harness.give(harness.editor, JournalRole::Editor).await;
        harness.give(harness.chief, JournalRole::ChiefEditor).await;
        harness.give(harness.layout, JournalRole::LayoutEditor).await;
        for reviewer in harness.reviewers {
            harness.give(reviewer, JournalRole::Reviewer).await;
        }
        harness
    }

    pub async fn with_defaults() -> Self {
        Self::new(EditorialConfig::default()).await
    }

    /// Grant a journal role and tell the grant cache about it
    pub async fn give(&self, user: UserId, role: JournalRole) {
        let event = self
            .directory
            .grant_journal_role(user, self.journal.id, role)
            .await;
        self.workflow.grants().on_membership_event(&event).await;
    }

    pub async fn take(&self, user: UserId, role: JournalRole) {
        let event = self
            .directory
            .revoke_journal_role(user, self.journal.id, role)
            .await;
        self.workflow.grants().on_membership_event(&event).await;
    }

    pub async fn make_org_admin(&self, user: UserId) {
        let event = self
            .directory
            .grant_organization_role(user, self.journal.organization, OrganizationRole::Admin)
            .await;
        self.workflow.grants().on_membership_event(&event).await;
    }

    pub async fn stored(&self, id: ArticleId) -> Article {
        use imprimatur_core::ArticleStore;
        self.articles.get(id).await.unwrap().unwrap()
    }

    /// A freshly submitted article
    pub async fn submitted(&self) -> ArticleId {
        let draft = self
            .workflow
            .create_draft(self.author, self.journal.id, "Groundwater Recharge in Karst")
            .await
            .unwrap();
        self.workflow.submit(self.author, draft.id).await.unwrap();
        draft.id
    }

    /// An article that passed screening
    pub async fn under_review(&self) -> ArticleId {
        let id = self.submitted().await;
        self.workflow.open(self.secretary, id).await.unwrap();
        self.workflow
            .screen(self.secretary, id, passing_checklist())
            .await
            .unwrap();
        id
    }
}

pub fn passing_checklist() -> ScreeningChecklist {
    ScreeningChecklist::new(ThematicFit::InScope)
        .with_formatting(FormattingChecks::all_passed())
        .with_plagiarism(85.0, Some(10.0), Some("AP-2024-117".to_string()))
}
