//! The editorial workflow façade
//!
//! Every status change goes the same way: load the article, resolve the
//! actor's grant, let the [`WorkflowMachine`] plan the transition, then
//! write it with a conditional update on the status it was planned from.

use std::sync::Arc;

use imprimatur_access::{Grant, GrantResolver, Permissions};
use imprimatur_domain::{
    Article, ArticleId, ArticleStatus, JournalId, ScreeningChecklist, ScreeningSubmission, UserId,
};

use crate::config::{ConfigError, EditorialConfig};
use crate::error::{EditorialError, Result};
use crate::review::ReviewerAssignments;
use crate::store::{ArticleStore, AssignmentStore, ReviewStore, StoreError};
use crate::workflow::{rule, Decision, Evidence, TransitionRequest, WorkflowMachine};

/// Entry point for all workflow operations on articles
pub struct EditorialWorkflow {
    articles: Arc<dyn ArticleStore>,
    grants: Arc<GrantResolver>,
    machine: WorkflowMachine,
    reviewers: ReviewerAssignments,
}

impl EditorialWorkflow {
    /// Build the workflow; `config` is validated first
    pub fn new(
        config: EditorialConfig,
        articles: Arc<dyn ArticleStore>,
        assignments: Arc<dyn AssignmentStore>,
        reviews: Arc<dyn ReviewStore>,
        grants: Arc<GrantResolver>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let reviewers = ReviewerAssignments::new(
            articles.clone(),
            assignments,
            reviews,
            grants.clone(),
            config.review.clone(),
        );
        Ok(Self {
            articles,
            grants,
            machine: WorkflowMachine::new(config),
            reviewers,
        })
    }

    pub fn machine(&self) -> &WorkflowMachine {
        &self.machine
    }

    /// Reviewer invitations and reviews
    pub fn reviewers(&self) -> &ReviewerAssignments {
        &self.reviewers
    }

    pub fn grants(&self) -> &GrantResolver {
        &self.grants
    }

    async fn article(&self, id: ArticleId) -> Result<Article> {
        self.articles
            .get(id)
            .await?
            .ok_or_else(|| EditorialError::NotFound(format!("article {}", id)))
    }

    async fn grant(&self, actor: UserId, article: &Article) -> Result<Grant> {
        Ok(self.grants.resolve(actor, article.journal).await?)
    }

    /// Start a new draft in `journal`
    pub async fn create_draft(
        &self,
        actor: UserId,
        journal: JournalId,
        title: impl Into<String>,
    ) -> Result<Article> {
        let grant = self.grants.resolve(actor, journal).await?;
        grant.require(Permissions::ARTICLE_SUBMIT)?;

        let article = Article::new(journal, actor, title);
        self.articles.save(article.clone()).await?;
        tracing::info!(article = %article.id, %journal, author = %actor, "draft created");
        Ok(article)
    }

    /// View an article.
    ///
    /// The first view of a submitted article by someone with screening
    /// rights moves it into screening. Repeating the view, or losing the
    /// race to another screener, leaves it there without another note.
    pub async fn open(&self, actor: UserId, article_id: ArticleId) -> Result<Article> {
        let article = self.article(article_id).await?;
        let grant = self.grant(actor, &article).await?;
        if !grant.allows(Permissions::ARTICLE_VIEW) && !article.is_authored_by(&actor) {
            return Err(EditorialError::PermissionDenied(format!(
                "user {} may not view article {}",
                actor, article.id
            )));
        }

        let opens_screening = article.status == ArticleStatus::Submitted
            && grant.allows(Permissions::ARTICLE_SCREENING)
            && !article.is_authored_by(&actor);
        if !opens_screening {
            return Ok(article);
        }

        let planned = self.machine.plan(
            &article,
            &grant,
            &TransitionRequest::to(ArticleStatus::Screening),
            &Evidence::none(),
        )?;
        match self
            .articles
            .update_if_status(article.id, planned.from, planned.into_update())
            .await
        {
            Ok(updated) => {
                tracing::info!(article = %updated.id, %actor, "screening opened");
                Ok(updated)
            }
            Err(StoreError::Conflict(_)) => {
                tracing::debug!(article = %article.id, "screening already opened");
                self.article(article.id).await
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Apply a transition on behalf of `actor`.
    ///
    /// The review count for quorum guards is read from the assignment store;
    /// any count passed in `evidence` is ignored.
    pub async fn transition(
        &self,
        actor: UserId,
        article_id: ArticleId,
        request: TransitionRequest,
        mut evidence: Evidence,
    ) -> Result<Article> {
        let article = self.article(article_id).await?;
        let grant = self.grant(actor, &article).await?;

        evidence.completed_reviews = 0;
        let needs_quorum = rule(article.status, request.target)
            .is_some_and(|edge| edge.guard.needs_quorum());
        if needs_quorum && !grant.is_empty() {
            evidence.completed_reviews = self.reviewers.completed_count(article.id).await?;
        }

        let planned = match self.machine.plan(&article, &grant, &request, &evidence) {
            Ok(planned) => planned,
            Err(err) => {
                tracing::warn!(
                    article = %article.id,
                    %actor,
                    from = %article.status,
                    to = %request.target,
                    code = err.code(),
                    "transition refused"
                );
                return Err(err);
            }
        };

        let (from, to) = (planned.from, planned.to);
        let updated = self
            .articles
            .update_if_status(article.id, from, planned.into_update())
            .await?;
        tracing::info!(article = %updated.id, %actor, %from, %to, "transition applied");
        Ok(updated)
    }

    /// Submit a draft, or a returned article, for screening
    pub async fn submit(&self, actor: UserId, article: ArticleId) -> Result<Article> {
        self.transition(
            actor,
            article,
            TransitionRequest::to(ArticleStatus::Submitted),
            Evidence::none(),
        )
        .await
    }

    /// Pass screening with a filled-in checklist
    pub async fn screen(
        &self,
        actor: UserId,
        article: ArticleId,
        checklist: ScreeningChecklist,
    ) -> Result<Article> {
        self.transition(
            actor,
            article,
            TransitionRequest::to(ArticleStatus::UnderReview),
            Evidence::checklist(checklist),
        )
        .await
    }

    pub async fn return_to_author(
        &self,
        actor: UserId,
        article: ArticleId,
        reason: impl Into<String>,
    ) -> Result<Article> {
        self.transition(
            actor,
            article,
            TransitionRequest::to(ArticleStatus::ReturnedToAuthor).with_reason(reason),
            Evidence::none(),
        )
        .await
    }

    /// Send a revised manuscript back: to screening after a return, to
    /// review after a revision request.
    ///
    /// From any other status this asks for `submitted`, so the machine's
    /// usual check order decides the outcome.
    pub async fn resubmit(&self, actor: UserId, article_id: ArticleId) -> Result<Article> {
        let article = self.article(article_id).await?;
        let target = match article.status {
            ArticleStatus::RevisionMinor | ArticleStatus::RevisionMajor => {
                ArticleStatus::UnderReview
            }
            _ => ArticleStatus::Submitted,
        };
        self.transition(
            actor,
            article_id,
            TransitionRequest::to(target),
            Evidence::none(),
        )
        .await
    }

    /// Move a reviewed article to the decision stage
    pub async fn request_decision(&self, actor: UserId, article: ArticleId) -> Result<Article> {
        self.transition(
            actor,
            article,
            TransitionRequest::to(ArticleStatus::DecisionPending),
            Evidence::none(),
        )
        .await
    }

    /// Record an editorial decision
    pub async fn decide(
        &self,
        actor: UserId,
        article: ArticleId,
        decision: Decision,
    ) -> Result<Article> {
        self.transition(
            actor,
            article,
            TransitionRequest::decide(decision),
            Evidence::none(),
        )
        .await
    }

    pub async fn send_to_production(&self, actor: UserId, article: ArticleId) -> Result<Article> {
        self.transition(
            actor,
            article,
            TransitionRequest::to(ArticleStatus::InProduction),
            Evidence::none(),
        )
        .await
    }

    pub async fn publish(&self, actor: UserId, article: ArticleId) -> Result<Article> {
        self.transition(
            actor,
            article,
            TransitionRequest::to(ArticleStatus::Published),
            Evidence::none(),
        )
        .await
    }

    /// The checklist in the store's screening submission shape
    pub fn screening_submission(&self, checklist: &ScreeningChecklist) -> ScreeningSubmission {
        self.machine.config().screening.to_submission(checklist)
    }

    pub async fn is_ready_for_decision(&self, article: ArticleId) -> Result<bool> {
        self.reviewers.is_ready_for_decision(article).await
    }

    /// Articles of `journal` in `status`, for actors who may view them
    pub async fn list_by_status(
        &self,
        actor: UserId,
        journal: JournalId,
        status: ArticleStatus,
    ) -> Result<Vec<Article>> {
        let grant = self.grants.resolve(actor, journal).await?;
        grant.require(Permissions::ARTICLE_VIEW)?;
        Ok(self.articles.list_by_status(journal, status).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryArticleStore, InMemoryAssignmentStore, InMemoryReviewStore};
    use imprimatur_access::{InMemoryDirectory, JournalRole};
    use imprimatur_domain::{Journal, NoteKind, OrganizationId};

    struct Fixture {
        directory: Arc<InMemoryDirectory>,
        workflow: EditorialWorkflow,
        journal: Journal,
        author: UserId,
        secretary: UserId,
    }

    async fn fixture() -> Fixture {
        fixture_with(EditorialConfig::default()).await.unwrap()
    }

    async fn fixture_with(config: EditorialConfig) -> std::result::Result<Fixture, ConfigError> {
        let directory = Arc::new(InMemoryDirectory::new());
        let journal = Journal::new(OrganizationId::new(), "Letters in Geology");
        directory.add_journal(journal.clone()).await;
        let author = UserId::new();
        let secretary = UserId::new();
        directory
            .grant_journal_role(author, journal.id, JournalRole::Author)
            .await;
        directory
            .grant_journal_role(secretary, journal.id, JournalRole::Secretary)
            .await;

        let grants = Arc::new(GrantResolver::new(directory.clone(), directory.clone()));
        let workflow = EditorialWorkflow::new(
            config,
            Arc::new(InMemoryArticleStore::new()),
            Arc::new(InMemoryAssignmentStore::new()),
            Arc::new(InMemoryReviewStore::new()),
            grants,
        )?;
        Ok(Fixture {
            directory,
            workflow,
            journal,
            author,
            secretary,
        })
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let zero = fixture_with(EditorialConfig::default().with_quorum(0)).await;
        assert!(matches!(zero, Err(ConfigError::OutOfRange(_))));

        let three = fixture_with(EditorialConfig::default().with_quorum(3)).await;
        assert!(three.is_err());

        let two = fixture_with(EditorialConfig::default().with_quorum(2)).await;
        assert_eq!(two.unwrap().workflow.machine().config().review.quorum, 2);
    }

    #[tokio::test]
    async fn test_draft_submit_and_open() {
        let f = fixture().await;
        let draft = f
            .workflow
            .create_draft(f.author, f.journal.id, "Basalt Weathering")
            .await
            .unwrap();
        assert_eq!(draft.status, ArticleStatus::Draft);

        let submitted = f.workflow.submit(f.author, draft.id).await.unwrap();
        assert_eq!(submitted.status, ArticleStatus::Submitted);

        // The author viewing it does not open screening
        let viewed = f.workflow.open(f.author, draft.id).await.unwrap();
        assert_eq!(viewed.status, ArticleStatus::Submitted);

        let opened = f.workflow.open(f.secretary, draft.id).await.unwrap();
        assert_eq!(opened.status, ArticleStatus::Screening);
        assert_eq!(opened.notes.len(), 2);
        assert_eq!(opened.notes[1].kind, NoteKind::StatusChange);
    }

    #[tokio::test]
    async fn test_stranger_cannot_view() {
        let f = fixture().await;
        let draft = f
            .workflow
            .create_draft(f.author, f.journal.id, "Basalt Weathering")
            .await
            .unwrap();
        let err = f.workflow.open(UserId::new(), draft.id).await.unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_create_draft_requires_submit() {
        let f = fixture().await;
        let err = f
            .workflow
            .create_draft(f.secretary, f.journal.id, "Not Mine")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_return_and_resubmit() {
        let f = fixture().await;
        let draft = f
            .workflow
            .create_draft(f.author, f.journal.id, "Basalt Weathering")
            .await
            .unwrap();
        f.workflow.submit(f.author, draft.id).await.unwrap();
        f.workflow.open(f.secretary, draft.id).await.unwrap();

        let returned = f
            .workflow
            .return_to_author(f.secretary, draft.id, "abstract missing")
            .await
            .unwrap();
        assert_eq!(returned.status, ArticleStatus::ReturnedToAuthor);
        assert_eq!(returned.last_note().unwrap().kind, NoteKind::ReturnToAuthor);

        let resubmitted = f.workflow.resubmit(f.author, draft.id).await.unwrap();
        assert_eq!(resubmitted.status, ArticleStatus::Submitted);
    }

    #[tokio::test]
    async fn test_resubmit_during_screening_is_illegal() {
        let f = fixture().await;
        let draft = f
            .workflow
            .create_draft(f.author, f.journal.id, "Basalt Weathering")
            .await
            .unwrap();
        f.workflow.submit(f.author, draft.id).await.unwrap();
        f.workflow.open(f.secretary, draft.id).await.unwrap();

        let err = f.workflow.resubmit(f.author, draft.id).await.unwrap_err();
        assert!(matches!(
            err,
            EditorialError::IllegalTransition {
                from: ArticleStatus::Screening,
                to: ArticleStatus::Submitted,
            }
        ));
    }

    #[tokio::test]
    async fn test_stranger_cannot_resubmit() {
        let f = fixture().await;
        let draft = f
            .workflow
            .create_draft(f.author, f.journal.id, "Basalt Weathering")
            .await
            .unwrap();
        f.workflow.submit(f.author, draft.id).await.unwrap();
        f.workflow.open(f.secretary, draft.id).await.unwrap();

        let err = f.workflow.resubmit(UserId::new(), draft.id).await.unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_directory_outage_is_retryable() {
        let f = fixture().await;
        let draft = f
            .workflow
            .create_draft(f.author, f.journal.id, "Basalt Weathering")
            .await
            .unwrap();
        f.workflow.grants().cache().clear().await;
        f.directory.set_unavailable(true);
        let err = f.workflow.submit(f.author, draft.id).await.unwrap_err();
        assert!(err.is_retryable());

        f.directory.set_unavailable(false);
        let article = f.workflow.open(f.author, draft.id).await.unwrap();
        assert_eq!(article.status, ArticleStatus::Draft);
        assert!(article.notes.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let f = fixture().await;
        let draft = f
            .workflow
            .create_draft(f.author, f.journal.id, "Basalt Weathering")
            .await
            .unwrap();
        let drafts = f
            .workflow
            .list_by_status(f.secretary, f.journal.id, ArticleStatus::Draft)
            .await
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, draft.id);
    }
}
