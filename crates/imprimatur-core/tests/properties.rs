//! Property-based tests for the transition table, permission gating and
//! screening evaluation

mod common;

use common::Harness;
use imprimatur_access::{
    Grant, JournalMembership, JournalRole, OrganizationMembership, OrganizationRole,
};
use imprimatur_core::workflow::rule;
use imprimatur_core::{
    screening, EditorialError, Evidence, ScreeningRules, TransitionRequest, WorkflowMachine,
};
use imprimatur_domain::{
    Article, ArticleStatus, FormattingChecks, JournalId, OrganizationId, ScreeningChecklist,
    ThematicFit, UserId,
};
use proptest::prelude::*;

fn any_status() -> impl Strategy<Value = ArticleStatus> {
    prop::sample::select(ArticleStatus::ALL.to_vec())
}

fn any_role_set() -> impl Strategy<Value = Vec<JournalRole>> {
    prop::collection::vec(prop::sample::select(JournalRole::ALL.to_vec()), 0..4)
}

fn any_checklist() -> impl Strategy<Value = ScreeningChecklist> {
    (
        prop::sample::select(vec![
            ThematicFit::InScope,
            ThematicFit::Borderline,
            ThematicFit::OutOfScope,
        ]),
        prop::option::of("[a-z ]{0,12}"),
        any::<[bool; 4]>(),
        prop::option::of(-20.0f64..120.0),
        prop::option::of(-20.0f64..120.0),
        prop::option::of("[A-Z]{0,2}-?[0-9]{0,4}"),
    )
        .prop_map(|(thematic, comment, checks, originality, matches, report)| {
            let mut checklist = ScreeningChecklist::new(thematic).with_formatting(FormattingChecks {
                template_used: checks[0],
                required_sections: checks[1],
                citation_style: checks[2],
                figures_tables: checks[3],
            });
            checklist.thematic_comment = comment;
            checklist.originality = originality;
            checklist.matches = matches;
            checklist.report = report;
            checklist
        })
}

fn article_in(journal: JournalId, status: ArticleStatus) -> Article {
    Article::new(journal, UserId::new(), "Property Article").with_status(status)
}

fn org_admin(journal: JournalId, organization: OrganizationId) -> Grant {
    let user = UserId::new();
    let admin = OrganizationMembership::new(user, organization, OrganizationRole::Admin);
    Grant::from_memberships(user, journal, organization, &[], &[admin])
}

proptest! {
    #[test]
    fn test_unlisted_edges_are_illegal(from in any_status(), to in any_status()) {
        prop_assume!(rule(from, to).is_none());
        let journal = JournalId::new();
        let article = article_in(journal, from);
        let grant = org_admin(journal, OrganizationId::new());

        let err = WorkflowMachine::default()
            .plan(&article, &grant, &TransitionRequest::to(to), &Evidence::reviews(2))
            .unwrap_err();
        let is_illegal = matches!(err, EditorialError::IllegalTransition { .. });
        prop_assert!(is_illegal);
    }

    #[test]
    fn test_empty_grant_is_always_denied(from in any_status(), to in any_status()) {
        let journal = JournalId::new();
        let article = article_in(journal, from);
        let grant = Grant::empty(UserId::new(), journal, OrganizationId::new());

        let err = WorkflowMachine::default()
            .plan(&article, &grant, &TransitionRequest::to(to), &Evidence::reviews(2))
            .unwrap_err();
        prop_assert_eq!(err.code(), "FORBIDDEN");
    }

    #[test]
    fn test_inactive_memberships_grant_nothing(roles in any_role_set()) {
        let user = UserId::new();
        let journal = JournalId::new();
        let memberships: Vec<JournalMembership> = roles
            .iter()
            .map(|role| JournalMembership::new(user, journal, *role).inactive())
            .collect();
        let grant = Grant::from_memberships(user, journal, OrganizationId::new(), &memberships, &[]);
        prop_assert!(grant.is_empty());
    }

    #[test]
    fn test_duplicate_roles_do_not_change_grant(roles in any_role_set()) {
        let user = UserId::new();
        let journal = JournalId::new();
        let organization = OrganizationId::new();
        let once: Vec<JournalMembership> = roles
            .iter()
            .map(|role| JournalMembership::new(user, journal, *role))
            .collect();
        let twice: Vec<JournalMembership> = once.iter().chain(once.iter()).cloned().collect();

        let a = Grant::from_memberships(user, journal, organization, &once, &[]);
        let b = Grant::from_memberships(user, journal, organization, &twice, &[]);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_screening_is_deterministic(checklist in any_checklist()) {
        let first = screening::evaluate(&checklist);
        let second = screening::evaluate(&checklist);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.passed, first.problems.is_empty());
        prop_assert!(first.problems.len() <= 5);
    }

    #[test]
    fn test_stricter_rules_never_pass_more(checklist in any_checklist()) {
        let default = ScreeningRules::default();
        let strict = ScreeningRules {
            min_originality: 95.0,
            max_matches: 5.0,
            require_report: true,
        };
        if strict.evaluate(&checklist).passed {
            prop_assert!(default.evaluate(&checklist).passed);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_refused_transition_leaves_store_unchanged(to in any_status()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let h = Harness::with_defaults().await;
            let id = h.submitted().await;
            let before = h.stored(id).await;

            let result = h
                .workflow
                .transition(h.chief, id, TransitionRequest::to(to), Evidence::none())
                .await;
            let after = h.stored(id).await;
            match result {
                Ok(updated) => {
                    assert_eq!(updated, after);
                    assert_eq!(after.notes.len(), before.notes.len() + 1);
                }
                Err(_) => assert_eq!(after, before),
            }
        });
    }
}
