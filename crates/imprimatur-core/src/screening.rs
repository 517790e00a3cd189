//! Screening validator
//!
//! Evaluation is a pure function of the checklist and the rules: every rule
//! runs, each contributes at most one problem, and problems come back in rule
//! order.

use imprimatur_domain::{ArticleStatus, ScreeningChecklist, ScreeningSubmission, ThematicFit};
use serde::{Deserialize, Serialize};

/// Thresholds applied during screening
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningRules {
    /// Minimum originality, in percent
    pub min_originality: f64,
    /// Maximum matched text, in percent
    pub max_matches: f64,
    /// Whether a plagiarism report reference must be attached
    pub require_report: bool,
}

impl Default for ScreeningRules {
    fn default() -> Self {
        Self {
            min_originality: 80.0,
            max_matches: 20.0,
            require_report: true,
        }
    }
}

/// Verdict of a screening evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningEvaluation {
    pub passed: bool,
    pub problems: Vec<String>,
}

type Rule = fn(&ScreeningChecklist, &ScreeningRules) -> Option<String>;

const RULES: [Rule; 5] = [
    thematic_rule,
    formatting_rule,
    originality_rule,
    matches_rule,
    report_rule,
];

fn is_percentage(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

fn thematic_rule(checklist: &ScreeningChecklist, _: &ScreeningRules) -> Option<String> {
    match checklist.thematic {
        ThematicFit::InScope => None,
        ThematicFit::Borderline => {
            let commented = checklist
                .thematic_comment
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty());
            (!commented).then(|| "comment required for borderline thematic".to_string())
        }
        ThematicFit::OutOfScope => Some("thematic fit is out of scope".to_string()),
    }
}

fn formatting_rule(checklist: &ScreeningChecklist, _: &ScreeningRules) -> Option<String> {
    let failures = checklist.formatting.failures();
    (!failures.is_empty())
        .then(|| format!("formatting requirements not met: {}", failures.join(", ")))
}

fn originality_rule(checklist: &ScreeningChecklist, rules: &ScreeningRules) -> Option<String> {
    match checklist.originality {
        None => Some("originality percentage is required".to_string()),
        Some(value) if !is_percentage(value) => {
            Some(format!("originality {}% is not a valid percentage", value))
        }
        Some(value) if value < rules.min_originality => Some(format!(
            "originality {}% is below the minimum of {}%",
            value, rules.min_originality
        )),
        Some(_) => None,
    }
}

fn matches_rule(checklist: &ScreeningChecklist, rules: &ScreeningRules) -> Option<String> {
    match checklist.matches {
        None => None,
        Some(value) if !is_percentage(value) => {
            Some(format!("matches {}% is not a valid percentage", value))
        }
        Some(value) if value > rules.max_matches => Some(format!(
            "matches {}% exceed the maximum of {}%",
            value, rules.max_matches
        )),
        Some(_) => None,
    }
}

fn report_rule(checklist: &ScreeningChecklist, rules: &ScreeningRules) -> Option<String> {
    let present = checklist
        .report
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty());
    (rules.require_report && !present)
        .then(|| "plagiarism report reference is required".to_string())
}

impl ScreeningRules {
    /// Evaluate a checklist against these rules
    pub fn evaluate(&self, checklist: &ScreeningChecklist) -> ScreeningEvaluation {
        let problems: Vec<String> = RULES
            .iter()
            .filter_map(|rule| rule(checklist, self))
            .collect();
        ScreeningEvaluation {
            passed: problems.is_empty(),
            problems,
        }
    }

    /// Convert a checklist to the store's screening submission shape
    pub fn to_submission(&self, checklist: &ScreeningChecklist) -> ScreeningSubmission {
        let evaluation = self.evaluate(checklist);
        let formatting = &checklist.formatting;
        let antiplag_ok = originality_rule(checklist, self).is_none()
            && matches_rule(checklist, self).is_none()
            && report_rule(checklist, self).is_none();

        let notes = match checklist.comment.as_deref() {
            Some(comment) if !comment.trim().is_empty() => comment.to_string(),
            _ => evaluation.problems.join("\n"),
        };

        ScreeningSubmission {
            scope_ok: thematic_rule(checklist, self).is_none(),
            format_ok: formatting.template_used
                && formatting.citation_style
                && formatting.figures_tables,
            zgs_ok: formatting.required_sections,
            antiplag_ok,
            notes,
            next_status: if evaluation.passed {
                ArticleStatus::UnderReview
            } else {
                ArticleStatus::Submitted
            },
        }
    }
}

/// Evaluate a checklist against the default rules
pub fn evaluate(checklist: &ScreeningChecklist) -> ScreeningEvaluation {
    ScreeningRules::default().evaluate(checklist)
}
