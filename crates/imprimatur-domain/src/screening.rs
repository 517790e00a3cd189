//! Screening checklist filled in by the editorial office

use serde::{Deserialize, Serialize};

use crate::{ArticleStatus, PlagiarismResult};

/// Whether the manuscript fits the journal's subject area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThematicFit {
    InScope,
    Borderline,
    OutOfScope,
}

/// Formatting checks, all of which must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormattingChecks {
    pub template_used: bool,
    pub required_sections: bool,
    pub citation_style: bool,
    pub figures_tables: bool,
}

impl FormattingChecks {
    /// All checks satisfied
    pub fn all_passed() -> Self {
        Self {
            template_used: true,
            required_sections: true,
            citation_style: true,
            figures_tables: true,
        }
    }

    /// Names of the checks that failed, in a fixed order
    pub fn failures(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.template_used {
            failed.push("template");
        }
        if !self.required_sections {
            failed.push("required sections");
        }
        if !self.citation_style {
            failed.push("citation style");
        }
        if !self.figures_tables {
            failed.push("figures/tables");
        }
        failed
    }
}

/// The editorial pre-check for a manuscript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningChecklist {
    pub thematic: ThematicFit,
    #[serde(default)]
    pub thematic_comment: Option<String>,
    pub formatting: FormattingChecks,
    /// Originality reported by the plagiarism scan, in percent
    #[serde(default)]
    pub originality: Option<f64>,
    /// Matched text reported by the plagiarism scan, in percent
    #[serde(default)]
    pub matches: Option<f64>,
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ScreeningChecklist {
    /// An empty checklist for the given thematic classification
    pub fn new(thematic: ThematicFit) -> Self {
        Self {
            thematic,
            thematic_comment: None,
            formatting: FormattingChecks::default(),
            originality: None,
            matches: None,
            report: None,
            comment: None,
        }
    }

    pub fn with_thematic_comment(mut self, comment: impl Into<String>) -> Self {
        self.thematic_comment = Some(comment.into());
        self
    }

    pub fn with_formatting(mut self, formatting: FormattingChecks) -> Self {
        self.formatting = formatting;
        self
    }

    pub fn with_plagiarism(
        mut self,
        originality: f64,
        matches: Option<f64>,
        report: Option<String>,
    ) -> Self {
        self.originality = Some(originality);
        self.matches = matches;
        self.report = report;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The scan figures as an article plagiarism result, once a score is in
    pub fn plagiarism_result(&self) -> Option<PlagiarismResult> {
        self.originality.map(|originality| PlagiarismResult {
            originality,
            matches: self.matches,
            report: self.report.clone(),
        })
    }
}

/// Checklist in the shape the external store accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningSubmission {
    pub scope_ok: bool,
    pub format_ok: bool,
    /// Structural check: the manuscript contains the required sections
    pub zgs_ok: bool,
    pub antiplag_ok: bool,
    pub notes: String,
    /// Either `under_review` or `submitted`
    pub next_status: ArticleStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_failures_in_order() {
        let checks = FormattingChecks {
            template_used: false,
            required_sections: true,
            citation_style: false,
            figures_tables: true,
        };
        assert_eq!(checks.failures(), vec!["template", "citation style"]);
        assert!(FormattingChecks::all_passed().failures().is_empty());
    }

    #[test]
    fn test_checklist_deserializes_with_defaults() {
        let json = r#"{
            "thematic": "borderline",
            "formatting": {
                "template_used": true,
                "required_sections": true,
                "citation_style": true,
                "figures_tables": true
            }
        }"#;
        let checklist: ScreeningChecklist = serde_json::from_str(json).unwrap();
        assert_eq!(checklist.thematic, ThematicFit::Borderline);
        assert!(checklist.originality.is_none());
        assert!(checklist.thematic_comment.is_none());
    }
}
