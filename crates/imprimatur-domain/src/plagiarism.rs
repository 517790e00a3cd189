//! Plagiarism check results attached to an article

use serde::{Deserialize, Serialize};

/// Outcome of an external plagiarism scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismResult {
    /// Share of the text judged original, in percent
    pub originality: f64,
    /// Share of the text matching other sources, in percent
    pub matches: Option<f64>,
    /// Reference to the full report in the scanning service
    pub report: Option<String>,
}
