//! Seam to the external plagiarism scanning service.
//!
//! The service is opaque: documents go in, a scan id comes back, and polling
//! eventually yields an originality score. Only the score is used, as the
//! checklist's originality percentage.

use async_trait::async_trait;
use imprimatur_domain::{ArticleId, ScreeningChecklist};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identifier assigned by the scanning service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(pub String);

/// The manuscript file handed to the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub article: ArticleId,
    /// Location of the file in the host's file storage
    pub location: String,
}

/// Progress of a scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanStatus {
    pub ready: bool,
    /// Originality in percent, present once ready
    pub score: Option<f64>,
}

impl ScanStatus {
    /// Copy a finished score into the checklist; returns whether anything changed
    pub fn apply_to(&self, checklist: &mut ScreeningChecklist, scan: &ScanId) -> bool {
        match (self.ready, self.score) {
            (true, Some(score)) => {
                checklist.originality = Some(score);
                if checklist.report.is_none() {
                    checklist.report = Some(scan.0.clone());
                }
                true
            }
            _ => false,
        }
    }
}

/// External plagiarism scanner.
///
/// Failures are reported as `EditorialError::UpstreamUnavailable`.
#[async_trait]
pub trait PlagiarismService: Send + Sync {
    /// Submit a document for scanning
    async fn submit(&self, document: &DocumentRef) -> Result<ScanId>;

    /// Poll the status of a scan
    async fn poll(&self, scan: &ScanId) -> Result<ScanStatus>;
}

/// Poll `scan` once and copy a finished score into the checklist.
///
/// Returns false while the scan is still running.
pub async fn refresh_checklist(
    service: &dyn PlagiarismService,
    scan: &ScanId,
    checklist: &mut ScreeningChecklist,
) -> Result<bool> {
    let status = service.poll(scan).await?;
    let applied = status.apply_to(checklist, scan);
    tracing::debug!(scan = %scan.0, ready = status.ready, applied, "polled plagiarism scan");
    Ok(applied)
}
