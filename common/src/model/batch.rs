use serde::{Deserialize, Serialize};

use crate::model::certificate::CertificateSummary;

/// A row the generator could not turn into a certificate.
///
/// Row failures do not abort the batch; they are collected and returned so
/// the caller can see exactly which recipients are missing from the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowFailure {
    /// Zero-based index of the row in the dataset (file order).
    pub row: usize,
    /// The row's name-column value, as far as it could be read.
    pub name: String,
    pub reason: String,
}

/// Result of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: String,
    /// `https://{username}.github.io/{repo}`, where the publish directory is
    /// expected to be hosted.
    pub github_base_url: String,
    /// Number of certificates actually produced (may be lower than the row
    /// count; see `failed_rows`).
    pub total_certificates: usize,
    /// Preview: at most the first five summaries.
    pub certificates: Vec<CertificateSummary>,
    pub failed_rows: Vec<RowFailure>,
    pub download_url: String,
}
