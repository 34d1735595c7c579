use serde::{Deserialize, Serialize};

/// The persisted metadata for one generated certificate.
///
/// One record is written per dataset row, as a JSON sidecar next to the
/// rendered image in the batch's publish directory. The sidecar is the sole
/// source of truth for the verification lookup: `GET /verify/{id}` returns
/// exactly these fields, parsed back from disk.
///
/// `id` is a random UUID v4 generated per row, never derived from the row's
/// content, so two identical rows always produce two distinct records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub id: String,
    /// The row's value for the chosen name column; may be empty.
    pub name: String,
    pub event: String,
    /// Caller-supplied date string, stored verbatim (no format validation).
    pub date: String,
    /// RFC 3339 issuance timestamp, set when the row is processed.
    pub issued_at: String,
}

/// Per-certificate entry in the batch response, pointing at the published
/// artifacts by their filenames inside the publish directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateSummary {
    pub id: String,
    pub name: String,
    pub event: String,
    pub date: String,
    pub image_url: String,
    pub verification_url: String,
}
