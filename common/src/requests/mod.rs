use serde::{Deserialize, Serialize};

/// Request payload for the batch generation endpoint.
///
/// `template` and `excel_file` reference previously uploaded assets by their
/// original filenames; `name_column` selects the dataset column holding
/// recipient names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub template: String,
    pub excel_file: String,
    pub name_column: String,
    pub event_name: String,
    pub date: String,
    pub github_username: String,
    pub github_repo: String,
}
