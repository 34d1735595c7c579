use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedTemplate {
    pub filename: String,
    pub path: String,
}

/// Upload response for a tabular dataset: storage location plus a bounded
/// preview of the parsed content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedDataset {
    pub filename: String,
    pub path: String,
    pub columns: Vec<String>,
    /// At most the first five rows, as column-name to value maps.
    pub preview: Vec<HashMap<String, String>>,
    pub total_rows: usize,
}
