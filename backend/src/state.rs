use std::sync::Arc;

use crate::fonts::FontLibrary;
use crate::storage::ContentStore;

/// Shared application state, injected into handlers as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    /// Store for uploaded assets (`templates/`, `excel/`).
    pub uploads: Arc<dyn ContentStore>,
    /// Store for generated artifacts (`certificates/`, `docs/`, archives).
    pub output: Arc<dyn ContentStore>,
    pub fonts: Arc<FontLibrary>,
}
