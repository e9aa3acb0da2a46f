use std::sync::Arc;

use crate::export::retry::RetryPolicy;
use crate::export::storage::ExportUploader;
use crate::layout::LayoutConfig;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable resume store. Default: `PgResumeStore`.
    pub store: Arc<dyn ResumeStore>,
    /// Set when `EXPORT_PERSIST` is enabled. Default: `ExportStorage`.
    pub storage: Option<Arc<dyn ExportUploader>>,
    pub retry: RetryPolicy,
    /// Page geometry handed to every render call.
    pub layout: LayoutConfig,
}
