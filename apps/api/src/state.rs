use std::sync::Arc;

use crate::article::store::ArticleStore;
use crate::article::writer::ArticleWriter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: ArticleStore,
    /// Pluggable text / speech backend. Default: `LlmClient`.
    pub writer: Arc<dyn ArticleWriter>,
}
