use std::sync::Arc;

use crate::config::Config;
use crate::extraction::fields::FieldExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable field extractor. Default: LlmFieldExtractor over the configured model.
    pub extractor: Arc<dyn FieldExtractor>,
    pub config: Config,
}
