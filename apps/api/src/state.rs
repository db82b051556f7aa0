use std::sync::Arc;

use crate::config::Config;
use crate::critique::CritiqueClient;
use crate::extraction::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Document-to-text backend. Default: PdfTextExtractor.
    pub extractor: Arc<dyn TextExtractor>,
    pub critic: CritiqueClient,
}
