use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::store::ResumeStore;
use crate::tailoring::filler::FillerPolicy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model backend. `OllamaClient` in production, fakes in tests.
    pub llm: Arc<dyn TextGenerator>,
    pub store: ResumeStore,
    /// Bullets used for entries left with none. Default: `GenericFiller`.
    pub filler: Arc<dyn FillerPolicy>,
    pub config: Config,
}
