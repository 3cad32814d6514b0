use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmProvider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    /// The one provider selected by `LLM_PROVIDER`.
    pub llm: Arc<dyn LlmProvider>,
    pub config: Config,
}
