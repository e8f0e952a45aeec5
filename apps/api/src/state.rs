use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatCompletion;
use crate::store::SearchStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// One store client and one LLM client per process; handlers borrow them.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SearchStore>,
    pub llm: Arc<dyn ChatCompletion>,
    pub config: Config,
}
