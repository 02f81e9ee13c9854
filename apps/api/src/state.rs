use std::sync::Arc;

use crate::ats_client::AtsClient;
use crate::llm_client::TextGenerator;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// External document store seam. Default: in-memory backing.
    pub store: Arc<dyn DocumentStore>,
    /// Opaque text generation seam. Default: LlmClient.
    pub generator: Arc<dyn TextGenerator>,
    pub ats: AtsClient,
}
