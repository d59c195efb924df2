use std::sync::Arc;

use crate::config::Config;
use crate::question_bank::generator::QuestionGenerator;
use crate::readiness::scorer::ReadinessConfig;
use crate::store::AssessmentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence. Postgres in production; tests swap in an in-memory store.
    pub store: Arc<dyn AssessmentStore>,
    /// Question source for bank building. Default: LLM-backed generator.
    pub generator: Arc<dyn QuestionGenerator>,
    pub config: Config,
    /// Status and readiness bands, with the default threshold taken from config.
    pub readiness: ReadinessConfig,
}
