use crate::analysis::engine::Analyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds nothing mutable; every request is analyzed independently.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Carries the lexicon built once at startup.
    pub analyzer: Analyzer,
}
