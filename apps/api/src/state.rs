use crate::config::Config;
use crate::session::{Orchestrator, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions, in memory only.
    pub sessions: SessionStore,
    /// Action layer; holds the completion client and page layout.
    pub orchestrator: Orchestrator,
    pub config: Config,
}
