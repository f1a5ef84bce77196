use crate::config::Config;
use crate::fortune::FortuneService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub fortune: FortuneService,
    pub config: Config,
}
