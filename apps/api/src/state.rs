use crate::config::Config;
use crate::matching::resolver::MatchResolver;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owns the shared match cache, the optional analysis provider and the
    /// skill dictionary. Cloning shares all three.
    pub resolver: MatchResolver,
}
