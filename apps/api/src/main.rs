mod analysis_client;
mod assistant;
mod config;
mod errors;
mod matching;
mod models;
mod routes;
mod skills;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis_client::{AnalysisProvider, HttpAnalysisProvider, RetryPolicy};
use crate::config::Config;
use crate::matching::cache::MatchCache;
use crate::matching::resolver::MatchResolver;
use crate::routes::build_router;
use crate::skills::dictionary::SkillDictionary;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unparseable values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skillmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize match cache (in-memory, one per process)
    let cache = Arc::new(MatchCache::new(config.cache_ttl));
    info!("Match cache initialized (ttl: {}s)", config.cache_ttl.as_secs());

    // Initialize skill dictionary
    let dictionary = match &config.skill_dictionary {
        Some(tokens) => SkillDictionary::new(tokens),
        None => SkillDictionary::default(),
    };
    if dictionary.is_empty() {
        anyhow::bail!("SKILL_DICTIONARY contains no usable skills");
    }
    info!("Skill dictionary loaded ({} skills)", dictionary.len());

    // Initialize analysis provider (optional; local matching only without it)
    let provider: Option<Arc<dyn AnalysisProvider>> = match &config.analysis_api_url {
        Some(url) => {
            info!("Analysis provider: {url}");
            Some(Arc::new(HttpAnalysisProvider::new(
                url.clone(),
                config.remote_timeout,
            )?))
        }
        None => {
            warn!("ANALYSIS_API_URL not set; serving local matches only");
            None
        }
    };

    let retry = RetryPolicy {
        max_attempts: config.remote_max_attempts,
        backoff: config.remote_backoff,
        attempt_timeout: config.remote_timeout,
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        resolver: MatchResolver::new(cache, provider, Arc::new(dictionary), retry),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // callers are browser extension pages

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
