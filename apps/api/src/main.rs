mod config;
mod db;
mod errors;
mod matching;
mod models;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::matching::engine::{MatchEngine, MatchLimits};
use crate::matching::profile::ScoringProfiles;
use crate::matching::store::{MatchStore, PgMatchStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skill Match API v{}", env!("CARGO_PKG_VERSION"));

    // Scoring profiles: built-ins unless SCORING_PROFILES_PATH overrides them
    let profiles = ScoringProfiles::load(config.scoring_profiles_path.as_deref())?;
    info!(
        "Scoring profiles loaded ({})",
        match &config.scoring_profiles_path {
            Some(path) => path.display().to_string(),
            None => "built-in".to_string(),
        }
    );

    // Initialize PostgreSQL
    let db = create_pool(&config).await?;
    let store: Arc<dyn MatchStore> = Arc::new(PgMatchStore::new(db));

    let limits = MatchLimits {
        default: config.match_default_limit,
        search: config.match_search_limit,
        max: config.match_max_limit,
    };
    info!(
        "Match limits: default {}, search {}, max {}; pool fetch timeout {:?}",
        limits.default, limits.search, limits.max, config.pool_fetch_timeout
    );
    let engine = MatchEngine::new(
        Arc::clone(&store),
        profiles,
        limits,
        config.pool_fetch_timeout,
    );

    // Build app state
    let state = AppState {
        store,
        engine: Arc::new(engine),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins to the marketplace frontend

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
