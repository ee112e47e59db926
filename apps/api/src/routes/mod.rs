pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route("/api/v1/skills", get(handlers::handle_skill_catalog))
        // Matching
        .route("/api/v1/matches/search", post(handlers::handle_search))
        .route(
            "/api/v1/matches/:role/:id",
            get(handlers::handle_get_matches),
        )
        .route(
            "/api/v1/scoring-profiles",
            get(handlers::handle_scoring_profiles),
        )
        .with_state(state)
}
