use std::sync::Arc;

use crate::matching::engine::MatchEngine;
use crate::matching::store::MatchStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable data layer. Default: PgMatchStore.
    pub store: Arc<dyn MatchStore>,
    /// Stateless scoring engine sharing the same store.
    pub engine: Arc<MatchEngine>,
}
