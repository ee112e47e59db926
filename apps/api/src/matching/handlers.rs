//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::engine::{CandidateRole, MatchResponse, SearchSkill};
use crate::matching::profile::ScoringProfiles;
use crate::matching::store::RequesterRole;
use crate::models::skill::Skill;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub target: CandidateRole,
    pub skills: Vec<SearchSkill>,
    pub limit: Option<usize>,
}

/// GET /api/v1/matches/:role/:id
///
/// Ranked opposite-role matches for a stored company, developer or project.
/// A requester with no skills gets an empty list plus a guidance `message`.
pub async fn handle_get_matches(
    State(state): State<AppState>,
    Path((role, requester_id)): Path<(String, Uuid)>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<MatchResponse>, AppError> {
    let role = RequesterRole::parse(&role)
        .ok_or_else(|| AppError::NotFound(format!("Unknown requester role '{role}'")))?;

    let response = state
        .engine
        .compute_matches(requester_id, role, params.limit)
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/matches/search
///
/// Ranks candidates against a skill set sent in the request body.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let response = state
        .engine
        .search(request.target, &request.skills, request.limit)
        .await?;
    Ok(Json(response))
}

/// GET /api/v1/skills
pub async fn handle_skill_catalog(
    State(state): State<AppState>,
) -> Result<Json<Vec<Skill>>, AppError> {
    let skills = state
        .store
        .skill_catalog()
        .await
        .map_err(|e| AppError::Upstream(format!("{e:#}")))?;
    Ok(Json(skills))
}

/// GET /api/v1/scoring-profiles
///
/// The active weight tables, for transparency in match explanations.
pub async fn handle_scoring_profiles(State(state): State<AppState>) -> Json<ScoringProfiles> {
    Json(state.engine.profiles().clone())
}
