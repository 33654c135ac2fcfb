use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate;
use crate::models::{ComboStats, DerivedStats, PartSlot, PartStats, TournamentCategory};
use crate::storage;

// ── Query Parameters ────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartsParams {
    pub category: Option<String>,
    pub slot: Option<String>,
    pub min_matches: Option<u32>,
}

fn parse_category(raw: Option<&str>) -> Result<Option<TournamentCategory>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None | Some("all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(ApiError::BadRequest),
    }
}

fn parse_slot(raw: Option<&str>) -> Result<Option<PartSlot>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(ApiError::BadRequest),
    }
}

/// Load the data lake and aggregate for one player.
fn player_stats(
    state: &AppState,
    player: &str,
    category: Option<TournamentCategory>,
) -> Result<DerivedStats, ApiError> {
    if player.trim().is_empty() {
        return Err(ApiError::BadRequest("Player name is empty".to_string()));
    }

    let matches = storage::read_matches(&state.storage)?;
    let tables = storage::read_part_tables(&state.storage)?;
    let options = state.stats.aggregate_options(category);

    let stats = calculate::aggregate(&matches, &tables, player, &options);
    if stats.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No matches found for player: {}",
            player
        )));
    }

    tracing::debug!(
        player = %player,
        matches = stats.overview.total_matches,
        "Aggregated player stats"
    );
    Ok(stats)
}

// ── Stats Endpoint ──────────────────────────────────────────────

pub async fn stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<StatsParams>,
) -> Result<Json<DerivedStats>, ApiError> {
    let category = parse_category(params.category.as_deref())?;
    player_stats(&state, &name, category).map(Json)
}

// ── Combos Endpoint ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CombosResponse {
    pub player: String,
    pub combos: Vec<ComboStats>,
}

pub async fn combos(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<StatsParams>,
) -> Result<Json<CombosResponse>, ApiError> {
    let category = parse_category(params.category.as_deref())?;
    let stats = player_stats(&state, &name, category)?;

    Ok(Json(CombosResponse {
        player: stats.player,
        combos: stats.combos,
    }))
}

// ── Parts Endpoint ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PartsResponse {
    pub player: String,
    pub slot: Option<PartSlot>,
    pub min_matches: u32,
    pub parts: Vec<PartStats>,
}

pub async fn parts(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<PartsParams>,
) -> Result<Json<PartsResponse>, ApiError> {
    let category = parse_category(params.category.as_deref())?;
    let slot = parse_slot(params.slot.as_deref())?;
    let min_matches = params
        .min_matches
        .unwrap_or(state.stats.min_part_matches);

    let stats = player_stats(&state, &name, category)?;
    let parts = stats
        .part_listing(slot, min_matches)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(PartsResponse {
        player: stats.player.clone(),
        slot,
        min_matches,
        parts,
    }))
}
