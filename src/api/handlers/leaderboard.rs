use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;

use super::{AppState, SearchParams};
use crate::database;
use crate::domain::{rank_players, LeaderboardEntry};
use crate::errors::PlatformResult;

pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> PlatformResult<Json<Vec<LeaderboardEntry>>> {
    let conn = state.pool.get()?;
    let rows = database::player_stats::list_with_profiles(&conn)?;
    let limit = state.config.platform.leaderboard_limit;

    Ok(Json(rank_players(rows, params.search.as_deref(), limit)))
}
