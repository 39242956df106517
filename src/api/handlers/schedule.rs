use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::AppState;
use crate::api::models::MatchDetail;
use crate::database;
use crate::domain::{partition_schedule, Schedule};
use crate::errors::{PlatformError, PlatformResult};

pub async fn get_schedule(State(state): State<Arc<AppState>>) -> PlatformResult<Json<Schedule>> {
    let conn = state.pool.get()?;
    let matches = database::matches::list_with_tournament_titles(&conn)?;
    Ok(Json(partition_schedule(matches, Utc::now())))
}

pub async fn get_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> PlatformResult<Json<MatchDetail>> {
    let conn = state.pool.get()?;
    let scheduled = database::matches::find_by_id(&conn, &id)?.ok_or(PlatformError::NotFound("match"))?;
    let participants = database::participants::list_for_match(&conn, &id)?;

    Ok(Json(MatchDetail { scheduled, participants }))
}
