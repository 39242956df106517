use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;

use super::{AppState, StreamParams};
use crate::database::{self, Stream};
use crate::errors::PlatformResult;

pub async fn list_streams(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StreamParams>,
) -> PlatformResult<Json<Vec<Stream>>> {
    let conn = state.pool.get()?;
    Ok(Json(database::streams::list(&conn, params.live)?))
}
