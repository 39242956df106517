use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use std::sync::Arc;

use super::{AppState, NewsParams};
use crate::database::{self, NewsItem};
use crate::errors::{PlatformError, PlatformResult};

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NewsParams>,
) -> PlatformResult<Json<Vec<NewsItem>>> {
    let conn = state.pool.get()?;
    let category = params.category.as_deref().filter(|c| !c.eq_ignore_ascii_case("all"));
    let items = database::news::list(&conn, category, params.featured.unwrap_or(false))?;
    Ok(Json(items))
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> PlatformResult<Json<NewsItem>> {
    let conn = state.pool.get()?;
    database::news::find_by_id(&conn, &id)?
        .map(Json)
        .ok_or(PlatformError::NotFound("news item"))
}
