use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use log::info;
use std::sync::Arc;

use super::{AppState, SearchParams};
use crate::api::auth::AdminUser;
use crate::api::models::{AdminScheduleResponse, CreateStatsRequest, TeamSummary, TournamentTitle};
use crate::database::{
    self, Match, MatchInput, MatchParticipant, NewsInput, NewsItem, ParticipantInput, PlayerStats, StatsInput,
    Stream, StreamInput, TableCounts, Team, TeamInput, Tournament, TournamentInput,
};
use crate::domain::kd_ratio;
use crate::errors::{PlatformError, PlatformResult};
use crate::realtime::TournamentChange;
use crate::services::teams as team_service;

use super::teams::summarize;

/// Picks the submitted value unless it is missing or blank.
fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(default)
}

fn require_title(title: &str) -> PlatformResult<()> {
    if title.trim().is_empty() {
        return Err(PlatformError::invalid("title is required"));
    }
    Ok(())
}

fn deleted(removed: bool, what: &'static str) -> PlatformResult<StatusCode> {
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PlatformError::NotFound(what))
    }
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> PlatformResult<Json<TableCounts>> {
    let conn = state.pool.get()?;
    Ok(Json(database::dashboard::counts(&conn)?))
}

// Tournaments

pub async fn create_tournament(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(input): Json<TournamentInput>,
) -> PlatformResult<(StatusCode, Json<Tournament>)> {
    require_title(&input.title)?;
    let conn = state.pool.get()?;
    let status = or_default(input.status.as_deref(), state.config.platform.default_tournament_status);
    let tournament = database::tournaments::insert_tournament(&conn, &input, status, &admin.id)?;

    info!("{} created tournament {}", admin.username, tournament.title);
    state.feed.publish(TournamentChange::Insert { new: tournament.clone() });
    Ok((StatusCode::CREATED, Json(tournament)))
}

pub async fn update_tournament(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<TournamentInput>,
) -> PlatformResult<Json<Tournament>> {
    require_title(&input.title)?;
    let conn = state.pool.get()?;
    let status = or_default(input.status.as_deref(), state.config.platform.default_tournament_status);
    let tournament = database::tournaments::update_tournament(&conn, &id, &input, status)?
        .ok_or(PlatformError::NotFound("tournament"))?;

    state.feed.publish(TournamentChange::Update { new: tournament.clone() });
    Ok(Json(tournament))
}

pub async fn delete_tournament(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> PlatformResult<StatusCode> {
    let conn = state.pool.get()?;
    let removed = database::tournaments::delete_tournament(&conn, &id)?;
    if removed {
        state.feed.publish(TournamentChange::deleted(id));
    }
    deleted(removed, "tournament")
}

// Teams

pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<SearchParams>,
) -> PlatformResult<Json<Vec<TeamSummary>>> {
    let conn = state.pool.get()?;
    let teams = database::teams::list_with_captains(&conn)?;
    Ok(Json(summarize(teams, params.search.as_deref(), true)))
}

pub async fn create_team(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(input): Json<TeamInput>,
) -> PlatformResult<(StatusCode, Json<Team>)> {
    let mut conn = state.pool.get()?;
    let team = team_service::create_team(&mut conn, &admin, &input, &state.config.platform)?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn update_team(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<TeamInput>,
) -> PlatformResult<Json<Team>> {
    if input.name.trim().is_empty() {
        return Err(PlatformError::invalid("team name is required"));
    }
    let conn = state.pool.get()?;
    database::teams::update_team(&conn, &id, &input)?
        .map(Json)
        .ok_or(PlatformError::NotFound("team"))
}

pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> PlatformResult<StatusCode> {
    let conn = state.pool.get()?;
    deleted(database::teams::delete_team(&conn, &id)?, "team")
}

// Matches

pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> PlatformResult<Json<AdminScheduleResponse>> {
    let conn = state.pool.get()?;
    let matches = database::matches::list_with_tournament_titles(&conn)?;
    let tournaments = database::tournaments::list_titles(&conn)?
        .into_iter()
        .map(|(id, title)| TournamentTitle { id, title })
        .collect();

    Ok(Json(AdminScheduleResponse { matches, tournaments }))
}

fn ensure_tournament(conn: &rusqlite::Connection, tournament_id: &str) -> PlatformResult<()> {
    database::tournaments::find_by_id(conn, tournament_id)?
        .map(|_| ())
        .ok_or(PlatformError::NotFound("tournament"))
}

pub async fn create_match(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(input): Json<MatchInput>,
) -> PlatformResult<(StatusCode, Json<Match>)> {
    let conn = state.pool.get()?;
    ensure_tournament(&conn, &input.tournament_id)?;
    let status = or_default(input.status.as_deref(), state.config.platform.default_match_status);
    let created = database::matches::insert_match(&conn, &input, status)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_match(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<MatchInput>,
) -> PlatformResult<Json<Match>> {
    let conn = state.pool.get()?;
    ensure_tournament(&conn, &input.tournament_id)?;
    let status = or_default(input.status.as_deref(), state.config.platform.default_match_status);
    database::matches::update_match(&conn, &id, &input, status)?
        .map(Json)
        .ok_or(PlatformError::NotFound("match"))
}

pub async fn delete_match(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> PlatformResult<StatusCode> {
    let conn = state.pool.get()?;
    deleted(database::matches::delete_match(&conn, &id)?, "match")
}

pub async fn add_participant(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<ParticipantInput>,
) -> PlatformResult<(StatusCode, Json<MatchParticipant>)> {
    let conn = state.pool.get()?;
    if database::matches::find_by_id(&conn, &id)?.is_none() {
        return Err(PlatformError::NotFound("match"));
    }
    if input.team_id.is_none() && input.profile_id.is_none() {
        return Err(PlatformError::invalid("participant needs a team or a profile"));
    }
    if let Some(team_id) = input.team_id.as_deref() {
        if database::teams::find_by_id(&conn, team_id)?.is_none() {
            return Err(PlatformError::NotFound("team"));
        }
    }
    if let Some(profile_id) = input.profile_id.as_deref() {
        if database::profiles::find_by_id(&conn, profile_id)?.is_none() {
            return Err(PlatformError::NotFound("profile"));
        }
    }
    let participant = database::participants::insert_participant(&conn, &id, &input)?;
    Ok((StatusCode::CREATED, Json(participant)))
}

// News

pub async fn create_news(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(input): Json<NewsInput>,
) -> PlatformResult<(StatusCode, Json<NewsItem>)> {
    require_title(&input.title)?;
    let conn = state.pool.get()?;
    let category = or_default(input.category.as_deref(), state.config.platform.default_news_category);
    let item = database::news::insert_news(&conn, &input, category, &admin.id, Utc::now())?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_news(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(input): Json<NewsInput>,
) -> PlatformResult<Json<NewsItem>> {
    require_title(&input.title)?;
    let conn = state.pool.get()?;
    let category = or_default(input.category.as_deref(), state.config.platform.default_news_category);
    database::news::update_news(&conn, &id, &input, category, &admin.id, Utc::now())?
        .map(Json)
        .ok_or(PlatformError::NotFound("news item"))
}

pub async fn delete_news(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> PlatformResult<StatusCode> {
    let conn = state.pool.get()?;
    deleted(database::news::delete_news(&conn, &id)?, "news item")
}

// Streams

pub async fn create_stream(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(input): Json<StreamInput>,
) -> PlatformResult<(StatusCode, Json<Stream>)> {
    require_title(&input.title)?;
    let conn = state.pool.get()?;
    let stream = database::streams::insert_stream(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(stream)))
}

pub async fn update_stream(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<StreamInput>,
) -> PlatformResult<Json<Stream>> {
    require_title(&input.title)?;
    let conn = state.pool.get()?;
    database::streams::update_stream(&conn, &id, &input)?
        .map(Json)
        .ok_or(PlatformError::NotFound("stream"))
}

pub async fn delete_stream(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> PlatformResult<StatusCode> {
    let conn = state.pool.get()?;
    deleted(database::streams::delete_stream(&conn, &id)?, "stream")
}

// Leaderboard

pub async fn create_stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(req): Json<CreateStatsRequest>,
) -> PlatformResult<(StatusCode, Json<PlayerStats>)> {
    let conn = state.pool.get()?;
    if database::profiles::find_by_id(&conn, &req.profile_id)?.is_none() {
        return Err(PlatformError::NotFound("profile"));
    }
    if database::player_stats::exists_for_profile(&conn, &req.profile_id)? {
        return Err(PlatformError::conflict("stats already exist for this profile"));
    }
    let stats = database::player_stats::insert_stats(&conn, &req.profile_id)?;
    Ok((StatusCode::CREATED, Json(stats)))
}

pub async fn update_stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<StatsInput>,
) -> PlatformResult<Json<PlayerStats>> {
    let conn = state.pool.get()?;
    let ratio = kd_ratio(input.kills, input.deaths);
    database::player_stats::update_stats(&conn, &id, &input, ratio)?
        .map(Json)
        .ok_or(PlatformError::NotFound("player stats"))
}
