use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::{AppState, SearchParams};
use crate::api::auth::AuthUser;
use crate::api::models::{JoinTeamRequest, PublicTeam, TeamDetail, TeamSummary};
use crate::database::{self, Team, TeamInput, TeamWithCaptain};
use crate::domain::teams::{captain_name, matches_search};
use crate::errors::{PlatformError, PlatformResult};
use crate::services::teams as team_service;

/// Filters by the optional search term and builds summaries. The join code
/// is only carried when `with_code` is set.
pub(crate) fn summarize(teams: Vec<TeamWithCaptain>, search: Option<&str>, with_code: bool) -> Vec<TeamSummary> {
    teams
        .into_iter()
        .filter(|t| search.is_none_or(|s| matches_search(t, s)))
        .map(|t| {
            let captain_name = captain_name(&t);
            let team_code = with_code.then(|| t.team.team_code.clone());
            TeamSummary {
                captain_name,
                member_count: t.member_count,
                team_code,
                team: PublicTeam::from(t.team),
            }
        })
        .collect()
}

pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> PlatformResult<Json<Vec<TeamSummary>>> {
    let conn = state.pool.get()?;
    let teams = database::teams::list_with_captains(&conn)?;
    Ok(Json(summarize(teams, params.search.as_deref(), false)))
}

pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    viewer: Option<AuthUser>,
) -> PlatformResult<Json<TeamDetail>> {
    let conn = state.pool.get()?;
    let team = database::teams::find_by_id(&conn, &id)?.ok_or(PlatformError::NotFound("team"))?;
    let members = database::team_members::list_for_team(&conn, &team.id)?;

    let (is_captain, is_member) = match &viewer {
        Some(AuthUser(profile)) => (
            team.captain_id == profile.id,
            members.iter().any(|m| m.profile_id == profile.id),
        ),
        None => (false, false),
    };

    Ok(Json(TeamDetail {
        team_code: is_member.then(|| team.team_code.clone()),
        team: PublicTeam::from(team),
        members,
        is_captain,
    }))
}

/// The creator becomes captain. The response is the only place besides the
/// team page where the join code is shown.
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    AuthUser(profile): AuthUser,
    Json(input): Json<TeamInput>,
) -> PlatformResult<(StatusCode, Json<Team>)> {
    let mut conn = state.pool.get()?;
    let team = team_service::create_own_team(&mut conn, &profile, &input, &state.config.platform)?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn join_team(
    State(state): State<Arc<AppState>>,
    AuthUser(profile): AuthUser,
    Json(req): Json<JoinTeamRequest>,
) -> PlatformResult<Json<PublicTeam>> {
    let mut conn = state.pool.get()?;
    let team = team_service::join_team(&mut conn, &profile, &req.team_code)?;
    Ok(Json(PublicTeam::from(team)))
}
