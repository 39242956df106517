use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    response::{Json, Response},
};
use chrono::Utc;
use log::{debug, warn};
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

use super::{AppState, TournamentParams};
use crate::api::auth::AuthUser;
use crate::api::models::{TournamentCard, TournamentDetail};
use crate::database::{self, Registration, Tournament};
use crate::domain::fill_percent;
use crate::errors::{PlatformError, PlatformResult};
use crate::realtime::TournamentChange;
use crate::services::registration;

pub(crate) fn build_card(conn: &Connection, tournament: Tournament) -> PlatformResult<TournamentCard> {
    let registered_teams = database::registrations::count_for_tournament(conn, &tournament.id)?;
    Ok(TournamentCard {
        fill_percent: fill_percent(registered_teams, tournament.max_teams),
        registered_teams,
        tournament,
    })
}

pub async fn list_tournaments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TournamentParams>,
) -> PlatformResult<Json<Vec<TournamentCard>>> {
    let conn = state.pool.get()?;
    let tournaments = database::tournaments::list(&conn, params.status.as_deref())?;

    let cards = tournaments
        .into_iter()
        .map(|t| build_card(&conn, t))
        .collect::<PlatformResult<Vec<_>>>()?;

    Ok(Json(cards))
}

pub async fn get_tournament(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    viewer: Option<AuthUser>,
) -> PlatformResult<Json<TournamentDetail>> {
    let conn = state.pool.get()?;
    let tournament = database::tournaments::find_by_id(&conn, &id)?
        .ok_or(PlatformError::NotFound("tournament"))?;

    let is_registered = match viewer {
        Some(AuthUser(profile)) => database::registrations::is_registered(&conn, &id, &profile.id)?,
        None => false,
    };

    Ok(Json(TournamentDetail {
        card: build_card(&conn, tournament)?,
        is_registered,
    }))
}

pub async fn register_for_tournament(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AuthUser(profile): AuthUser,
) -> PlatformResult<(StatusCode, Json<Registration>)> {
    let mut conn = state.pool.get()?;
    let registration = registration::register(&mut conn, &profile, &id, Utc::now())?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// Upgrades to a WebSocket that receives every tournament change as a
/// JSON text frame.
pub async fn tournament_changes(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> Response {
    let receiver = state.feed.subscribe();
    ws.on_upgrade(move |socket| stream_changes(socket, receiver))
}

async fn stream_changes(mut socket: WebSocket, mut receiver: broadcast::Receiver<TournamentChange>) {
    debug!("Tournament change subscriber connected");
    loop {
        tokio::select! {
            change = receiver.recv() => match change {
                Ok(change) => {
                    let payload = match serde_json::to_string(&change) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!("Failed to encode tournament change: {}", e);
                            continue;
                        }
                    };
                    if socket.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Tournament change subscriber lagged, {} events dropped", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    debug!("Tournament change subscriber disconnected");
}
