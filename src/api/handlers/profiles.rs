use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::AppState;
use crate::api::auth::AuthUser;
use crate::api::models::{RegisterRequest, RegisterResponse};
use crate::database::{self, Profile, ProfileUpdate};
use crate::errors::{PlatformError, PlatformResult};

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> PlatformResult<(StatusCode, Json<RegisterResponse>)> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(PlatformError::invalid("username is required"));
    }

    let conn = state.pool.get()?;
    if database::profiles::find_by_username(&conn, username)?.is_some() {
        return Err(PlatformError::conflict("username already taken"));
    }

    let full_name = req.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let profile = database::profiles::insert_profile(&conn, username, full_name)?;
    log::info!("Registered profile {}", profile.username);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            api_key: profile.api_key.clone(),
            profile,
        }),
    ))
}

pub async fn get_profile(AuthUser(profile): AuthUser) -> Json<Profile> {
    Json(profile)
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(profile): AuthUser,
    Json(mut update): Json<ProfileUpdate>,
) -> PlatformResult<Json<Profile>> {
    let conn = state.pool.get()?;

    if let Some(requested) = update.username.take() {
        let username = requested.trim().to_string();
        if username.is_empty() {
            return Err(PlatformError::invalid("username cannot be empty"));
        }
        if let Some(owner) = database::profiles::find_by_username(&conn, &username)? {
            if owner.id != profile.id {
                return Err(PlatformError::conflict("username already taken"));
            }
        }
        update.username = Some(username);
    }

    database::profiles::update_profile(&conn, &profile.id, &update)?
        .map(Json)
        .ok_or(PlatformError::NotFound("profile"))
}
