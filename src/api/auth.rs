use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::database::{profiles, Profile};
use crate::errors::PlatformError;

/// Profile behind the request's `Authorization: Bearer <api key>` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Profile);

/// An [`AuthUser`] whose profile carries the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Profile);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let api_key = bearer_token(&parts.headers).ok_or(PlatformError::Unauthenticated)?;
        let conn = state.pool.get()?;
        let profile = profiles::find_by_api_key(&conn, api_key)?.ok_or(PlatformError::Unauthenticated)?;
        Ok(AuthUser(profile))
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let AuthUser(profile) = AuthUser::from_request_parts(parts, state).await?;
        if !profile.is_admin {
            return Err(PlatformError::Forbidden);
        }
        Ok(AdminUser(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
