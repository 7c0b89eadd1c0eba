//! Extractors that turn a request into a core [`Identity`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use notekeep_core::{CoreError, Identity};

use crate::error::AppError;
use crate::pages;
use crate::state::AppState;

/// Caller authenticated by an `Authorization: Bearer` access token.
pub struct AuthUser(pub Identity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))?;

        match state.auth.identity_from_access_token(token).await {
            Ok(identity) => Ok(AuthUser(identity)),
            Err(CoreError::InvalidToken | CoreError::UserNotFound) => {
                Err(AppError::Auth("Invalid or expired token".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Caller authenticated by the form-login session cookie. Anonymous
/// visitors are redirected to the login page.
pub struct SessionUser {
    pub identity: Identity,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_id = super::cookie::session_id(&parts.headers)
            .ok_or_else(|| Redirect::to("/login").into_response())?;

        let session = state
            .session_store
            .get(&session_id)
            .ok_or_else(|| Redirect::to("/login").into_response())?;

        match state.auth.find_user(session.user_id).await {
            Ok(user) => Ok(SessionUser {
                identity: user.identity(),
            }),
            Err(CoreError::UserNotFound) => {
                state.session_store.remove(&session_id);
                Err(Redirect::to("/login").into_response())
            }
            Err(e) => Err(pages::error_response(&e)),
        }
    }
}
