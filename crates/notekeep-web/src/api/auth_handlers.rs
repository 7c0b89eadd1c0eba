use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use notekeep_core::{LoginOutcome, TokenPair, UserSummary};

use crate::dto::*;
use crate::error::AppError;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserSummary>), AppError> {
    let user = state.auth.register(body.into()).await?;
    Ok((StatusCode::CREATED, Json(user.summary())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginOutcome>, AppError> {
    let outcome = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(outcome))
}

/// Consumes the presented refresh token and returns a new pair.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let pair = state.auth.refresh(&body.refresh_token).await?;
    Ok(Json(pair))
}
