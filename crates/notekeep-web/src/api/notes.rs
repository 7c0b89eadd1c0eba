use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use notekeep_core::{Note, NoteId};

use crate::auth::middleware::AuthUser;
use crate::dto::{NoteRequest, SuccessResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_notes(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Note>>, AppError> {
    Ok(Json(state.notes.list(&identity).await?))
}

pub async fn create_note(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<NoteRequest>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let note = state.notes.create(&identity, body.into()).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn get_note(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
) -> Result<Json<Note>, AppError> {
    Ok(Json(state.notes.get(&identity, id).await?))
}

pub async fn update_note(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
    Json(body): Json<NoteRequest>,
) -> Result<Json<Note>, AppError> {
    Ok(Json(state.notes.update(&identity, id, body.into()).await?))
}

pub async fn delete_note(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.notes.delete(&identity, id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
