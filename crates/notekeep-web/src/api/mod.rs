mod auth_handlers;
pub mod notes;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Public token endpoints.
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/refreshtoken", post(auth_handlers::refresh_token))
}

/// Bearer-token protected endpoints.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
}
