use axum::http::{header, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{rate_limit, security_headers};
use crate::state::AppState;
use crate::{api, pages};

/// The full application: JSON API under `/api`, HTML pages at the root.
///
/// Rate limiting is the outermost layer so every request counts against
/// the caller's window, including ones rejected further in.
pub fn build_router(state: AppState) -> Router {
    // CORS: same-origin only by default (no cross-origin requests allowed)
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let base_router = Router::new()
        .nest("/api", api::auth_router().merge(api::protected_router()))
        .merge(pages::router());

    let base_router = if state.secure_cookies() {
        base_router.layer(from_fn(security_headers::security_headers_with_hsts))
    } else {
        base_router.layer(from_fn(security_headers::security_headers))
    };

    base_router
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(state.clone(), rate_limit::rate_limit))
        .with_state(state)
}
