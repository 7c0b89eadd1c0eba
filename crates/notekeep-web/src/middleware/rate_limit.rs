use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

/// Counts every request against the peer IP's fixed window and answers
/// 429 once the window's limit is exceeded.
pub async fn rate_limit(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let ip = client_ip(&req);
    match state.rate_limiter.check(ip) {
        Ok(_) => next.run(req).await,
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Peer address from the connection. Requests without connect info share
/// the unspecified address.
fn client_ip(req: &Request<Body>) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}
