use std::sync::Arc;
use std::time::Duration;

use notekeep_core::db::SqlitePool;
use notekeep_core::{AuthService, NoteService, RateLimiter, RefreshTokenService, TokenIssuer};

use crate::auth::session::SessionStore;
use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub auth: AuthService,
    pub notes: NoteService,
    pub session_store: Arc<SessionStore>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wires every service from `config` over an open pool.
    pub fn new(config: ServerConfig, pool: SqlitePool) -> Self {
        let tokens = TokenIssuer::new(
            &config.auth.jwt_secret,
            chrono::Duration::minutes(config.auth.access_token_ttl_minutes),
        );
        let refresh = RefreshTokenService::new(
            pool.clone(),
            chrono::Duration::hours(config.auth.refresh_token_ttl_hours),
        );
        let session_store = Arc::new(SessionStore::new(Duration::from_secs(
            config.auth.session_ttl_minutes * 60,
        )));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit.requests_per_window,
            Duration::from_secs(config.rate_limit.window_seconds),
        ));

        Self {
            auth: AuthService::new(pool.clone(), tokens, refresh),
            notes: NoteService::new(pool),
            session_store,
            rate_limiter,
            config: Arc::new(config),
        }
    }

    /// `Secure` is only set on cookies when we serve TLS ourselves.
    pub fn secure_cookies(&self) -> bool {
        self.config.tls.is_enabled()
    }
}
