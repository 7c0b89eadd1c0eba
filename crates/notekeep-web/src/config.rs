use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_access_ttl_minutes")]
    pub access_token_ttl_minutes: i64,
    #[serde(default = "default_refresh_ttl_hours")]
    pub refresh_token_ttl_hours: i64,
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_window")]
    pub requests_per_window: u32,
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

impl TlsConfig {
    pub fn is_enabled(&self) -> bool {
        self.cert_path.is_some() && self.key_path.is_some()
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
fn default_database_url() -> String { "sqlite://notekeep.db".to_string() }
fn default_max_connections() -> u32 { 5 }
fn default_access_ttl_minutes() -> i64 { 15 }
fn default_refresh_ttl_hours() -> i64 { 24 }
fn default_session_ttl_minutes() -> u64 { 30 }
fn default_requests_per_window() -> u32 { 50 }
fn default_window_seconds() -> u64 { 60 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl_minutes: default_access_ttl_minutes(),
            refresh_token_ttl_hours: default_refresh_ttl_hours(),
            session_ttl_minutes: default_session_ttl_minutes(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: default_requests_per_window(),
            window_seconds: default_window_seconds(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
            tls: TlsConfig::default(),
        }
    }
}

const MAX_ACCESS_TTL_MINUTES: i64 = 24 * 60;
const MAX_REFRESH_TTL_HOURS: i64 = 365 * 24;
const MAX_SESSION_TTL_MINUTES: u64 = 7 * 24 * 60;
const MAX_WINDOW_SECONDS: u64 = 24 * 60 * 60;

const WEAK_SECRETS: &[&str] = &[
    "change-me-to-a-random-secret",
    "secret",
    "password",
    "jwt-secret",
];

impl ServerConfig {
    /// Reads the TOML file named by `NOTEKEEP_CONFIG` (if set), then applies
    /// `NOTEKEEP_*` environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("NOTEKEEP_CONFIG").map(PathBuf::from).ok();

        let mut config = if let Some(path) = config_path {
            let contents = std::fs::read_to_string(&path)?;
            Self::from_toml(&contents)?
        } else {
            ServerConfig::default()
        };

        config.apply_env()?;
        config.check_limits()?;
        config.check_secret()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(addr) = std::env::var("NOTEKEEP_BIND_ADDR") {
            self.bind_addr = addr.parse()?;
        }
        if let Ok(url) = std::env::var("NOTEKEEP_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("NOTEKEEP_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(val) = std::env::var("NOTEKEEP_ACCESS_TTL_MINUTES") {
            if let Ok(minutes) = val.parse() {
                self.auth.access_token_ttl_minutes = minutes;
            }
        }
        if let Ok(val) = std::env::var("NOTEKEEP_REFRESH_TTL_HOURS") {
            if let Ok(hours) = val.parse() {
                self.auth.refresh_token_ttl_hours = hours;
            }
        }
        if let Ok(val) = std::env::var("NOTEKEEP_RATE_LIMIT_RPM") {
            if let Ok(rpm) = val.parse() {
                self.rate_limit.requests_per_window = rpm;
            }
        }
        if let Ok(cert) = std::env::var("NOTEKEEP_TLS_CERT") {
            self.tls.cert_path = Some(cert);
        }
        if let Ok(key) = std::env::var("NOTEKEEP_TLS_KEY") {
            self.tls.key_path = Some(key);
        }
        Ok(())
    }

    /// Rejects lifetimes and rate windows that are zero, negative or too
    /// large to turn into a duration.
    fn check_limits(&self) -> anyhow::Result<()> {
        let auth = &self.auth;
        if !(1..=MAX_ACCESS_TTL_MINUTES).contains(&auth.access_token_ttl_minutes) {
            anyhow::bail!(
                "access_token_ttl_minutes must be between 1 and {MAX_ACCESS_TTL_MINUTES}, got {}",
                auth.access_token_ttl_minutes
            );
        }
        if !(1..=MAX_REFRESH_TTL_HOURS).contains(&auth.refresh_token_ttl_hours) {
            anyhow::bail!(
                "refresh_token_ttl_hours must be between 1 and {MAX_REFRESH_TTL_HOURS}, got {}",
                auth.refresh_token_ttl_hours
            );
        }
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&auth.session_ttl_minutes) {
            anyhow::bail!(
                "session_ttl_minutes must be between 1 and {MAX_SESSION_TTL_MINUTES}, got {}",
                auth.session_ttl_minutes
            );
        }

        let rate = &self.rate_limit;
        if rate.requests_per_window == 0 {
            anyhow::bail!("rate_limit.requests_per_window must be at least 1");
        }
        if !(1..=MAX_WINDOW_SECONDS).contains(&rate.window_seconds) {
            anyhow::bail!(
                "rate_limit.window_seconds must be between 1 and {MAX_WINDOW_SECONDS}, got {}",
                rate.window_seconds
            );
        }
        Ok(())
    }

    /// Generates a secret when none is configured and refuses known
    /// placeholder values.
    fn check_secret(&mut self) -> anyhow::Result<()> {
        if self.auth.jwt_secret.is_empty() {
            self.auth.jwt_secret = format!(
                "{}{}",
                uuid::Uuid::new_v4().simple(),
                uuid::Uuid::new_v4().simple()
            );
            tracing::warn!(
                "No JWT secret configured. Generated random secret (tokens will not survive a restart)."
            );
            return Ok(());
        }

        if WEAK_SECRETS.iter().any(|&w| self.auth.jwt_secret == w) {
            anyhow::bail!(
                "JWT secret matches a known weak/placeholder value. \
                 Set a strong random secret via NOTEKEEP_JWT_SECRET."
            );
        }
        if self.auth.jwt_secret.len() < 32 {
            tracing::warn!(
                "JWT secret is shorter than 32 characters. \
                 Consider using a stronger secret via NOTEKEEP_JWT_SECRET."
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.rate_limit.requests_per_window, 50);
        assert_eq!(config.rate_limit.window_seconds, 60);
        assert_eq!(config.auth.refresh_token_ttl_hours, 24);
        assert!(!config.tls.is_enabled());
    }

    #[test]
    fn toml_sections_override_defaults() {
        let config = ServerConfig::from_toml(
            r#"
            bind_addr = "127.0.0.1:3000"

            [database]
            url = "sqlite://test.db"

            [auth]
            jwt_secret = "0123456789abcdef0123456789abcdef"
            access_token_ttl_minutes = 5

            [rate_limit]
            requests_per_window = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.database.url, "sqlite://test.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.auth.access_token_ttl_minutes, 5);
        assert_eq!(config.auth.session_ttl_minutes, 30);
        assert_eq!(config.rate_limit.requests_per_window, 10);
        assert_eq!(config.rate_limit.window_seconds, 60);
    }

    #[test]
    fn default_limits_are_accepted() {
        ServerConfig::default().check_limits().unwrap();
    }

    #[test]
    fn out_of_range_ttls_are_rejected() {
        let mut config = ServerConfig::default();
        config.auth.access_token_ttl_minutes = -5;
        assert!(config.check_limits().is_err());

        let mut config = ServerConfig::default();
        config.auth.access_token_ttl_minutes = 0;
        assert!(config.check_limits().is_err());

        let mut config = ServerConfig::default();
        config.auth.refresh_token_ttl_hours = i64::MAX;
        assert!(config.check_limits().is_err());

        let mut config = ServerConfig::default();
        config.auth.session_ttl_minutes = u64::MAX;
        assert!(config.check_limits().is_err());

        let mut config = ServerConfig::default();
        config.rate_limit.window_seconds = 0;
        assert!(config.check_limits().is_err());

        let mut config = ServerConfig::default();
        config.rate_limit.requests_per_window = 0;
        assert!(config.check_limits().is_err());
    }

    #[test]
    fn largest_allowed_ttls_are_accepted() {
        let mut config = ServerConfig::default();
        config.auth.access_token_ttl_minutes = MAX_ACCESS_TTL_MINUTES;
        config.auth.refresh_token_ttl_hours = MAX_REFRESH_TTL_HOURS;
        config.auth.session_ttl_minutes = MAX_SESSION_TTL_MINUTES;
        config.rate_limit.window_seconds = MAX_WINDOW_SECONDS;
        config.check_limits().unwrap();
    }

    #[test]
    fn missing_secret_is_generated() {
        let mut config = ServerConfig::default();
        config.check_secret().unwrap();
        assert!(config.auth.jwt_secret.len() >= 32);
    }

    #[test]
    fn placeholder_secret_is_rejected() {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = "secret".to_string();
        assert!(config.check_secret().is_err());
    }
}
