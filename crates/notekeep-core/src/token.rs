//! Signed access tokens (HS256 JWT).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::model::{Identity, Role, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string per the JWT convention.
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> CoreResult<UserId> {
        self.sub.parse().map_err(|_| CoreError::InvalidToken)
    }
}

/// A freshly signed access token and its expiry (unix seconds).
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: i64,
}

/// Issues and validates short-lived access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").field("ttl", &self.ttl).finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity: &Identity) -> CoreResult<AccessToken> {
        let now = Utc::now();
        let expires_at = (now + self.ttl).timestamp();
        let claims = Claims {
            sub: identity.user_id.to_string(),
            email: identity.email.clone(),
            role: identity.role,
            iat: now.timestamp(),
            exp: expires_at,
        };

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| CoreError::Internal(format!("failed to sign access token: {e}")))?;

        Ok(AccessToken { token, expires_at })
    }

    /// Checks signature and expiry. Every failure collapses into
    /// [`CoreError::InvalidToken`].
    pub fn validate(&self, token: &str) -> CoreResult<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!("access token rejected: {e}");
            CoreError::InvalidToken
        })?;

        Ok(data.claims)
    }
}
