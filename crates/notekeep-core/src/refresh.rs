//! Refresh-token store with expiry and single-use rotation.
//!
//! A refresh token is valid only while `now < expiry_date`. Every use goes
//! through [`RefreshTokenService::rotate`], which deletes the presented row
//! and issues a replacement, so a token can never be redeemed twice.
//! Users may hold any number of live tokens (one per signed-in device).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sqlx::SqlitePool;

use crate::error::{CoreError, CoreResult};
use crate::model::{RefreshToken, UserId};
use crate::store::refresh_tokens;

const TOKEN_BYTES: usize = 32;

/// Default lifetime of a refresh token.
pub fn default_ttl() -> Duration {
    Duration::hours(24)
}

/// 32 random bytes from the OS RNG, base64url without padding.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Debug, Clone)]
pub struct RefreshTokenService {
    pool: SqlitePool,
    ttl: Duration,
}

impl RefreshTokenService {
    pub fn new(pool: SqlitePool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    /// Issues a new token for `user_id`, valid for the configured TTL.
    pub async fn create(&self, user_id: UserId) -> CoreResult<RefreshToken> {
        let expiry = Utc::now() + self.ttl;
        let token = refresh_tokens::insert(&self.pool, &generate_token(), user_id, expiry).await?;
        tracing::debug!("refresh token issued for user {user_id}, expires {expiry}");
        Ok(token)
    }

    /// Looks up `token` without consuming it.
    ///
    /// # Errors
    ///
    /// - [`CoreError::RefreshTokenNotFound`] if no such token exists.
    /// - [`CoreError::RefreshTokenExpired`] if it is past expiry; the row is deleted.
    pub async fn verify(&self, token: &str) -> CoreResult<RefreshToken> {
        let found = refresh_tokens::find_by_token(&self.pool, token)
            .await?
            .ok_or(CoreError::RefreshTokenNotFound)?;

        if found.is_expired_at(Utc::now()) {
            refresh_tokens::delete_by_id(&self.pool, found.id).await?;
            tracing::info!("expired refresh token removed for user {}", found.user_id);
            return Err(CoreError::RefreshTokenExpired);
        }

        Ok(found)
    }

    /// Consumes `token` and returns its replacement, in one transaction.
    ///
    /// The presented row is deleted before anything else is read, so
    /// concurrent rotations of the same token queue on SQLite's write lock
    /// and every one after the first finds nothing:
    /// [`CoreError::RefreshTokenNotFound`].
    pub async fn rotate(&self, token: &str) -> CoreResult<RefreshToken> {
        let mut tx = self.pool.begin().await?;

        let Some(taken) = refresh_tokens::take_by_token(&mut *tx, token).await? else {
            return Err(CoreError::RefreshTokenNotFound);
        };

        let now = Utc::now();
        if taken.is_expired_at(now) {
            tx.commit().await?;
            tracing::info!("expired refresh token removed for user {}", taken.user_id);
            return Err(CoreError::RefreshTokenExpired);
        }

        let fresh =
            refresh_tokens::insert(&mut *tx, &generate_token(), taken.user_id, now + self.ttl)
                .await?;
        tx.commit().await?;

        tracing::debug!("refresh token rotated for user {}", taken.user_id);
        Ok(fresh)
    }

    /// Deletes every expired token. Returns how many were removed.
    pub async fn purge_expired(&self) -> CoreResult<u64> {
        let removed = refresh_tokens::delete_expired(&self.pool, Utc::now()).await?;
        if removed > 0 {
            tracing::debug!("purged {removed} expired refresh tokens");
        }
        Ok(removed)
    }
}
