//! Registration, credential verification, and token issuance.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{CoreError, CoreResult};
use crate::mask::mask_email;
use crate::model::{Identity, NewUser, Role, User, UserId, UserSummary};
use crate::password;
use crate::refresh::RefreshTokenService;
use crate::store::users;
use crate::token::TokenIssuer;
use crate::validation;

pub const TOKEN_TYPE: &str = "Bearer";

/// Result of a successful API login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_at: i64,
    pub user: UserSummary,
}

/// A rotated access/refresh pair.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_at: i64,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    pool: SqlitePool,
    tokens: TokenIssuer,
    refresh: RefreshTokenService,
}

impl AuthService {
    pub fn new(pool: SqlitePool, tokens: TokenIssuer, refresh: RefreshTokenService) -> Self {
        Self {
            pool,
            tokens,
            refresh,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn refresh_tokens(&self) -> &RefreshTokenService {
        &self.refresh
    }

    /// Creates an account with a hashed password, the default role and
    /// default details.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] if any field is invalid.
    /// - [`CoreError::EmailTaken`] if the email is already registered.
    pub async fn register(&self, new_user: NewUser) -> CoreResult<User> {
        validation::validate_registration(&new_user)?;

        let email = new_user.email.trim().to_string();
        let username = new_user.username.trim().to_string();
        let hash = password::hash_password_blocking(new_user.password).await?;
        let details = serde_json::json!({
            "registration_date": Utc::now().date_naive().to_string(),
        });

        let user =
            match users::insert(&self.pool, &username, &email, &hash, Role::default(), &details)
                .await
            {
                Ok(user) => user,
                Err(CoreError::EmailTaken) => {
                    tracing::warn!(
                        "registration rejected, email already in use: {}",
                        mask_email(&email)
                    );
                    return Err(CoreError::EmailTaken);
                }
                Err(e) => return Err(e),
            };

        tracing::info!("registration successful for user: {}", mask_email(&email));
        Ok(user)
    }

    /// Verifies `email`/`password` against the stored hash.
    ///
    /// A missing user and a wrong password both yield
    /// [`CoreError::InvalidCredentials`].
    pub async fn authenticate(&self, email: &str, password: &str) -> CoreResult<User> {
        let email = email.trim();
        let Some(user) = users::find_by_email(&self.pool, email).await? else {
            tracing::warn!("failed login attempt for user: {}", mask_email(email));
            return Err(CoreError::InvalidCredentials);
        };

        let valid =
            password::verify_password_blocking(user.password_hash.clone(), password.to_string())
                .await?;
        if !valid {
            tracing::warn!("failed login attempt for user: {}", mask_email(email));
            return Err(CoreError::InvalidCredentials);
        }

        tracing::info!("login successful for user: {}", mask_email(email));
        Ok(user)
    }

    /// Authenticates and issues an access token plus a refresh token.
    pub async fn login(&self, email: &str, password: &str) -> CoreResult<LoginOutcome> {
        let user = self.authenticate(email, password).await?;
        let access = self.tokens.issue(&user.identity())?;
        let refresh = self.refresh.create(user.id).await?;

        Ok(LoginOutcome {
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: TOKEN_TYPE,
            expires_at: access.expires_at,
            user: user.summary(),
        })
    }

    /// Exchanges a refresh token for a new access/refresh pair. The
    /// presented token is consumed.
    pub async fn refresh(&self, refresh_token: &str) -> CoreResult<TokenPair> {
        let fresh = self.refresh.rotate(refresh_token).await?;
        let user = self.find_user(fresh.user_id).await?;
        let access = self.tokens.issue(&user.identity())?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: fresh.token,
            token_type: TOKEN_TYPE,
            expires_at: access.expires_at,
        })
    }

    /// Resolves a bearer access token to the current identity, checking that
    /// the user still exists.
    pub async fn identity_from_access_token(&self, token: &str) -> CoreResult<Identity> {
        let claims = self.tokens.validate(token)?;
        let user = self.find_user(claims.user_id()?).await?;
        Ok(user.identity())
    }

    pub async fn find_user(&self, id: UserId) -> CoreResult<User> {
        users::find_by_id(&self.pool, id)
            .await?
            .ok_or(CoreError::UserNotFound)
    }
}
