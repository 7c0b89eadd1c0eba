//! Error types for `notekeep-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

/// Unified error type for all core operations.
///
/// The HTTP layer maps each variant to a status code; nothing in the core
/// retries on error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Email/password did not match a stored user.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A user id referenced by a token or session no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// The presented refresh token is unknown (never issued or already used).
    #[error("refresh token not found")]
    RefreshTokenNotFound,

    /// The presented refresh token is past its expiry and has been removed.
    #[error("refresh token expired, please sign in again")]
    RefreshTokenExpired,

    /// The access token is malformed, badly signed, or expired.
    #[error("invalid or expired access token")]
    InvalidToken,

    /// The current user does not own the requested note.
    #[error("you do not have permission to access this note")]
    Forbidden,

    /// No note with the requested id.
    #[error("note not found")]
    NoteNotFound,

    /// Registration with an email that is already in use.
    #[error("email already registered")]
    EmailTaken,

    /// Too many requests from one client within the current window.
    #[error("too many requests")]
    RateLimited,

    /// Input failed validation; one message per failed field.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Hashing or parsing a stored password hash failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// An unexpected failure outside the database (token encoding, task join, ...).
    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Convenience alias used throughout `notekeep-core`.
pub type CoreResult<T> = Result<T, CoreError>;
