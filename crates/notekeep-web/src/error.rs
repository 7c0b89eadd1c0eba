use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use notekeep_core::CoreError;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    Auth(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// Status code and client-facing message for a core error.
///
/// Unexpected failures are logged here and replaced by a generic message.
pub fn status_and_message(err: &CoreError) -> (StatusCode, String) {
    let status = match err {
        CoreError::InvalidCredentials
        | CoreError::InvalidToken
        | CoreError::RefreshTokenExpired => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden => StatusCode::FORBIDDEN,
        CoreError::UserNotFound | CoreError::NoteNotFound | CoreError::RefreshTokenNotFound => {
            StatusCode::NOT_FOUND
        }
        CoreError::EmailTaken => StatusCode::CONFLICT,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        CoreError::PasswordHash(_) | CoreError::Internal(_) | CoreError::Database(_) => {
            // Log the real error server-side, return generic message to client
            tracing::error!("Internal error: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            );
        }
    };
    (status, err.to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Core(err) => status_and_message(&err),
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let body = ErrorBody {
            success: false,
            error: message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        AppError::Core(e)
    }
}
