//! notekeep core library: authentication and note logic, free of HTTP.
//!
//! The web layer resolves who is calling (session cookie or bearer token)
//! and hands an [`Identity`] to these services. Nothing here reads request
//! headers or writes responses.
//!
//! # Modules
//!
//! - [`auth`]: registration, credential checks, login and token refresh ([`AuthService`]).
//! - [`token`]: signed access tokens ([`TokenIssuer`]).
//! - [`refresh`]: single-use refresh tokens with expiry ([`RefreshTokenService`]).
//! - [`rate_limit`]: per-IP fixed-window counter ([`RateLimiter`]).
//! - [`notes`]: ownership-guarded note CRUD ([`NoteService`]).
//! - [`validation`]: password, email and note form rules.
//! - [`mask`]: email/username masking for logs.
//! - [`db`] / [`store`]: SQLite schema and hand-written row mapping.
//! - [`error`]: unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod auth;
pub mod db;
pub mod error;
pub mod mask;
pub mod model;
pub mod notes;
pub mod password;
pub mod rate_limit;
pub mod refresh;
pub mod store;
pub mod token;
pub mod validation;

pub use auth::{AuthService, LoginOutcome, TokenPair};
pub use error::{CoreError, CoreResult};
pub use mask::{mask_email, mask_username};
pub use model::{Identity, NewUser, Note, NoteId, NoteInput, RefreshToken, Role, User, UserId, UserSummary};
pub use notes::NoteService;
pub use rate_limit::RateLimiter;
pub use refresh::RefreshTokenService;
pub use token::{Claims, TokenIssuer};
