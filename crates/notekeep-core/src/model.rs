//! Domain types shared by the core services and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type NoteId = i64;

/// Authorization role stored with each user.
///
/// Persisted in its `ROLE_*` string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }

    /// Parses the stored form. Unknown values fall back to [`Role::User`].
    pub fn parse(s: &str) -> Self {
        match s {
            "ROLE_ADMIN" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    /// Free-form JSON metadata.
    pub details: serde_json::Value,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// The authenticated caller, resolved by the HTTP layer from a session or
/// bearer token and handed to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// Public view of a user, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// Registration input before hashing.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
}

/// Title and content supplied when creating or editing a note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
}

/// A persisted, single-use refresh token.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: i64,
    pub token: String,
    pub user_id: UserId,
    pub expiry_date: DateTime<Utc>,
}

impl RefreshToken {
    /// A token is usable only while `now < expiry_date`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn role_round_trips_through_storage_form() {
        assert_eq!(Role::parse(Role::Admin.as_str()), Role::Admin);
        assert_eq!(Role::parse(Role::User.as_str()), Role::User);
        assert_eq!(Role::parse("something-else"), Role::User);
    }

    #[test]
    fn role_serializes_with_prefix() {
        let json = serde_json::to_string(&Role::User).unwrap();
        assert_eq!(json, "\"ROLE_USER\"");
    }

    #[test]
    fn refresh_token_expiry_boundary() {
        let now = Utc::now();
        let token = RefreshToken {
            id: 1,
            token: "t".to_string(),
            user_id: 1,
            expiry_date: now,
        };
        assert!(token.is_expired_at(now));
        assert!(!token.is_expired_at(now - Duration::seconds(1)));
    }
}
