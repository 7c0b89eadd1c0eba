use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use crate::error::{CoreError, CoreResult};
use crate::model::{Role, User, UserId};

const COLUMNS: &str = "id, username, email, password_hash, role, details";

fn from_row(row: &SqliteRow) -> CoreResult<User> {
    let role: String = row.try_get("role")?;
    let details: String = row.try_get("details")?;
    let details = serde_json::from_str(&details)
        .map_err(|e| CoreError::Internal(format!("corrupt user details: {e}")))?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: Role::parse(&role),
        details,
    })
}

/// Inserts a user. A duplicate email maps to [`CoreError::EmailTaken`].
pub async fn insert<'e, E>(
    exec: E,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    details: &serde_json::Value,
) -> CoreResult<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash, role, details) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(details.to_string())
    .execute(exec)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => CoreError::EmailTaken,
        other => CoreError::Database(other),
    })?;

    Ok(User {
        id: result.last_insert_rowid(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
        details: details.clone(),
    })
}

pub async fn find_by_email<'e, E>(exec: E, email: &str) -> CoreResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {COLUMNS} FROM users WHERE email = ?");
    let row = sqlx::query(&sql).bind(email).fetch_optional(exec).await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn find_by_id<'e, E>(exec: E, id: UserId) -> CoreResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(exec).await?;
    row.as_ref().map(from_row).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn insert_and_find() {
        let pool = db::connect_in_memory().await.unwrap();
        let details = serde_json::json!({ "registration_date": "2026-01-01" });

        let user = insert(&pool, "alice", "alice@example.com", "hash", Role::User, &details)
            .await
            .unwrap();

        let by_email = find_by_email(&pool, "alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.details, details);
        assert_eq!(by_email.role, Role::User);

        let by_id = find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = db::connect_in_memory().await.unwrap();
        let details = serde_json::json!({});
        insert(&pool, "alice", "alice@example.com", "hash", Role::User, &details)
            .await
            .unwrap();

        let err = insert(&pool, "other", "alice@example.com", "hash", Role::User, &details)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::EmailTaken));
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let pool = db::connect_in_memory().await.unwrap();
        assert!(find_by_id(&pool, 99).await.unwrap().is_none());
        assert!(find_by_email(&pool, "nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }
}
