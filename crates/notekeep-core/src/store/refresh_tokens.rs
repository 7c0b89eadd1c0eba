use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use crate::error::{CoreError, CoreResult};
use crate::model::{RefreshToken, UserId};

fn from_row(row: &SqliteRow) -> CoreResult<RefreshToken> {
    let expiry_ms: i64 = row.try_get("expiry_date")?;
    let expiry_date = Utc
        .timestamp_millis_opt(expiry_ms)
        .single()
        .ok_or_else(|| CoreError::Internal(format!("corrupt refresh token expiry: {expiry_ms}")))?;

    Ok(RefreshToken {
        id: row.try_get("id")?,
        token: row.try_get("token")?,
        user_id: row.try_get("user_id")?,
        expiry_date,
    })
}

pub async fn insert<'e, E>(
    exec: E,
    token: &str,
    user_id: UserId,
    expiry_date: DateTime<Utc>,
) -> CoreResult<RefreshToken>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("INSERT INTO refresh_tokens (token, user_id, expiry_date) VALUES (?, ?, ?)")
            .bind(token)
            .bind(user_id)
            .bind(expiry_date.timestamp_millis())
            .execute(exec)
            .await?;

    Ok(RefreshToken {
        id: result.last_insert_rowid(),
        token: token.to_string(),
        user_id,
        expiry_date,
    })
}

pub async fn find_by_token<'e, E>(exec: E, token: &str) -> CoreResult<Option<RefreshToken>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        "SELECT id, token, user_id, expiry_date FROM refresh_tokens WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(exec)
    .await?;
    row.as_ref().map(from_row).transpose()
}

/// Deletes the row for `token` and returns it. As the first statement of a
/// transaction this takes the write lock before anything is read.
pub async fn take_by_token<'e, E>(exec: E, token: &str) -> CoreResult<Option<RefreshToken>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        "DELETE FROM refresh_tokens WHERE token = ? RETURNING id, token, user_id, expiry_date",
    )
    .bind(token)
    .fetch_optional(exec)
    .await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn delete_by_id<'e, E>(exec: E, id: i64) -> CoreResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

/// Removes every token with `expiry_date <= now`.
pub async fn delete_expired<'e, E>(exec: E, now: DateTime<Utc>) -> CoreResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE expiry_date <= ?")
        .bind(now.timestamp_millis())
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}
