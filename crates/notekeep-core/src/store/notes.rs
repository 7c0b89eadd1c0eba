use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use crate::error::CoreResult;
use crate::model::{Note, NoteId, UserId};

fn from_row(row: &SqliteRow) -> CoreResult<Note> {
    Ok(Note {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        user_id: row.try_get("user_id")?,
    })
}

pub async fn insert<'e, E>(
    exec: E,
    user_id: UserId,
    title: &str,
    content: &str,
    created_at: DateTime<Utc>,
) -> CoreResult<Note>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("INSERT INTO notes (title, content, created_at, user_id) VALUES (?, ?, ?, ?)")
            .bind(title)
            .bind(content)
            .bind(created_at)
            .bind(user_id)
            .execute(exec)
            .await?;

    Ok(Note {
        id: result.last_insert_rowid(),
        title: title.to_string(),
        content: content.to_string(),
        created_at,
        user_id,
    })
}

pub async fn find_by_id<'e, E>(exec: E, id: NoteId) -> CoreResult<Option<Note>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT id, title, content, created_at, user_id FROM notes WHERE id = ?")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    row.as_ref().map(from_row).transpose()
}

/// All notes owned by `user_id`, newest first.
pub async fn list_by_user<'e, E>(exec: E, user_id: UserId) -> CoreResult<Vec<Note>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT id, title, content, created_at, user_id FROM notes WHERE user_id = ? ORDER BY id DESC",
    )
    .bind(user_id)
    .fetch_all(exec)
    .await?;
    rows.iter().map(from_row).collect()
}

/// Updates title/content only where both id and owner match. Returns rows affected.
pub async fn update_owned<'e, E>(
    exec: E,
    id: NoteId,
    user_id: UserId,
    title: &str,
    content: &str,
) -> CoreResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE notes SET title = ?, content = ? WHERE id = ? AND user_id = ?")
        .bind(title)
        .bind(content)
        .bind(id)
        .bind(user_id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

/// Deletes only where both id and owner match. Returns rows affected.
pub async fn delete_owned<'e, E>(exec: E, id: NoteId, user_id: UserId) -> CoreResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::model::Role;
    use crate::store::users;

    async fn pool_with_user() -> (sqlx::SqlitePool, UserId) {
        let pool = db::connect_in_memory().await.unwrap();
        let user = users::insert(
            &pool,
            "alice",
            "alice@example.com",
            "hash",
            Role::User,
            &serde_json::json!({}),
        )
        .await
        .unwrap();
        (pool, user.id)
    }

    #[tokio::test]
    async fn insert_then_list_newest_first() {
        let (pool, uid) = pool_with_user().await;
        let first = insert(&pool, uid, "first", "a", Utc::now()).await.unwrap();
        let second = insert(&pool, uid, "second", "b", Utc::now()).await.unwrap();

        let notes = list_by_user(&pool, uid).await.unwrap();
        let ids: Vec<NoteId> = notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn created_at_survives_storage() {
        let (pool, uid) = pool_with_user().await;
        let note = insert(&pool, uid, "t", "c", Utc::now()).await.unwrap();
        let loaded = find_by_id(&pool, note.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, note.title);
        assert_eq!(loaded.user_id, uid);
        assert_eq!(
            loaded.created_at.timestamp_millis(),
            note.created_at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn update_and_delete_require_owner() {
        let (pool, uid) = pool_with_user().await;
        let note = insert(&pool, uid, "t", "c", Utc::now()).await.unwrap();

        assert_eq!(update_owned(&pool, note.id, uid + 1, "x", "y").await.unwrap(), 0);
        assert_eq!(delete_owned(&pool, note.id, uid + 1).await.unwrap(), 0);

        assert_eq!(update_owned(&pool, note.id, uid, "x", "y").await.unwrap(), 1);
        let loaded = find_by_id(&pool, note.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "x");

        assert_eq!(delete_owned(&pool, note.id, uid).await.unwrap(), 1);
        assert!(find_by_id(&pool, note.id).await.unwrap().is_none());
    }
}
