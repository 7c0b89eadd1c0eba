//! Ownership-scoped note CRUD.
//!
//! Every operation takes the caller's [`Identity`]. Reads, updates and
//! deletes load the note first and fail with [`CoreError::Forbidden`] when
//! `note.user_id != identity.user_id`; the write statements also filter by
//! owner.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{CoreError, CoreResult};
use crate::mask::mask_email;
use crate::model::{Identity, Note, NoteId, NoteInput};
use crate::store::notes;
use crate::validation;

#[derive(Debug, Clone)]
pub struct NoteService {
    pool: SqlitePool,
}

impl NoteService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, identity: &Identity, input: NoteInput) -> CoreResult<Note> {
        validation::validate_note(&input)?;
        let note = notes::insert(
            &self.pool,
            identity.user_id,
            input.title.trim(),
            &input.content,
            Utc::now(),
        )
        .await?;
        tracing::debug!("note {} created by user {}", note.id, identity.user_id);
        Ok(note)
    }

    /// The caller's notes, newest first.
    pub async fn list(&self, identity: &Identity) -> CoreResult<Vec<Note>> {
        notes::list_by_user(&self.pool, identity.user_id).await
    }

    /// Loads a note the caller owns.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoteNotFound`] if no such note exists.
    /// - [`CoreError::Forbidden`] if it belongs to someone else.
    pub async fn get(&self, identity: &Identity, id: NoteId) -> CoreResult<Note> {
        let note = notes::find_by_id(&self.pool, id)
            .await?
            .ok_or(CoreError::NoteNotFound)?;

        if note.user_id != identity.user_id {
            tracing::warn!(
                "unauthorized access attempt to note {id} by user: {}",
                mask_email(&identity.email)
            );
            return Err(CoreError::Forbidden);
        }
        Ok(note)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: NoteId,
        input: NoteInput,
    ) -> CoreResult<Note> {
        validation::validate_note(&input)?;
        let note = self.get(identity, id).await?;

        let title = input.title.trim();
        let affected =
            notes::update_owned(&self.pool, note.id, identity.user_id, title, &input.content)
                .await?;
        if affected == 0 {
            // deleted between the ownership check and the write
            return Err(CoreError::NoteNotFound);
        }

        Ok(Note {
            title: title.to_string(),
            content: input.content,
            ..note
        })
    }

    pub async fn delete(&self, identity: &Identity, id: NoteId) -> CoreResult<()> {
        let note = self.get(identity, id).await?;
        if notes::delete_owned(&self.pool, note.id, identity.user_id).await? == 0 {
            return Err(CoreError::NoteNotFound);
        }
        tracing::debug!("note {id} deleted by user {}", identity.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::model::Role;
    use crate::store::users;

    async fn setup() -> (NoteService, Identity, Identity) {
        let pool = db::connect_in_memory().await.unwrap();
        let mut identities = Vec::new();
        for (name, email) in [("alice", "alice@example.com"), ("bob", "bob@example.com")] {
            let user = users::insert(&pool, name, email, "hash", Role::User, &serde_json::json!({}))
                .await
                .unwrap();
            identities.push(user.identity());
        }
        let bob = identities.pop().unwrap();
        let alice = identities.pop().unwrap();
        (NoteService::new(pool), alice, bob)
    }

    fn input(title: &str, content: &str) -> NoteInput {
        NoteInput {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn owner_can_read_update_delete() {
        let (svc, alice, _bob) = setup().await;
        let note = svc.create(&alice, input("groceries", "milk")).await.unwrap();

        let loaded = svc.get(&alice, note.id).await.unwrap();
        assert_eq!(loaded.content, "milk");

        let updated = svc
            .update(&alice, note.id, input("groceries", "milk, eggs"))
            .await
            .unwrap();
        assert_eq!(updated.content, "milk, eggs");
        assert_eq!(updated.created_at, note.created_at);

        svc.delete(&alice, note.id).await.unwrap();
        assert!(matches!(
            svc.get(&alice, note.id).await,
            Err(CoreError::NoteNotFound)
        ));
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let (svc, alice, bob) = setup().await;
        let note = svc.create(&alice, input("secret", "diary")).await.unwrap();

        assert!(matches!(
            svc.get(&bob, note.id).await,
            Err(CoreError::Forbidden)
        ));
        assert!(matches!(
            svc.update(&bob, note.id, input("hacked", "hacked")).await,
            Err(CoreError::Forbidden)
        ));
        assert!(matches!(
            svc.delete(&bob, note.id).await,
            Err(CoreError::Forbidden)
        ));

        let still_there = svc.get(&alice, note.id).await.unwrap();
        assert_eq!(still_there.title, "secret");
    }

    #[tokio::test]
    async fn list_is_scoped_to_caller() {
        let (svc, alice, bob) = setup().await;
        svc.create(&alice, input("a1", "x")).await.unwrap();
        svc.create(&alice, input("a2", "x")).await.unwrap();
        svc.create(&bob, input("b1", "x")).await.unwrap();

        let titles: Vec<String> = svc
            .list(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["a2", "a1"]);
        assert_eq!(svc.list(&bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_note_is_not_found() {
        let (svc, alice, _bob) = setup().await;
        assert!(matches!(
            svc.delete(&alice, 404).await,
            Err(CoreError::NoteNotFound)
        ));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let (svc, alice, _bob) = setup().await;
        assert!(matches!(
            svc.create(&alice, input("", "")).await,
            Err(CoreError::Validation(_))
        ));
    }
}
