use std::time::{Duration, Instant};

use dashmap::DashMap;
use notekeep_core::UserId;

/// A signed-in browser session.
#[derive(Debug, Clone)]
pub struct WebSession {
    pub user_id: UserId,
    pub created_at: Instant,
}

/// In-memory form-login sessions keyed by an opaque cookie value.
pub struct SessionStore {
    sessions: DashMap<String, WebSession>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Starts a session for `user_id` and returns its id.
    pub fn create(&self, user_id: UserId) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(
            session_id.clone(),
            WebSession {
                user_id,
                created_at: Instant::now(),
            },
        );
        tracing::debug!("Session store size: {}", self.len());
        session_id
    }

    pub fn get(&self, session_id: &str) -> Option<WebSession> {
        let entry = self.sessions.get(session_id)?;
        if entry.created_at.elapsed() > self.ttl {
            drop(entry);
            self.sessions.remove(session_id);
            return None;
        }
        Some(entry.clone())
    }

    pub fn remove(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    pub fn cleanup_expired(&self) {
        let ttl = self.ttl;
        self.sessions.retain(|_, session| session.created_at.elapsed() <= ttl);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}
