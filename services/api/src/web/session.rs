//! services/api/src/web/session.rs
//!
//! In-memory login sessions. Each session is a server-side record keyed by an
//! opaque uuid carried in the `session=` cookie, and owns the bounded chat
//! history for the admission assistant.
//!
//! Critical sections are short and never await, so the map can live behind a
//! plain std mutex.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use admission_core::domain::{ChatTurn, Role, Session};
use chrono::Utc;
use uuid::Uuid;

pub struct SessionStore {
    ttl: chrono::Duration,
    inner: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: chrono::Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Establishes a session for a freshly authenticated user.
    pub fn create(&self, username: &str, role: Role) -> Session {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            role,
            chat_history: Vec::new(),
            expires_at: Utc::now() + self.ttl,
        };
        self.map().insert(session.id.clone(), session.clone());
        session
    }

    /// Looks up a session, dropping it when expired.
    pub fn get(&self, id: &str) -> Option<Session> {
        let mut map = self.map();
        match map.get(id) {
            Some(session) if session.is_expired(Utc::now()) => {
                map.remove(id);
                None
            }
            Some(session) => Some(session.clone()),
            None => None,
        }
    }

    pub fn remove(&self, id: &str) {
        self.map().remove(id);
    }

    /// Snapshot of the session's chat history, oldest turn first.
    pub fn history(&self, id: &str) -> Vec<ChatTurn> {
        self.map()
            .get(id)
            .map(|s| s.chat_history.clone())
            .unwrap_or_default()
    }

    /// Records one completed exchange, keeping the history within `window`
    /// messages. Only the request owning the session calls this.
    pub fn append_exchange(&self, id: &str, user_text: &str, reply: &str, window: usize) {
        if let Some(session) = self.map().get_mut(id) {
            session.remember(ChatTurn::user(user_text), window);
            session.remember(ChatTurn::assistant(reply), window);
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_logout_lifecycle() {
        let store = SessionStore::new(chrono::Duration::hours(1));
        let session = store.create("alice", Role::Student);

        let found = store.get(&session.id).unwrap();
        assert_eq!(found.username, "alice");
        assert_eq!(found.role, Role::Student);

        store.remove(&session.id);
        assert!(store.get(&session.id).is_none());
    }

    #[test]
    fn expired_sessions_are_dropped_on_lookup() {
        let store = SessionStore::new(chrono::Duration::seconds(-1));
        let session = store.create("alice", Role::Student);
        assert!(store.get(&session.id).is_none());
    }

    #[test]
    fn history_stays_within_the_window_across_many_exchanges() {
        let store = SessionStore::new(chrono::Duration::hours(1));
        let session = store.create("alice", Role::Student);

        for i in 0..50 {
            store.append_exchange(&session.id, &format!("q{i}"), &format!("a{i}"), 6);
        }

        let history = store.history(&session.id);
        assert_eq!(history.len(), 6);
        assert_eq!(history[0].content, "q47");
        assert_eq!(history[5].content, "a49");
    }

    #[test]
    fn unknown_session_has_empty_history() {
        let store = SessionStore::new(chrono::Duration::hours(1));
        assert!(store.history("nope").is_empty());
        // Appending to a vanished session is silently ignored.
        store.append_exchange("nope", "q", "a", 6);
    }
}
