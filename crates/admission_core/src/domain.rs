//! crates/admission_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage or serialization format.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// The role attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    /// The canonical string form used in persisted files and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Student => "Student",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "Admin" => Some(Role::Admin),
            "Student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// A registered account. `username` is the identity key.
#[derive(Debug, Clone)]
pub struct User {
    pub name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    /// Salted argon2 hash, never the plaintext.
    pub password_hash: String,
    pub role: Role,
}

/// A submitted admission application. Records are append-only: once written
/// they are never mutated or deleted.
#[derive(Debug, Clone)]
pub struct Application {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub course: String,
    /// Any additional free-form fields the applicant submitted.
    pub extra: Map<String, Value>,
    /// Assigned by the store at append time.
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message of a chat exchange with the admission assistant.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A server-side login session. Created at login, removed at logout,
/// expired after its TTL. Carries the bounded chat history for the
/// admission assistant.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub chat_history: Vec<ChatTurn>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Appends a turn, evicting the oldest messages so the history never
    /// holds more than `window` messages.
    pub fn remember(&mut self, turn: ChatTurn, window: usize) {
        self.chat_history.push(turn);
        if self.chat_history.len() > window {
            let overflow = self.chat_history.len() - window;
            self.chat_history.drain(..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session() -> Session {
        Session {
            id: "s-1".to_string(),
            username: "alice".to_string(),
            role: Role::Student,
            chat_history: Vec::new(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[test]
    fn role_round_trips_through_its_string_form() {
        assert_eq!(Role::parse(Role::Admin.as_str()), Some(Role::Admin));
        assert_eq!(Role::parse(Role::Student.as_str()), Some(Role::Student));
        assert_eq!(Role::parse("Superuser"), None);
    }

    #[test]
    fn remember_keeps_at_most_window_messages() {
        let mut s = session();
        for i in 0..20 {
            s.remember(ChatTurn::user(format!("q{i}")), 6);
            s.remember(ChatTurn::assistant(format!("a{i}")), 6);
        }
        assert_eq!(s.chat_history.len(), 6);
        // Oldest turns are evicted first.
        assert_eq!(s.chat_history[0].content, "q17");
        assert_eq!(s.chat_history[5].content, "a19");
    }

    #[test]
    fn session_expiry_is_checked_against_the_clock() {
        let mut s = session();
        let now = Utc::now();
        assert!(!s.is_expired(now));
        s.expires_at = now - Duration::seconds(1);
        assert!(s.is_expired(now));
    }
}
