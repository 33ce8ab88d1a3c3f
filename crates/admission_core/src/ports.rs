//! crates/admission_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like flat-file stores
//! or AI provider APIs.

use crate::domain::{Application, ChatTurn, User};
use async_trait::async_trait;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., files, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// A record with the same identity key already exists.
    #[error("Duplicate: {0}")]
    Duplicate(String),
    /// A persisted file exists but cannot be read or parsed. Fatal at
    /// startup; never silently recovered.
    #[error("Store corrupt: {0}")]
    Corrupt(String),
    /// The external AI provider failed, timed out, or returned a malformed
    /// response.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> PortResult<Vec<User>>;

    async fn find_by_username(&self, username: &str) -> PortResult<Option<User>>;

    /// Appends a new user. Fails with `PortError::Duplicate` without
    /// mutating the store if the username is already taken.
    async fn insert(&self, user: User) -> PortResult<()>;

    /// Removes exactly the named user. Removing an unknown username is a
    /// no-op that still succeeds.
    async fn remove(&self, username: &str) -> PortResult<()>;
}

#[async_trait]
pub trait AdmissionStore: Send + Sync {
    /// Stamps the application with the server-side submission time and
    /// appends it. Previously recorded applications are never overwritten.
    async fn append(&self, application: Application) -> PortResult<Application>;

    async fn list(&self) -> PortResult<Vec<Application>>;
}

#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Returns the college-information blob, writing a default template on
    /// first use. Read-only from the application's perspective afterwards.
    async fn load(&self) -> PortResult<String>;
}

#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Appends one `{time, event, data}` record to the activity log.
    async fn record(&self, event: &str, data: Value) -> PortResult<()>;
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Produces the assistant's reply for one user turn.
    ///
    /// `history` holds the session's recent turns, oldest first; `knowledge`
    /// is the college-information context when available. Implementations
    /// fail with `PortError::Unavailable` on any transport, status, or
    /// response-shape problem.
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_text: &str,
        knowledge: Option<&str>,
    ) -> PortResult<String>;
}
