//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use admission_core::ports::{ActivityLog, AdmissionStore, KnowledgeStore, UserStore};

use crate::config::Config;
use crate::web::gateway::ChatGateway;
use crate::web::session::SessionStore;

/// The shared application state, created once at startup and passed to all
/// handlers. Every request reads its stores and session through this handle
/// instead of ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub admissions: Arc<dyn AdmissionStore>,
    pub knowledge: Arc<dyn KnowledgeStore>,
    pub activity: Arc<dyn ActivityLog>,
    pub gateway: Arc<ChatGateway>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
}
