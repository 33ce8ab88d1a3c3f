pub mod domain;
pub mod ports;

pub use domain::{Application, ChatRole, ChatTurn, Role, Session, User};
pub use ports::{
    ActivityLog, AdmissionStore, CompletionProvider, KnowledgeStore, PortError, PortResult,
    UserStore,
};
