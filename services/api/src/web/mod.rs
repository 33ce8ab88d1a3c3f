pub mod admin;
pub mod admission;
pub mod auth;
pub mod chat;
pub mod gateway;
pub mod middleware;
pub mod pages;
pub mod rest;
pub mod session;
pub mod state;

// Re-export the pieces the router assembly and the binaries reach for most.
pub use gateway::ChatGateway;
pub use session::SessionStore;
pub use state::AppState;
