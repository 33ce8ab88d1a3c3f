//! services/api/src/web/middleware.rs
//!
//! Session and role middleware for protecting routes.
//!
//! Pages and APIs fail differently: an unauthenticated page request is
//! redirected to the login form, an unauthenticated API request gets a 401
//! JSON body. Role checks run after a session middleware has already
//! attached the `Session` to the request.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use admission_core::domain::{Role, Session};

use crate::web::state::AppState;

/// Pulls the session id out of the `Cookie` header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|c| {
        let c = c.trim();
        c.strip_prefix("session=")
    })
}

fn lookup_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let id = session_id_from_headers(headers)?;
    state.sessions.get(id)
}

/// Middleware for protected pages: redirect to the login page when there is
/// no valid session, otherwise attach the session and continue.
pub async fn require_session_page(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    match lookup_session(&state, req.headers()) {
        Some(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Middleware for protected APIs: 401 JSON when there is no valid session.
pub async fn require_session_api(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    match lookup_session(&state, req.headers()) {
        Some(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Unauthorized"})),
        )
            .into_response(),
    }
}

/// Middleware for Admin-only routes. Runs after one of the session
/// middlewares above; anything but an Admin session gets 403.
pub async fn require_admin(req: Request, next: Next) -> Response {
    let is_admin = req
        .extensions()
        .get::<Session>()
        .is_some_and(|session| session.role == Role::Admin);
    if is_admin {
        next.run(req).await
    } else {
        (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Forbidden"})),
        )
            .into_response()
    }
}
