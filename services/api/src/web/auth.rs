//! services/api/src/web/auth.rs
//!
//! Authentication endpoints: the login/register pages, the login and
//! register APIs, and logout.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

use admission_core::domain::{Role, User};
use admission_core::ports::PortError;

use crate::password;
use crate::web::middleware::session_id_from_headers;
use crate::web::pages::layout;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

/// Business outcomes ride in the body as `status`, matching what the
/// front-end branches on.
#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl AuthResponse {
    fn success(role: Option<Role>) -> Self {
        Self {
            status: "success".to_string(),
            role: role.map(|r| r.as_str().to_string()),
        }
    }

    fn error() -> Self {
        Self {
            status: "error".to_string(),
            role: None,
        }
    }
}

fn session_cookie(session_id: &str, ttl: chrono::Duration) -> String {
    format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        session_id,
        ttl.num_seconds()
    )
}

const CLEAR_COOKIE: &str = "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0";

//=========================================================================================
// Pages
//=========================================================================================

/// GET /login
pub async fn login_page() -> Html<String> {
    layout(
        "Login",
        r#"<h2>Login</h2>
<form id="login-form">
  <input name="username" placeholder="Username" required>
  <input name="password" type="password" placeholder="Password" required>
  <button type="submit">Login</button>
</form>
<p>New here? <a href="/register">Register</a></p>
<p id="msg"></p>
<script>
document.getElementById("login-form").addEventListener("submit", async (e) => {
  e.preventDefault();
  const form = new FormData(e.target);
  const res = await fetch("/api/login", {
    method: "POST",
    headers: {"Content-Type": "application/json"},
    body: JSON.stringify(Object.fromEntries(form)),
  });
  const data = await res.json();
  if (data.status === "success") {
    window.location = data.role === "Admin" ? "/admin" : "/";
  } else {
    document.getElementById("msg").textContent = "Invalid username or password";
  }
});
</script>"#,
    )
}

/// GET /register
pub async fn register_page() -> Html<String> {
    layout(
        "Register",
        r#"<h2>Register</h2>
<form id="register-form">
  <input name="name" placeholder="Full name" required>
  <input name="username" placeholder="Username" required>
  <input name="email" type="email" placeholder="Email" required>
  <input name="mobile" placeholder="Mobile" required>
  <input name="password" type="password" placeholder="Password" required>
  <button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Login</a></p>
<p id="msg"></p>
<script>
document.getElementById("register-form").addEventListener("submit", async (e) => {
  e.preventDefault();
  const form = new FormData(e.target);
  const res = await fetch("/api/register", {
    method: "POST",
    headers: {"Content-Type": "application/json"},
    body: JSON.stringify(Object.fromEntries(form)),
  });
  const data = await res.json();
  if (data.status === "success") {
    window.location = "/login";
  } else {
    document.getElementById("msg").textContent = "Username already taken";
  }
});
</script>"#,
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/login - Authenticate and establish a session
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AuthResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, (StatusCode, String)> {
    let user = state
        .users
        .find_by_username(&req.username)
        .await
        .map_err(|e| {
            error!("Failed to read user store: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read user store".to_string(),
            )
        })?;

    let Some(user) = user else {
        return Ok((StatusCode::UNAUTHORIZED, Json(AuthResponse::error())).into_response());
    };
    if !password::verify(&req.password, &user.password_hash) {
        return Ok((StatusCode::UNAUTHORIZED, Json(AuthResponse::error())).into_response());
    }

    let session = state.sessions.create(&user.username, user.role);
    if let Err(e) = state.activity.record("login", json!(user.username)).await {
        warn!("Could not record login event: {e}");
    }

    let cookie = session_cookie(&session.id, state.sessions.session_ttl());
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse::success(Some(user.role))),
    )
        .into_response())
}

/// POST /api/register - Create a new Student account
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered, or duplicate username (status=error)", body = AuthResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, (StatusCode, String)> {
    let password_hash = password::hash(&req.password).map_err(|e| {
        error!("Failed to hash password: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to hash password".to_string(),
        )
    })?;

    let username = req.username.clone();
    let user = User {
        name: req.name,
        username: req.username,
        email: req.email,
        mobile: req.mobile,
        password_hash,
        role: Role::Student,
    };

    match state.users.insert(user).await {
        Ok(()) => {}
        // Registration conflicts are a business outcome, not an HTTP error.
        Err(PortError::Duplicate(_)) => {
            return Ok(Json(AuthResponse::error()).into_response());
        }
        Err(e) => {
            error!("Failed to store user: {e}");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store user".to_string(),
            ));
        }
    }

    if let Err(e) = state.activity.record("register", json!(username)).await {
        warn!("Could not record register event: {e}");
    }

    Ok(Json(AuthResponse::success(None)).into_response())
}

/// GET /logout - Clear the session and return to the login page
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(session_id) = session_id_from_headers(&headers) {
        state.sessions.remove(session_id);
    }
    (
        [(header::SET_COOKIE, CLEAR_COOKIE.to_string())],
        Redirect::to("/login"),
    )
}
