//! services/api/src/web/admin.rs
//!
//! The admin panel and its APIs: user listing, role counts, user deletion.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

use admission_core::domain::{Role, User};

use crate::web::pages::{escape_html, layout};
use crate::web::state::AppState;

//=========================================================================================
// Response Types
//=========================================================================================

/// A user as shown to admins. Password hashes never leave the store.
#[derive(Serialize, ToSchema)]
pub struct AdminUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub role: String,
}

impl AdminUser {
    fn from_domain(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub status: String,
}

struct RoleCounts {
    total: usize,
    students: usize,
    admins: usize,
}

fn count_roles(users: &[User]) -> RoleCounts {
    RoleCounts {
        total: users.len(),
        students: users.iter().filter(|u| u.role == Role::Student).count(),
        admins: users.iter().filter(|u| u.role == Role::Admin).count(),
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /admin - the admin panel page.
pub async fn admin_panel(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let users = state.users.list().await.map_err(|e| {
        error!("Failed to read user store: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to read user store".to_string(),
        )
    })?;
    let counts = count_roles(&users);

    let mut rows = String::new();
    for user in &users {
        let shown = AdminUser::from_domain(user);
        rows.push_str(&format!(
            "  <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/api/admin/delete/{}\">delete</a></td></tr>\n",
            escape_html(&shown.name),
            escape_html(&shown.username),
            escape_html(&shown.email),
            escape_html(&shown.mobile),
            shown.role,
            escape_html(&shown.username)
        ));
    }

    Ok(layout(
        "Admin",
        &format!(
            "<h2>Admin Panel</h2>\n<p>Total users: {} | Students: {} | Admins: {}</p>\n\
             <table>\n  <tr><th>Name</th><th>Username</th><th>Email</th><th>Mobile</th>\
             <th>Role</th><th></th></tr>\n{}</table>",
            counts.total, counts.students, counts.admins, rows
        ),
    ))
}

/// GET /api/admin/users - list all users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All registered users", body = [AdminUser]),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Logged in but not an Admin"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AdminUser>>, (StatusCode, String)> {
    let users = state.users.list().await.map_err(|e| {
        error!("Failed to read user store: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to read user store".to_string(),
        )
    })?;
    Ok(Json(users.iter().map(AdminUser::from_domain).collect()))
}

/// GET /api/admin/delete/{username} - remove a user
#[utoipa::path(
    get,
    path = "/api/admin/delete/{username}",
    params(("username" = String, Path, description = "The account to remove")),
    responses(
        (status = 200, description = "Removed (or was never present)", body = DeleteResponse),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Logged in but not an Admin"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<DeleteResponse>, (StatusCode, String)> {
    state.users.remove(&username).await.map_err(|e| {
        error!("Failed to update user store: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to update user store".to_string(),
        )
    })?;

    if let Err(e) = state.activity.record("delete_user", json!(username)).await {
        warn!("Could not record delete_user event: {e}");
    }

    Ok(Json(DeleteResponse {
        status: "success".to_string(),
    }))
}
