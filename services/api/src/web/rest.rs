//! services/api/src/web/rest.rs
//!
//! The health endpoint and the master definition for the OpenAPI
//! specification.

use axum::Json;
use chrono::Utc;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::login_handler,
        crate::web::auth::register_handler,
        crate::web::chat::chat_handler,
        crate::web::admission::apply_handler,
        crate::web::admin::list_users_handler,
        crate::web::admin::delete_user_handler,
        health_handler,
    ),
    components(
        schemas(
            crate::web::auth::LoginRequest,
            crate::web::auth::RegisterRequest,
            crate::web::auth::AuthResponse,
            crate::web::chat::ChatRequest,
            crate::web::chat::ChatResponse,
            crate::web::admission::ApplyResponse,
            crate::web::admin::AdminUser,
            crate::web::admin::DeleteResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "Admission Assistant API", description = "Authentication, admission applications, and the AI chat assistant.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Handlers
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub time: String,
}

/// GET /api/health - liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "The service is up", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running".to_string(),
        time: Utc::now().to_rfc3339(),
    })
}
