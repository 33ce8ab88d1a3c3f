//! services/api/src/web/admission.rs
//!
//! The application-submission API. Validates the required fields, then
//! appends the record (including any extra free-form fields) to the
//! admission store.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

use admission_core::domain::Application;

use crate::web::state::AppState;

const REQUIRED_FIELDS: [&str; 4] = ["name", "email", "mobile", "course"];

#[derive(Serialize, ToSchema)]
pub struct ApplyResponse {
    pub status: String,
    pub message: String,
}

/// POST /api/apply - submit an admission application
#[utoipa::path(
    post,
    path = "/api/apply",
    request_body(content = Value, description = "Application fields; name, email, mobile and course are required"),
    responses(
        (status = 200, description = "Submitted, or a missing required field (status=error)", body = ApplyResponse),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn apply_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<ApplyResponse>, (StatusCode, String)> {
    let Some(fields) = body.as_object() else {
        return Ok(Json(ApplyResponse {
            status: "error".to_string(),
            message: "name required".to_string(),
        }));
    };

    // A field that is absent, null, or blank is treated as missing.
    for field in REQUIRED_FIELDS {
        let present = fields
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|v| !v.trim().is_empty());
        if !present {
            return Ok(Json(ApplyResponse {
                status: "error".to_string(),
                message: format!("{field} required"),
            }));
        }
    }

    let take = |name: &str| -> String {
        fields
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let extra: Map<String, Value> = fields
        .iter()
        .filter(|(k, _)| !REQUIRED_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let application = Application {
        name: take("name"),
        email: take("email"),
        mobile: take("mobile"),
        course: take("course"),
        extra,
        submitted_at: None,
    };

    state.admissions.append(application).await.map_err(|e| {
        error!("Failed to store application: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store application".to_string(),
        )
    })?;

    if let Err(e) = state.activity.record("apply", json!(fields)).await {
        warn!("Could not record apply event: {e}");
    }

    Ok(Json(ApplyResponse {
        status: "success".to_string(),
        message: "Application submitted".to_string(),
    }))
}
