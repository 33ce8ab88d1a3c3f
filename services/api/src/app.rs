//! services/api/src/app.rs
//!
//! Router assembly, shared by the `api` binary and the router tests.
//!
//! Routes are layered by what failing authentication should look like:
//! public, protected pages (redirect), protected APIs (401 JSON), and the
//! Admin-only slices of each (403 after the session check).

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::web::rest::ApiDoc;
use crate::web::state::AppState;
use crate::web::{admin, admission, auth, chat, middleware, pages, rest};

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, ACCEPT])
}

/// Builds the complete application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/login", get(auth::login_page))
        .route("/register", get(auth::register_page))
        .route("/api/login", post(auth::login_handler))
        .route("/api/register", post(auth::register_handler))
        .route("/logout", get(auth::logout_handler))
        .route("/api/health", get(rest::health_handler));

    let protected_pages = Router::new()
        .route("/", get(pages::home))
        .route("/courses", get(pages::courses))
        .route("/fees", get(pages::fees))
        .route("/admission-process", get(pages::admission_process))
        .route("/admission", get(pages::admission))
        .route("/chatbot", get(pages::chatbot))
        .route("/recommend", get(pages::recommend))
        .route("/profile", get(pages::profile))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session_page,
        ));

    // The admin page redirects like every other page when logged out, and
    // turns 403 only for an authenticated non-Admin.
    let admin_page = Router::new()
        .route("/admin", get(admin::admin_panel))
        .layer(axum_middleware::from_fn(middleware::require_admin))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session_page,
        ));

    let protected_api = Router::new()
        .route("/api/chat", post(chat::chat_handler))
        .route("/api/apply", post(admission::apply_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session_api,
        ));

    let admin_api = Router::new()
        .route("/api/admin/users", get(admin::list_users_handler))
        .route("/api/admin/delete/{username}", get(admin::delete_user_handler))
        .layer(axum_middleware::from_fn(middleware::require_admin))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session_api,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_pages)
        .merge(admin_page)
        .merge(protected_api)
        .merge(admin_api)
        .layer(cors_layer(&state.config))
        .with_state(state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
