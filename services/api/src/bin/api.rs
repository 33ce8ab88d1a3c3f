//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        FileActivityLog, FileKnowledgeStore, JsonAdmissionStore, JsonUserStore, OllamaProvider,
        OpenAiChatProvider,
    },
    app::build_router,
    config::{Config, ConfigError, ProviderKind},
    error::ApiError,
    web::{AppState, ChatGateway, SessionStore},
};
use admission_core::ports::{
    ActivityLog, AdmissionStore, CompletionProvider, KnowledgeStore, UserStore,
};
use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Flat-File Stores ---
    // A corrupt users file aborts startup here rather than limping along.
    let users: Arc<dyn UserStore> =
        Arc::new(JsonUserStore::open(config.data_dir.join("users.json")).await?);
    let admissions: Arc<dyn AdmissionStore> =
        Arc::new(JsonAdmissionStore::new(config.data_dir.join("admissions.json")));
    let knowledge: Arc<dyn KnowledgeStore> =
        Arc::new(FileKnowledgeStore::new(config.data_dir.join("college_info.txt")));
    let activity: Arc<dyn ActivityLog> =
        Arc::new(FileActivityLog::new(config.data_dir.join("activity.log")));
    info!("Stores ready under {}", config.data_dir.display());

    // --- 3. Initialize the AI Provider ---
    let provider: Arc<dyn CompletionProvider> = match config.provider {
        ProviderKind::Ollama => {
            info!("Using local generation endpoint at {}", config.ollama_url);
            Arc::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ai_model.clone(),
                config.ai_timeout,
            ))
        }
        ProviderKind::OpenAi => {
            let api_key = config.openai_api_key.as_ref().ok_or_else(|| {
                ApiError::Config(ConfigError::MissingVar("OPENAI_API_KEY".to_string()))
            })?;
            info!("Using hosted chat-completion API, model {}", config.ai_model);
            let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            Arc::new(OpenAiChatProvider::new(
                client,
                config.ai_model.clone(),
                config.ai_temperature,
                config.ai_max_tokens,
            ))
        }
    };

    // --- 4. Build the Shared AppState ---
    let sessions = Arc::new(SessionStore::new(config.session_ttl));
    let gateway = Arc::new(ChatGateway::new(
        provider,
        knowledge.clone(),
        sessions.clone(),
        config.ai_timeout,
        config.chat_window,
    ));

    let app_state = Arc::new(AppState {
        users,
        admissions,
        knowledge,
        activity,
        gateway,
        sessions,
        config: config.clone(),
    });

    // --- 5. Create the Web Router & Start the Server ---
    let app = build_router(app_state);

    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
