//! JurisAcademy chat backend entry point.
//!
//! Wires configuration, the PostgreSQL pool, the Supabase session
//! validator, and the Gemini provider into the HTTP router, then serves
//! it with axum.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use juris_academy_chat::adapters::ai::{GeminiConfig, GeminiProvider};
use juris_academy_chat::adapters::auth::{SupabaseConfig, SupabaseSessionValidator};
use juris_academy_chat::adapters::http::{
    chat_router, health_router, resolve_session, AuthState, ChatAppState,
};
use juris_academy_chat::adapters::postgres::{PostgresChatEventStore, PostgresConversationStore};
use juris_academy_chat::adapters::TokioRetryDelay;
use juris_academy_chat::application::SendMessageHandler;
use juris_academy_chat::config::AppConfig;
use juris_academy_chat::ports::{ChatEventStore, ConversationStore, ModelProvider, RetryDelay};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = connect_database(&config).await?;
    if config.database.run_migrations {
        info!("Running database migrations");
        sqlx::migrate!().run(&pool).await?;
    }

    let app = build_router(&config, pool);

    let addr = config.server.socket_addr();
    info!(%addr, "Starting JurisAcademy chat backend");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize the tracing subscriber from the configured log filter.
///
/// Production emits JSON lines; development keeps the human-readable format.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Create the PostgreSQL pool with the configured sizing and timeouts.
async fn connect_database(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await
}

/// Assemble the full application router.
fn build_router(config: &AppConfig, pool: PgPool) -> axum::Router {
    let conversations: Arc<dyn ConversationStore> =
        Arc::new(PostgresConversationStore::new(pool.clone()));
    let events: Arc<dyn ChatEventStore> = Arc::new(PostgresChatEventStore::new(pool));
    let model: Arc<dyn ModelProvider> = Arc::new(GeminiProvider::new(
        GeminiConfig::new(config.ai.gemini_api_key.clone())
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    ));
    let delay: Arc<dyn RetryDelay> = Arc::new(TokioRetryDelay);

    let handler = Arc::new(SendMessageHandler::new(
        conversations,
        events.clone(),
        model,
        delay,
    ));
    let state = ChatAppState::new(handler, events);

    let auth_state: AuthState = Arc::new(SupabaseSessionValidator::new(
        SupabaseConfig::new(
            config.auth.supabase_url.clone(),
            config.auth.supabase_anon_key.clone(),
        )
        .with_timeout(config.auth.introspection_timeout()),
    ));

    chat_router()
        .layer(middleware::from_fn_with_state(auth_state, resolve_session))
        .with_state(state)
        .merge(health_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(config))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Build the CORS layer from the configured origin list.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
