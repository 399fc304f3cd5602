//! Rescate Server - Password Recovery Code Service

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, routing::post, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rescate_server::{
    api,
    config::{AppConfig, StorageBackend},
    repository::{memory::MemoryStore, redis::RedisStore, CodeStore},
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("rescate_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Rescate Server v{}", env!("CARGO_PKG_VERSION"));

    // Select the reset-record store
    let store: Arc<dyn CodeStore> = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Redis => {
            // backstop TTL well past the validity window; expiry itself is
            // decided from the record timestamp
            let backstop_seconds = (config.recovery.code_ttl_minutes as u64) * 60 * 2;
            let store = RedisStore::new(&config.storage.redis_url, backstop_seconds)
                .await
                .expect("Failed to connect to Redis");
            tracing::info!("Connected to Redis");
            Arc::new(store)
        }
    };

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create services
    let services = Services::new(
        store,
        config.recovery.clone(),
        config.email.clone(),
        config.backend.clone(),
    )
    .expect("Failed to create services");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Recovery flow
        .route("/recovery/request", post(api::recovery::request_reset))
        .route("/recovery/verify", post(api::recovery::verify_code))
        .route("/recovery/reset", post(api::recovery::reset_password))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
