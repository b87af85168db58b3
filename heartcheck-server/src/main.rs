//! HeartCheck Server
//!
//! HTTP front end for heart disease risk prediction.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HEARTCHECK SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  API      │  │  Auth     │  │  Session Registry       │ │
//! │  │  Gateway  │  │  (JWT +   │  │  (history, last         │ │
//! │  │  (Axum)   │  │  CSV file)│  │   prediction per login) │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │               ┌────────────────┐                           │
//! │               │ heartcheck-core│                           │
//! │               │ (model, report)│                           │
//! │               └────────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod middleware;
mod error;
mod sessions;


use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heartcheck_core::{verifier_by_name, CredentialStore, CsvCredentialStore, InferenceEngine};

pub use error::{AppError, AppResult};
use sessions::SessionRegistry;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(&config);

    tracing::info!("HeartCheck Server starting...");
    tracing::info!("Model: {}", config.model_path.display());
    tracing::info!("Credentials: {}", config.credentials_path.display());

    // Build application state; missing artifacts are fatal
    let state = AppState::from_config(config.clone()).map_err(|e| {
        tracing::error!("Startup failed: {:#}", e);
        e
    })?;

    spawn_session_sweeper(state.sessions.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// JSON lines in production, human-readable otherwise
fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "heartcheck_server=debug,heartcheck_core=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Periodically drop sessions whose token has expired
fn spawn_session_sweeper(sessions: SessionRegistry) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.prune_expired();
            if removed > 0 {
                tracing::info!("Expired {} session(s), {} active", removed, sessions.len());
            }
        }
    });
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub engine: Arc<InferenceEngine>,
    pub sessions: SessionRegistry,
    pub config: config::Config,
}

impl AppState {
    /// Open the credential store and load the model artifacts
    pub fn from_config(config: config::Config) -> anyhow::Result<Self> {
        let verifier = verifier_by_name(&config.password_storage)
            .ok_or_else(|| anyhow!("unknown PASSWORD_STORAGE '{}'", config.password_storage))?;

        let credentials = CsvCredentialStore::open(config.credentials_path.clone(), verifier)
            .context("failed to open credential store")?;

        let engine = InferenceEngine::load(&config.model_path, &config.scaler_path)
            .context("failed to load model artifacts")?;

        Ok(Self {
            credentials: Arc::new(credentials),
            engine: Arc::new(engine),
            sessions: SessionRegistry::new(chrono::Duration::hours(config.jwt_expiration_hours as i64)),
            config,
        })
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/features", get(handlers::model::features))
        .route("/api/v1/model", get(handlers::model::status))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login));

    // Session routes (user JWT auth)
    let session_routes = Router::new()
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/report", get(handlers::reports::download))
        .route(
            "/api/v1/history",
            get(handlers::history::list).delete(handlers::history::clear),
        )
        .route("/api/v1/history/export", get(handlers::history::export))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
