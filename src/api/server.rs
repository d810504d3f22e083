//! HTTP API server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{track_activity, AccountDirectory, AuthService, SessionStore};
use crate::config::Config;
use crate::error::Result;

use super::{routes, sweeper};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build a fresh directory and session store from configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let directory = AccountDirectory::new(config.seed_accounts())?;
        let sessions = SessionStore::new(config.session.timeout());
        let auth = AuthService::new(Arc::new(directory), sessions);
        Ok(Self { config, auth })
    }
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, Arc::new(AppState::from_config(config)?)).await
}

/// Serve on an already bound listener until Ctrl-C
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    let sweeper = sweeper::start_session_sweeper(
        state.auth.sessions().clone(),
        state.config.session.sweep_interval(),
    );

    let app = create_router(state);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.abort();
    result?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the task is dropped
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        // Auth routes
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/status", get(routes::status))
        .route("/api/auth/remember-password", post(routes::remember_password))
        .route("/api/auth/check-session", get(routes::check_session))
        .route("/api/auth/logout", post(routes::logout))
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), track_activity))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
