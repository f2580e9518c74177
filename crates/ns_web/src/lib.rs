use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use ns_core::config::ServerConfig;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::AppState;

/// Upload ceiling for `/transcribe`, matching the speech API's own file limit.
const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/search", get(handlers::search))
        .route("/analyze", post(handlers::analyze))
        .route(
            "/transcribe",
            post(handlers::transcribe).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Binds `config.host:config.port` and serves until the process is stopped.
pub async fn serve(state: AppState, config: &ServerConfig) -> ns_core::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use ns_core::{Article, Result, Error};
    pub use crate::AppState;
}
