// Server module - Builds the router and runs the HTTP server

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::infrastructure::AppState;
use crate::infrastructure::config::{Config, ConfigError};
use crate::infrastructure::db;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to initialize database: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("failed to bind or serve: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the API router with database connection
pub fn build_router(db: DatabaseConnection) -> Router {
    let state = AppState::new(db);
    api::api_router(state).layer(TraceLayer::new_for_http())
}

/// Connect, migrate and serve until the process is stopped
pub async fn run(config: Config) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;

    let db = db::init_db(&config.database_url).await?;
    let app = build_router(db);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Book manager listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
