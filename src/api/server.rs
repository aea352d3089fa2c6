//! API Server setup

use axum::Router;
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::auth::JwtConfig;
use crate::api::routes::create_router;
use crate::api::state::AppState;
use crate::config::AppConfig;
use crate::errors::{Error, Result};

/// Create the API server
pub fn create_server(config: &AppConfig, db: DatabaseConnection) -> Result<(Router, SocketAddr)> {
    let jwt = JwtConfig::from_settings(&config.auth)?;
    let state = AppState::new(Arc::new(db), jwt);

    let mut router = create_router(state).layer(TraceLayer::new_for_http());

    if config.server.enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| Error::Config {
            message: format!(
                "Invalid listen address {}:{}: {e}",
                config.server.host, config.server.port
            ),
        })?;

    Ok((router, addr))
}

/// Run the API server until Ctrl+C
pub async fn run_server(config: &AppConfig, db: DatabaseConnection) -> Result<()> {
    let (router, addr) = create_server(config, db)?;

    let listener = TcpListener::bind(addr).await?;
    info!("Expense tracker API listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
