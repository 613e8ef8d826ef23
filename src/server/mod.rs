use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use handlers::{envelope_oversized_body, ping_handler, query_handler};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

use crate::config::ServerConfig;
use crate::gateway::{Executor, Store};

pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub executor: Executor,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(store: Store, config: ServerConfig) -> Self {
        Self {
            executor: Executor::new(store),
            config,
        }
    }
}

/// Routes plus the CORS and body-size layers. Any origin may call the gateway.
/// Oversized bodies are answered with a 413 failure envelope whether they are
/// refused up front by `Content-Length` or while the handler buffers them.
pub fn build_router(app_state: AppState) -> Router {
    let max_body_bytes = app_state.config.max_body_bytes;

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/query", post(query_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(middleware::map_response_with_state(
            max_body_bytes,
            envelope_oversized_body,
        ))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(app_state))
}

pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    // Load server configuration from environment variables
    let config = ServerConfig::from_env().context("Configuration error")?;
    run_with_config(config).await
}

pub async fn run_with_config(config: ServerConfig) -> anyhow::Result<()> {
    dotenv().ok();

    log::info!(
        "Server configuration: http={}, database={}, verbose_errors={}",
        config.bind_address(),
        config.database_path.display(),
        config.verbose_errors
    );

    let store = Store::open(&config.database_path, config.busy_timeout()).with_context(|| {
        format!(
            "Failed to open SQLite database at {}",
            config.database_path.display()
        )
    })?;

    let http_bind_address = config.bind_address();
    let app = build_router(AppState::new(store, config.clone()));

    let http_listener = TcpListener::bind(&http_bind_address)
        .await
        .with_context(|| {
            format!(
                "Failed to bind HTTP listener to {} (is another process using port {}?)",
                http_bind_address, config.http_port
            )
        })?;
    log::info!("Listening on {}", http_bind_address);

    let http_server = axum::serve(http_listener, app);

    if config.daemon {
        log::info!("Running in daemon mode - press Ctrl+C to stop");
        http_server
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;
        log::info!("Server stopped");
    } else {
        // Run HTTP server (this will block until shutdown)
        http_server.await.context("HTTP server fatal error")?;
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    log::error!(
                        "Failed to register signal handlers: {}. Server will run without graceful shutdown.",
                        e
                    );
                    std::future::pending::<()>().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => log::info!("Received SIGTERM, shutting down..."),
            _ = sigint.recv() => log::info!("Received SIGINT, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
        log::info!("Received shutdown signal, shutting down...");
    }
}
