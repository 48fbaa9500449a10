//! Application startup and lifecycle management.

use crate::config::MarketplaceConfig;
use crate::handlers;
use crate::services::MarketplaceDb;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: MarketplaceConfig,
    /// `None` when no database is configured.
    pub db: Option<MarketplaceDb>,
}

impl AppState {
    pub fn new(config: MarketplaceConfig, db: Option<MarketplaceDb>) -> Self {
        Self { config, db }
    }

    /// The store handle, or the error every listing endpoint reports without one.
    pub fn store(&self) -> Result<&MarketplaceDb, AppError> {
        self.db.as_ref().ok_or_else(|| {
            tracing::error!("Listing request without a configured database");
            AppError::DatabaseError(anyhow::anyhow!("Datenbank nicht verfügbar"))
        })
    }
}

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/test", get(handlers::diagnostics))
        .route("/api/categories", get(handlers::categories))
        .route(
            "/api/listings",
            post(handlers::create_listing).get(handlers::list_listings),
        )
        .route("/api/listings/:listing_id", get(handlers::get_listing))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        // Open to every origin, method and header.
        .layer(CorsLayer::very_permissive())
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: MarketplaceConfig) -> Result<Self, AppError> {
        let db = match config.database.connection() {
            Some((uri, database)) => {
                let db = MarketplaceDb::connect(uri, database).await?;
                // Index creation waits for server selection; it must not hold
                // up binding the listener.
                let indexer = db.clone();
                tokio::spawn(async move {
                    if let Err(e) = indexer.initialize_indexes().await {
                        tracing::warn!("Skipping index creation: {}", e);
                    }
                });
                Some(db)
            }
            None => {
                tracing::warn!("DATABASE_URL or DATABASE_NAME not set; running without a database");
                None
            }
        };

        let state = AppState::new(config.clone(), db);

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Marketplace service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> Option<&MarketplaceDb> {
        self.state.db.as_ref()
    }

    /// Serve until Ctrl+C or SIGTERM, then drop the store handle.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
