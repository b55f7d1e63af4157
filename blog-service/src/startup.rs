//! Application startup and lifecycle management.

use crate::config::BlogConfig;
use crate::handlers::{self, healthz, metrics_endpoint, readiness_check};
use crate::services::{DocumentBlogStore, MongoBlogStore, PostgresBlogStore, RelationalBlogStore};
use axum::{middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Store handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub sql: Arc<dyn RelationalBlogStore>,
    pub mongo: Arc<dyn DocumentBlogStore>,
}

impl AppState {
    pub fn new(sql: Arc<dyn RelationalBlogStore>, mongo: Arc<dyn DocumentBlogStore>) -> Self {
        Self { sql, mongo }
    }
}

pub fn build_router(state: AppState) -> Router {
    let sql = Router::new()
        .route("/blog", get(handlers::sql::list_blogs))
        .route("/random", get(handlers::sql::randomize));

    let mongo = Router::new()
        .route("/blog", get(handlers::mongo::list_blogs))
        .route("/random", get(handlers::mongo::randomize));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .nest("/sql", sql)
        .nest("/mongo", mongo)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    postgres: PostgresBlogStore,
    mongo: MongoBlogStore,
}

impl Application {
    /// Connect both stores and bind the listener. Any failure aborts startup.
    pub async fn build(config: BlogConfig) -> Result<Self, AppError> {
        let postgres = PostgresBlogStore::connect(&config.postgres)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to PostgreSQL: {}", e);
                e
            })?;

        if config.postgres.run_migrations {
            postgres.run_migrations().await.map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        }

        let mongo = MongoBlogStore::connect(&config.mongodb).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            e
        })?;

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Blog service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            postgres,
            mongo,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn postgres(&self) -> &PostgresBlogStore {
        &self.postgres
    }

    pub fn mongo(&self) -> &MongoBlogStore {
        &self.mongo
    }

    /// Serve until a shutdown signal arrives, then release both database handles.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let state = AppState::new(
            Arc::new(self.postgres.clone()),
            Arc::new(self.mongo.clone()),
        );
        let router = build_router(state);

        let result = axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        tracing::info!("Gracefully shutting down...");
        self.postgres.close().await;
        self.mongo.shutdown().await;

        result
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
