use crate::config::{CatalogConfig, StoreBackend};
use crate::handlers::{self, artists, favorites, health, playlists};
use crate::services::{CatalogStore, MemoryCatalogStore, MongoCatalogStore};
use axum::{
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::{http_trace_layer, request_id_middleware},
};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_endpoint))
        .route(
            "/api/artists",
            get(artists::list_artists).post(artists::create_artist),
        )
        .route("/api/artists/:id", delete(artists::delete_artist))
        .route("/api/artists/:id/songs", post(artists::add_song))
        .route("/api/artists/:id/songs/:index", delete(artists::delete_song))
        .route(
            "/api/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route(
            "/api/playlists/:id",
            get(playlists::get_playlist).delete(playlists::delete_playlist),
        )
        .route("/api/playlists/:id/songs", post(playlists::add_song))
        .route(
            "/api/playlists/:id/songs/:index",
            delete(playlists::delete_song),
        )
        .route("/api/favorites", get(favorites::get_favorites))
        .route("/api/favorites/songs", post(favorites::add_favorite))
        .route(
            "/api/favorites/songs/:artist_id/*title",
            delete(favorites::remove_favorite),
        )
        .fallback(handlers::not_found)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Opens the configured store, then binds and serves.
    pub async fn build(config: CatalogConfig) -> Result<Self, AppError> {
        let store = open_store(&config).await?;
        Self::build_with_store(&config, store).await
    }

    /// Serves over an already opened store. Port 0 binds an ephemeral port.
    pub async fn build_with_store(
        config: &CatalogConfig,
        store: Arc<dyn CatalogStore>,
    ) -> Result<Self, AppError> {
        let app = build_router(AppState::new(store));

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn open_store(config: &CatalogConfig) -> Result<Arc<dyn CatalogStore>, AppError> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryCatalogStore::new()))
        }
        StoreBackend::Mongo => {
            let store = MongoCatalogStore::connect(
                config.mongodb.uri.expose_secret(),
                config.mongodb.database.as_deref(),
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                AppError::from(e)
            })?;

            // The server may be unreachable at boot; /health reports it later.
            if let Err(e) = store.initialize_indexes().await {
                tracing::warn!("Failed to initialize database indexes: {}", e);
            }

            Ok(Arc::new(store))
        }
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
