//! ServerBuilder for fluent API to build HTTP servers

use super::router::build_app;
use super::state::AppState;
use crate::config::CatalogConfig;
use crate::core::service::ProductService;
use crate::core::store::ProductStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the catalog HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(CatalogConfig::load()?)
///     .with_store(InMemoryProductStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn ProductStore>>,
    config: CatalogConfig,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            store: None,
            config: CatalogConfig::default(),
        }
    }

    /// Set the configuration (pagination limits, CORS, listen address)
    pub fn with_config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the product store (required)
    pub fn with_store(mut self, store: impl ProductStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared product store (required)
    pub fn with_shared_store(mut self, store: Arc<dyn ProductStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the application state
    ///
    /// Fails when no store was set or the configuration does not validate.
    pub fn build_state(&self) -> Result<AppState> {
        self.config.validate()?;

        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("ProductStore is required. Call .with_store()"))?;

        Ok(AppState::new(ProductService::new(
            store,
            self.config.pagination.clone(),
        )))
    }

    /// Build the final router, with CORS and request tracing layers
    pub fn build(self) -> Result<Router> {
        let state = self.build_state()?;
        Ok(build_app(state, &self.config.cors))
    }

    /// Serve on the configured address with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_addr().await?;
        let listener = TcpListener::bind(addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener with graceful shutdown
    pub async fn serve_on(self, listener: TcpListener) -> Result<()> {
        let backend = self
            .store
            .as_ref()
            .map(|s| s.backend())
            .unwrap_or("none");
        let app = self.build()?;

        tracing::info!(
            addr = %listener.local_addr()?,
            backend,
            "Server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
