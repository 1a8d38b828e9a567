//! The resource server.

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::registry::Registry;
use crate::router::build_router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HTTP server exposing a registry of entity types.
///
/// # Example
///
/// ```rust,ignore
/// let store = Arc::new(MemoryStore::new());
/// let mut registry = Registry::new();
/// registry.register::<Customer, _>(store);
///
/// let server = ApiServer::new(ServerConfig::default(), registry);
/// server.serve().await?;
/// ```
pub struct ApiServer {
    config: ServerConfig,
    registry: Arc<Registry>,
}

impl ApiServer {
    /// Creates a server over the given registry.
    #[must_use]
    pub fn new(config: ServerConfig, registry: Registry) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
        }
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Builds the router (useful for testing without a listener).
    #[must_use]
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.registry))
    }

    /// Binds the configured address and serves requests until shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] wrapping an unavailable-medium error
    /// if the listener cannot be bound or the server fails.
    pub async fn serve(self) -> ApiResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(|e| ApiError::Store(docstore_core::StoreError::unavailable(e.to_string())))?;
        tracing::info!("docstore server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ApiError::Store(docstore_core::StoreError::unavailable(e.to_string())))
    }
}
