use std::sync::Arc;

use biblio_catalog::BookCatalog;
use biblio_store::{KvStore, RedisKvStore};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Biblio web server.
pub struct BiblioServer {
    config: ServerConfig,
    catalog: BookCatalog,
}

impl BiblioServer {
    /// Serve the catalog backed by an explicitly constructed store.
    pub fn new(config: ServerConfig, store: Arc<dyn KvStore>) -> Self {
        Self {
            config,
            catalog: BookCatalog::new(store),
        }
    }

    /// Connect to the store named in `config` and build the server.
    pub async fn connect(config: ServerConfig) -> ServerResult<Self> {
        let store = RedisKvStore::connect(&config.store).await?;
        Ok(Self::new(config, Arc::new(store)))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &BookCatalog {
        &self.catalog
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(self.catalog.clone()))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        if self.config.uses_default_secret() {
            warn!("secret key is the built-in default; set FLASK_SECRET_KEY in production");
        }
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("Biblio listening on http://{}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
