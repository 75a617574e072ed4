//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::ServeConfig;
use crate::error::{ServerError, ServerResult};
use rebuild_lookup::{
    HttpDependencyGraph, IndexSource, LookupService, PomClient, TransitiveExpander,
};
use rebuild_types::RegistryTable;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Badge and redirect HTTP server
pub struct Server {
    config: ServeConfig,
    lookup: Arc<LookupService>,
    expander: Arc<TransitiveExpander>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: ServeConfig) -> ServerResult<Self> {
        let source = if let Some(dir) = &config.index.dir {
            IndexSource::local(dir)
        } else if let Some(url) = &config.index.url {
            IndexSource::remote(url)?
        } else {
            return Err(ServerError::NoIndexSource);
        };

        let lookup = Arc::new(LookupService::new(RegistryTable::new(), source));
        let graph = Arc::new(HttpDependencyGraph::new(&config.graph.endpoint)?);
        let expander = Arc::new(TransitiveExpander::new(PomClient::new()?, graph));

        Ok(Self {
            config,
            lookup,
            expander,
        })
    }

    /// Run the server
    pub async fn run(self) -> ServerResult<()> {
        let addr = self.config.http.listen_addr;

        let state = AppState::new(self.lookup.clone(), self.expander.clone());
        let app = create_router(state, self.config.http.enable_cors);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Badge server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        tracing::info!("Badge server shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
