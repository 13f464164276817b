/**
 * Server Initialization
 *
 * # Startup Order
 *
 * 1. Open the note store from the configured connection string
 * 2. Build the hub and the router (middleware, health route, socket route)
 * 3. Bind the listener
 * 4. Serve until the shutdown signal fires, then close the store
 *
 * Everything is constructed here and passed down explicitly; there is no
 * process-wide store or hub.
 */

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::backend::error::BackendResult;
use crate::backend::notes::{NoteGateway, NoteStore};
use crate::backend::realtime::SyncHub;
use crate::backend::routes::create_router;
use crate::backend::server::config::load_store;
use crate::backend::server::state::AppState;
use crate::shared::ServerConfig;

/// Create the Axum application around an existing hub
pub fn create_app(hub: SyncHub) -> Router<()> {
    create_router(AppState::new(hub))
}

/// A bound, not yet serving, note server
#[derive(Debug)]
pub struct NoteServer {
    listener: TcpListener,
    app: Router<()>,
    hub: SyncHub,
    local_addr: SocketAddr,
}

impl NoteServer {
    /// Open the configured store and bind the listener
    pub async fn bind(config: ServerConfig) -> BackendResult<Self> {
        tracing::info!("Initializing note server");
        let store = load_store(&config).await?;
        Self::bind_with_store(&config, store).await
    }

    /// Bind the listener over an already opened store
    pub async fn bind_with_store(
        config: &ServerConfig,
        store: Arc<dyn NoteStore>,
    ) -> BackendResult<Self> {
        let hub = SyncHub::new(NoteGateway::new(store), config.broadcast_capacity);
        let app = create_app(hub.clone());

        let listener = match TcpListener::bind(config.bind_addr()).await {
            Ok(listener) => listener,
            Err(e) => {
                // the store was opened above; release it before bailing out
                hub.gateway().close().await;
                return Err(e.into());
            }
        };
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            app,
            hub,
            local_addr,
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The server's hub
    pub fn hub(&self) -> &SyncHub {
        &self.hub
    }

    /// Serve until `signal` resolves, then close the store
    pub async fn serve_with_shutdown<F>(self, signal: F) -> BackendResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Listening on port {}", self.local_addr.port());

        let served = axum::serve(self.listener, self.app)
            .with_graceful_shutdown(signal)
            .await;

        tracing::info!("Shutting down; closing note store");
        self.hub.gateway().close().await;
        served?;
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
}
