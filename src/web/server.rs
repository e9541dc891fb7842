//! Web server for LearnSync.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::chat::ChatHub;
use crate::config::Config;
use crate::{LearnSyncError, Result};

use super::router::create_router;

/// HTTP + WebSocket server for the chat room.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Router built from the web configuration.
    router: Router,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, hub: Arc<ChatHub>) -> Result<Self> {
        let addr = config.server.socket_addr()?;
        let router = create_router(hub, &config.web);
        Ok(Self { addr, router })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let listener = bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Chat server listening on http://{}", local_addr);

        serve(listener, self.router).await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let listener = bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Chat server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = serve(listener, self.router).await {
                tracing::error!("{}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| LearnSyncError::Server(format!("failed to bind {addr}: {e}")))
}

async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    axum::serve(listener, router)
        .await
        .map_err(|e| LearnSyncError::Server(e.to_string()))
}
