//! imaged - generative image gateway daemon
//!
//! A thin HTTP gateway over the Gemini image generation API: one endpoint
//! turns a prompt into a cached image, a second serves the cached bytes back.

pub mod api;
pub mod gemini;
pub mod images;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use gemini::GeminiClient;
use images::ImageStore;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".parse().unwrap(),
        }
    }
}

/// The imaged server instance
pub struct Server {
    config: Config,
    state: api::AppState,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance
    ///
    /// The Gemini client reads `GEMINI_API_KEY` / `GEMINI_API_URL` from the
    /// environment. A missing key surfaces as a 500 on the first generation
    /// request, not at startup.
    pub fn new(config: Config) -> Self {
        let state = api::AppState {
            images: Arc::new(ImageStore::new()),
            gemini: Arc::new(GeminiClient::new()),
        };
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            state,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(self.state.clone())
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("imaged listening on {}", local_addr);

        if !self.state.gemini.is_configured() {
            tracing::warn!("GEMINI_API_KEY not set; /image requests will fail");
        }

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("imaged shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
