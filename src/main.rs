//! imaged - generative image gateway daemon

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use imaged::{Config, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "imaged", about = "Generative image gateway daemon")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:5000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imaged=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config {
        bind_addr: args.bind,
    };

    // Create and run server
    let server = Server::new(config);
    server.run().await?;

    Ok(())
}
