//! preload-push: static file server with HTTP/2 server push.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ listener (plain h2c / TLS h2)
//!                        │
//!                        ▼
//!                  request id → trace → timeout
//!                        │
//!                        ▼
//!                  advertise_push (PushCapability on HTTP/2)
//!                        │
//!                        ▼
//!                  push engine ── rule pushes ──▶ transport
//!                        │
//!                        ▼
//!                  static files (next stage)
//!                        │
//!                        ▼
//!                  push engine ── Link pushes ──▶ transport
//!                        │
//!     Client Response    ▼
//!     ◀──────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use preload_push::config::{load_config, ServerConfig};
use preload_push::lifecycle::{wait_for_signal, Shutdown};
use preload_push::net::tls::load_tls_config;
use preload_push::observability::{logging, metrics};
use preload_push::HttpServer;

#[derive(Parser)]
#[command(name = "preload-push")]
#[command(about = "Static file server with HTTP/2 server push", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    if cli.check {
        println!("configuration OK ({} push rules)", config.push.rules.len());
        return Ok(());
    }

    logging::init(&config.observability.log_level);
    tracing::info!("preload-push v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        root = %config.site.root.display(),
        push_enabled = config.push.enabled,
        rules = config.push.rules.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    let addr: SocketAddr = config.listener.bind_address.parse()?;
    let tls = config.listener.tls.clone();
    let server = HttpServer::new(config)?;

    match tls {
        Some(tls) => {
            let rustls = load_tls_config(&tls).await?;
            server.run_tls(addr, rustls, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(addr).await?;
            server.run(listener, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
