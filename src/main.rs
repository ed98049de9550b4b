use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use fibonacci_service::config::loader::load_config;
use fibonacci_service::lifecycle::signals;
use fibonacci_service::observability::{logging, metrics};
use fibonacci_service::{HttpServer, ServiceConfig, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "fibonacci-service")]
#[command(about = "HTTP service computing Fibonacci numbers, with per-client rate limiting")]
struct Args {
    /// Path to a TOML configuration file. Built-in defaults apply when
    /// omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address (e.g. "0.0.0.0:5000").
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        rate_limiting = config.rate_limit.enabled,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Arc::new(Shutdown::new());
    tokio::spawn(signals::listen(shutdown.clone()));

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
