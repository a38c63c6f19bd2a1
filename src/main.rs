use anyhow::Result;
use clap::Parser;
use screenshot_server::{
    build_router, install_prometheus_exporter, Config, FallbackStrategy, Metrics,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

#[derive(Parser)]
#[command(name = "screenshot-server")]
#[command(about = "HTTP screenshot service backed by headless Chrome")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Configuration file path (JSON)")]
    config: Option<PathBuf>,

    #[arg(long, env = "PORT", help = "Port to listen on")]
    port: Option<u16>,

    #[arg(long, help = "Address to bind")]
    host: Option<String>,

    #[arg(long, help = "Navigation timeout in seconds")]
    timeout: Option<u64>,

    #[arg(long, help = "Maximum concurrent requests")]
    max_concurrent: Option<usize>,

    #[arg(long, help = "Chrome executable path")]
    chrome_path: Option<String>,

    #[arg(
        long,
        help = "Serve static files from this directory for unmatched routes (SPA fallback to its index.html)"
    )]
    static_dir: Option<PathBuf>,

    #[arg(long, help = "Prometheus exporter listen address")]
    metrics_addr: Option<SocketAddr>,

    #[arg(long, help = "Enable verbose logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    setup_logging(args.verbose)?;

    info!("Starting screenshot-server v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args).await?;
    validate_config(&config)?;

    if let Some(addr) = config.metrics_addr {
        install_prometheus_exporter(addr)?;
    }

    let config = Arc::new(config);
    let metrics = Arc::new(Metrics::new());
    let app = build_router(Arc::clone(&config), metrics);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = bind_listener(&addr).await?;

    info!("Server is running on port {}", config.port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("screenshot-server stopped");
    Ok(())
}

async fn load_config(args: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        let config_content = tokio::fs::read_to_string(config_path).await?;
        serde_json::from_str(&config_content)?
    } else {
        Config::default()
    };

    // Override with CLI arguments
    if let Some(port) = args.port {
        config.port = port;
    }

    if let Some(host) = &args.host {
        config.host = host.clone();
    }

    if let Some(timeout) = args.timeout {
        config.navigation_timeout = Duration::from_secs(timeout);
    }

    if let Some(max_concurrent) = args.max_concurrent {
        config.max_concurrent_requests = max_concurrent;
    }

    if let Some(chrome_path) = &args.chrome_path {
        config.chrome_path = Some(chrome_path.clone());
    }

    if let Some(dir) = &args.static_dir {
        config.fallback = FallbackStrategy::StaticDir { dir: dir.clone() };
    }

    if let Some(addr) = args.metrics_addr {
        config.metrics_addr = Some(addr);
    }

    info!("Configuration loaded successfully");
    info!("Navigation timeout: {:?}", config.navigation_timeout);
    info!(
        "Max concurrent requests: {}",
        config.max_concurrent_requests
    );

    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.max_concurrent_requests == 0 {
        anyhow::bail!("Max concurrent requests must be greater than 0");
    }

    if config.navigation_timeout.is_zero() {
        anyhow::bail!("Navigation timeout must be greater than 0");
    }

    if config.request_timeout < config.navigation_timeout {
        anyhow::bail!("Request timeout must not be shorter than the navigation timeout");
    }

    if config.viewport.width == 0 || config.viewport.height == 0 {
        anyhow::bail!("Viewport dimensions must be greater than 0");
    }

    if let FallbackStrategy::StaticDir { dir } = &config.fallback {
        if !dir.is_dir() {
            anyhow::bail!("Static directory {} does not exist", dir.display());
        }
    }

    Ok(())
}

async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            tracing::error!("Port is already in use on {addr}");
        }
        anyhow::anyhow!("Failed to bind server on {addr}: {e}")
    })
}

async fn shutdown_signal() {
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
        .expect("Failed to create SIGINT handler");
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("Failed to create SIGTERM handler");

    tokio::select! {
        _ = sigint.recv() => {
            info!("Received SIGINT");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM");
        }
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    Ok(())
}
