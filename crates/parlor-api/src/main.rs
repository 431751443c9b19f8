//! Parlor REST API entry point.
//!
//! Binary name: `parlor`
//!
//! Parses CLI arguments, loads configuration from the environment,
//! initializes the database and services, then starts the HTTP server.

mod http;
mod state;

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[derive(Parser)]
#[command(name = "parlor", version, about = "Customer support chat backend")]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (overrides the PORT environment variable)
    #[arg(long)]
    port: Option<u16>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,parlor=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config = parlor_infra::config::load_config();
    let port = cli.port.unwrap_or(config.port);

    let state = AppState::init(config).await?;

    let addr = format!("{}:{}", cli.host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, env = ?state.config.env, "parlor API listening");

    let router = http::router::build_router(state);

    // ConnectInfo is required by the rate limiter to key on client IP.
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
