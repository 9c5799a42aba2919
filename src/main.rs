// sysdash - version 0.1.0
// Live system metrics dashboard with tracing logging
mod cli;
mod commands;
mod config;
mod handlers;
mod health_stats;
mod sampler;
mod state;
mod window;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{routing::get, Router};
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, Level};

use crate::cli::{Args, Commands, LogLevel};
use crate::commands::{command_check, command_config, command_test};
use crate::config::{resolve_config, show_config, validate_effective_config};
use crate::handlers::{health_handler, index_handler, stream_handler};
use crate::health_stats::HealthStats;
use crate::state::AppState;

/// Initializes tracing logging subsystem with configured log level
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR, // Off not fully supported, use ERROR as minimal
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {:?}", args.log_level);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {e}");
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, &args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        let config = resolve_config(&args)?;
        if let Err(e) = validate_effective_config(&config) {
            eprintln!("❌ Configuration invalid: {e}");
            std::process::exit(1);
        }

        return match command {
            Commands::Check { verbose } => command_check(*verbose, &config),
            Commands::Config { output, format } => command_config(output.clone(), format.clone()),
            Commands::Test {
                iterations,
                verbose,
            } => command_test(*iterations, *verbose),
        };
    }

    // Load configuration for server mode
    let config = resolve_config(&args)?;

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {e}");
        std::process::exit(1);
    }

    // Setup logging subsystem first to enable proper logging
    setup_logging(&args);

    info!("Starting sysdash");

    let state = Arc::new(AppState {
        config: Arc::new(config.clone()),
        health_stats: Arc::new(HealthStats::new()),
        started: Instant::now(),
    });

    // Setup graceful shutdown signal handlers
    let shutdown_signal = async {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    };

    // Configure HTTP server routes and start listening
    let addr: SocketAddr = format!("{}:{}", config.bind_addr(), config.http_port()).parse()?;

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/metrics-stream", get(stream_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    let listener = TcpListener::bind(addr).await?;
    info!(
        "sysdash listening on http://{}:{}",
        config.bind_addr(),
        config.http_port()
    );

    // Start HTTP server with graceful shutdown capability. Dropping the
    // server future drops every open metrics stream, which terminates each
    // connection's sampling loop.
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown_signal => {
            info!("Shutdown signal received, exiting...");
        }
    }

    info!("sysdash stopped gracefully");
    Ok(())
}
