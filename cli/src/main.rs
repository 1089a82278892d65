//! B2BSteel - CLI Server
//!
//! Headless marketplace backend suitable for deployment as a systemd
//! service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/b2bsteel/config.toml)
//! b2bsteel-service
//!
//! # Custom config path
//! b2bsteel-service --config /etc/b2bsteel/config.toml
//!
//! # Override the port
//! b2bsteel-service --api-port 9090
//!
//! # Validate config without starting
//! b2bsteel-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use b2bsteel::config::AppConfig;
use b2bsteel::server::{init_tracing, ServerHandle, ServerOptions};

/// B2BSteel - concrete formwork and steel structure request marketplace.
#[derive(Parser, Debug)]
#[command(
    name = "b2bsteel-service",
    version,
    about = "Marketplace backend for construction material requests",
    long_about = "B2BSteel - REST API server for submitting concrete formwork and \
                  steel structure requests and triaging them as an administrator.\n\n\
                  Default config: ~/.config/b2bsteel/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "B2BSTEEL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the bootstrap admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(b2bsteel::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            if cli.check {
                eprintln!("Invalid configuration: {}", e);
                std::process::exit(1);
            }
            // Fallback tracing init
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            let mut config = AppConfig::default();
            if let Some(port) = cli.api_port {
                config.server.api_port = port;
            }
            return run(cli, config).await;
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        if config.database.in_memory {
            println!("   Database    : in-memory");
        } else {
            println!("   Database    : {}", config.database.connection_url());
        }
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    run(cli, config).await
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    // Wait for shutdown signal, then clean up
    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
