//! HeartSpace application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Install the tracing subscriber
//! 3. Open the SQLite database and media directory
//! 4. Start the housekeeping loop (idle chats, expired tokens)
//! 5. Serve the axum REST API until Ctrl-C

mod cli;

use std::time::Duration;

use clap::Parser;

use heartspace_api::routes;
use heartspace_api::state::AppState;
use heartspace_core::config::HeartspaceConfig;
use heartspace_storage::Database;

use cli::CliArgs;

/// How often idle HeartBot sessions and expired tokens are swept.
const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(5 * 60);

async fn housekeeping_loop(state: AppState) {
    let mut interval = tokio::time::interval(HOUSEKEEPING_INTERVAL);
    // The first tick fires immediately; nothing has expired yet.
    interval.tick().await;

    loop {
        interval.tick().await;

        match state.heartbot.purge_expired() {
            Ok(purged) => tracing::debug!(purged, "HeartBot sessions swept"),
            Err(e) => tracing::warn!(error = %e, "HeartBot session sweep failed"),
        }
        if let Err(e) = state.accounts.purge_expired_tokens() {
            tracing::warn!(error = %e, "Token sweep failed");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = if config_file.exists() {
        HeartspaceConfig::load(&config_file)?
    } else {
        HeartspaceConfig::default()
    };
    config.general.port = args.resolve_port(config.general.port);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }
    if args.no_heartbot {
        config.heartbot.enabled = false;
    }

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting HeartSpace v{}", env!("CARGO_PKG_VERSION"));
    if config_file.exists() {
        tracing::info!(path = %config_file.display(), "Configuration loaded");
    } else {
        tracing::info!(path = %config_file.display(), "No configuration file, using defaults");
    }

    // Storage.
    let data_dir = config.general.resolved_data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join("heartspace.db");
    let db = Database::new(&db_path)?;
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    let media_dir = data_dir.join(&config.media.dir_name);
    std::fs::create_dir_all(&media_dir)?;
    tracing::info!(path = %media_dir.display(), "Media directory ready");

    let state = AppState::new(config.clone(), db, media_dir);
    tracing::info!(
        enabled = config.heartbot.enabled,
        timeout_minutes = config.heartbot.session_timeout_minutes,
        "HeartBot ready"
    );

    // === Background tasks ===
    tokio::spawn(housekeeping_loop(state.clone()));

    // === API server ===
    routes::start_server(&config, state, shutdown_signal()).await?;

    tracing::info!("HeartSpace stopped");
    Ok(())
}
