//! invtrack-server - Inventory tracker HTTP service
//!
//! Startup sequence:
//! 1. Resolve configuration (CLI > environment > TOML > defaults)
//! 2. Open or create the database
//! 3. Bootstrap: migrate legacy rows into empty tables, seed locations
//! 4. Serve the JSON API

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use invtrack_common::bootstrap::load_initial_data;
use invtrack_common::config::{ConfigOverrides, InventoryConfig};
use invtrack_common::db::init::init_database;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invtrack_server::{build_router, AppState};

/// Command-line arguments for invtrack-server
#[derive(Parser, Debug)]
#[command(name = "invtrack-server")]
#[command(about = "Inventory tracker: item templates, inventory items and locations")]
#[command(version)]
struct Args {
    /// TOML config file (default: ~/.config/invtrack/config.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Address to bind the HTTP listener to
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Table holding pre-normalization inventory rows
    #[arg(long)]
    legacy_table: Option<String>,

    /// Skip migrating legacy rows at startup
    #[arg(long)]
    no_migrate: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            database_path: self.database.clone(),
            legacy_table: self.legacy_table.clone(),
            bind_address: self.bind.clone(),
            port: self.port,
            migrate_legacy: self.no_migrate.then_some(false),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "invtrack_server=info,invtrack_common=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting invtrack-server v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = InventoryConfig::resolve(&args.overrides())
        .context("Failed to resolve configuration")?;

    info!("Database path: {}", config.database_path.display());

    let pool = match init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Database initialized successfully");
            pool
        }
        Err(e) => {
            error!("✗ Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let report = load_initial_data(&pool, &config)
        .await
        .context("Failed to load initial data")?;
    if report.migration_ran {
        info!(
            "✓ Loaded {} templates and {} inventory items from legacy data",
            report.templates_created, report.items_created
        );
    }

    let state = AppState::new(pool);
    let app = build_router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("invtrack-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
