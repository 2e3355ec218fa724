//! Weather updater service.
//!
//! Refreshes weather data for every configured entry with:
//! - Independent conditions and forecast cadences
//! - Paced passes so providers and equipment are not flooded
//! - Numeric field writes to equipment points
//! - HTTP management API for entries and settings

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use weather_providers::ProviderRegistry;
use weather_updater::{
    AppState, ConfigStore, EntryCache, EquipmentWriter, FileEquipment, RefreshEngine, Scheduler,
};

#[derive(Parser, Debug)]
#[command(name = "weather-updater")]
#[command(about = "Scheduled weather refresh writing provider data to equipment")]
struct Args {
    /// Weather configuration (properties file)
    #[arg(long, env = "WEATHER_CONFIG", default_value = "config/weather.properties")]
    config_file: PathBuf,

    /// Equipment point document (JSON)
    #[arg(long, env = "EQUIPMENT_FILE", default_value = "config/equipment.json")]
    equipment_file: PathBuf,

    /// Port for the management API
    #[arg(long, env = "API_PORT", default_value = "8082")]
    port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Run one conditions and one forecast pass, then exit
    #[arg(long)]
    once: bool,

    /// Disable the management API
    #[arg(long)]
    no_api: bool,

    /// Seconds before the first scheduled pass
    #[arg(long, default_value = "60")]
    initial_delay_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting weather updater");

    let config = Arc::new(ConfigStore::open(&args.config_file).await?);
    let equipment = Arc::new(
        FileEquipment::open(&args.equipment_file)
            .await
            .with_context(|| format!("Failed to open {}", args.equipment_file.display()))?,
    );

    let engine = Arc::new(RefreshEngine::new(
        config.clone(),
        Arc::new(ProviderRegistry::new()),
        Arc::new(EntryCache::new()),
        EquipmentWriter::new(equipment),
    ));
    let scheduler = Arc::new(Scheduler::new(engine.clone()));

    let snapshot = config.snapshot().await;
    info!(
        service = %snapshot.service(),
        entries = snapshot.entries().len(),
        conditions_minutes = snapshot.conditions_refresh(),
        forecasts_minutes = snapshot.forecasts_refresh(),
        "Loaded configuration"
    );

    if args.once {
        info!("Running single refresh cycle");
        let conditions = scheduler.run_conditions_pass().await;
        let forecasts = scheduler.run_forecasts_pass().await;
        info!(
            conditions_refreshed = conditions.refreshed,
            conditions_failed = conditions.failed,
            forecasts_refreshed = forecasts.refreshed,
            forecasts_failed = forecasts.failed,
            "Refresh cycle complete"
        );
        return Ok(());
    }

    if !args.no_api {
        let state = Arc::new(AppState {
            engine: engine.clone(),
            scheduler: scheduler.clone(),
        });
        let port = args.port;
        tokio::spawn(async move {
            if let Err(e) = weather_updater::server::run_server(state, port).await {
                tracing::error!(error = %e, "Management API failed");
            }
        });
    }

    scheduler.start(
        Duration::from_secs(args.initial_delay_secs),
        snapshot.conditions_refresh(),
        snapshot.forecasts_refresh(),
    );

    // Handle Ctrl+C
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        shutdown_tx.send(()).ok();
    });

    shutdown_rx.recv().await.ok();
    scheduler.stop();

    info!("Weather updater stopped");
    Ok(())
}
