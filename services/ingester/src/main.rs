//! Sighting ingester.
//!
//! Loads the upstream TSV export into the sighting store and regenerates
//! the species cache files read by the map service.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::Args;
use ingestion::{write_caches, Ingester};
use storage::{PgSightingStore, SightingStore, TABLE_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
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
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let options = args.ingest_options();
    info!(
        file = %args.data_file.display(),
        threshold = options.threshold,
        start_year = options.start_year,
        end_year = options.end_year,
        "Starting sighting ingester"
    );

    let ingester = Ingester::new(options)?;

    let mut store = PgSightingStore::connect(&args.database_url, 2)
        .await
        .context("Failed to connect to sighting store")?;

    if store.table_exists().await? {
        if args.recreate {
            warn!(table = TABLE_NAME, "Dropping existing table");
            store.drop_table().await?;
        } else {
            info!(table = TABLE_NAME, "Appending to existing table");
        }
    }
    store.migrate().await?;

    let result = ingester.ingest_file(&args.data_file, &mut store).await?;
    info!(
        rows = result.rows_written,
        batches = result.batches,
        skipped = result.stats.skipped(),
        "Inserted sightings"
    );

    let counts = store
        .species_counts()
        .await
        .context("Failed to query species counts")?;
    write_caches(&args.cache_dir, counts, &result.tally.proportions())?;

    info!(cache_dir = %args.cache_dir.display(), "Ingestion finished");
    Ok(())
}
