use bakery_buddy::{
    bot::{self, BotData},
    config::{
        catalog::load_config,
        database::{create_connection, create_tables},
        settings::AppSettings,
    },
    core::{catalog_cache::CatalogCache, seed::seed_catalog},
    errors::{Error, Result},
};
use std::{env, path::Path};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load .env file (non-fatal, env vars can be set externally)
    dotenvy::dotenv().ok();

    let settings = AppSettings::from_env()?;
    info!(
        "Starting BakeryBuddy (catalog cache TTL {}s)",
        settings.cache_ttl.as_secs()
    );

    let db = create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db).await?;
    info!("Database initialized successfully.");

    let catalog = CatalogCache::new(settings.cache_ttl);

    if Path::new(&settings.catalog_path).exists() {
        let config = load_config(&settings.catalog_path)?;
        let summary = seed_catalog(&db, &catalog, &config).await?;
        info!(
            "Catalog seeded: {} categories and {} ingredients created, {} skipped.",
            summary.categories_created, summary.ingredients_created, summary.skipped
        );
    } else {
        info!(
            "No catalog file at '{}'. Skipping seeding.",
            settings.catalog_path
        );
    }

    // DISCORD_BOT_TOKEN is read directly before use, not stored in AppSettings
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(&token, BotData::new(db, catalog)).await
}
