use crate::app::App;
use crate::config::Config;
use crate::persistence::{PgPriceRepository, PgSessionFactory};
use crate::scraper::CoinbaseScraper;
use diesel_migrations::{EmbeddedMigrations, embed_migrations};
use log::{debug, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

mod app;
mod config;
mod data;
mod persistence;
mod schema;
mod scraper;
mod transform;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    info!("Starting the spot price ETL...");

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(std::path::Path::new(&config_path))?;
    debug!("Loaded config: {config:?}");

    let scraper = CoinbaseScraper::new(config.spot_price_url.clone());
    let sessions = Arc::new(PgSessionFactory::new(config.database.url()));
    let repository = Arc::new(PgPriceRepository::new(sessions));

    let cancellation_token = CancellationToken::new();
    let shutdown = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, stopping...");
            shutdown.cancel();
        }
        // A database call stuck on the blocking pool holds the runtime open.
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Second Ctrl+C received, exiting immediately");
            std::process::exit(130);
        }
    });

    let mut app = App::new(config, scraper, repository);
    app.run(cancellation_token).await?;

    Ok(())
}
