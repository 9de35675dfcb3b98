// Trip journal - storage smoke entry point
// Opens the configured store, seeds it on first run and logs what it holds.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripjournal::config::AppConfig;
use tripjournal::services::CategoryFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripjournal=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting trip journal");

    let config = AppConfig::from_env().context("invalid configuration")?;
    let state = tripjournal::setup(config)
        .await
        .context("failed to initialize storage")?;

    state
        .trips
        .initialize()
        .await
        .context("failed to seed sample trips")?;

    for summary in state.trips.list_summaries().await? {
        tracing::info!(
            "{} {} ({}): {} days, {} photos, {} notes",
            summary.emoji,
            summary.destination,
            summary.date,
            summary.days,
            summary.photo_count,
            summary.note_count
        );
    }

    let year = chrono::Local::now().format("%Y").to_string();
    let gallery = state.gallery.load(CategoryFilter::All, &year).await?;
    tracing::info!(
        "Gallery: {} photos from {} trips, {} from {}",
        gallery.stats.total,
        gallery.stats.distinct_trips,
        gallery.stats.recent_count,
        year
    );

    Ok(())
}
