use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod aggregator;
mod cache;
mod config;
mod dashboard;
mod engine;
mod environment;
mod models;
mod refdata;
mod stats;

use aggregator::PredictionDeps;
use cache::TtlCache;
use config::Config;
use dashboard::AppState;
use engine::{FormSource, SeededForm, ThreadRngForm};
use environment::SampleWeather;
use stats::MlbStatsClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    info!(
        "Starting with '{:?}' as the default strategy (schedule TTL {}s, cache capacity {})",
        config.strategy, config.schedule_ttl_secs, config.cache_capacity
    );

    let stats = MlbStatsClient::new(
        &config.mlb_api_url,
        Duration::from_secs(config.http_timeout_secs),
    )?;
    info!("Stats source: {}", config.mlb_api_url);

    let form: Arc<dyn FormSource> = match config.form_seed {
        Some(seed) => {
            info!("Recent-form draw seeded with {}", seed);
            Arc::new(SeededForm::new(seed))
        }
        None => Arc::new(ThreadRngForm),
    };

    let deps = Arc::new(PredictionDeps {
        stats: Arc::new(stats),
        weather: Arc::new(SampleWeather),
        form,
        schedule_cache: TtlCache::new(
            Duration::from_secs(config.schedule_ttl_secs),
            config.cache_capacity,
        ),
        era_cache: TtlCache::new(
            Duration::from_secs(config.stats_ttl_secs),
            config.cache_capacity,
        ),
        team_cache: TtlCache::new(
            Duration::from_secs(config.stats_ttl_secs),
            config.cache_capacity,
        ),
    });

    let app = dashboard::router(AppState {
        deps,
        default_strategy: config.strategy,
    });

    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
