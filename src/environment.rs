//! Environment resolution: ballpark run factors and game-time weather.
//!
//! The ballpark factor is a pure table lookup. Weather is behind a provider
//! trait so a live source can be wired in later; until then every venue gets
//! the same sample reading.

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::models::WeatherReading;
use crate::refdata;

/// Run-scoring factor for a venue, with the neutral default on no match.
pub fn resolve_ballpark_factor(venue_name: &str) -> f64 {
    refdata::ballpark_factor(venue_name).unwrap_or(refdata::DEFAULT_BALLPARK_FACTOR)
}

/// Combined scoring multiplier for a weather reading: the condition
/// multiplier scaled by the temperature band multiplier.
pub fn weather_impact(weather: &WeatherReading) -> f64 {
    let condition = refdata::weather_condition_impact(&weather.condition)
        .unwrap_or(refdata::DEFAULT_WEATHER_IMPACT);
    condition * refdata::temperature_impact(weather.temperature)
}

/// Weather source for a venue. Implementations must be infallible in spirit:
/// the caller degrades to the sample reading on error.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, venue: &str) -> Result<WeatherReading>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Stub provider returning a fixed sample reading for every venue.
pub struct SampleWeather;

#[async_trait]
impl WeatherProvider for SampleWeather {
    async fn current(&self, _venue: &str) -> Result<WeatherReading> {
        Ok(WeatherReading::sample())
    }

    fn name(&self) -> &str {
        "Sample Weather"
    }
}

/// Fetch weather for a venue, degrading to the sample reading on failure.
pub async fn resolve_weather(provider: &dyn WeatherProvider, venue: &str) -> WeatherReading {
    match provider.current(venue).await {
        Ok(reading) => reading,
        Err(e) => {
            warn!("Weather provider '{}' failed for {}: {}", provider.name(), venue, e);
            WeatherReading::sample()
        }
    }
}
