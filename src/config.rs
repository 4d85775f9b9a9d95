use clap::Parser;

use crate::engine::StrategyKind;

/// MLB early-innings run prediction dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "earlyinnings", version, about)]
pub struct Config {
    /// Dashboard listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// MLB Stats API base URL
    #[arg(
        long,
        env = "MLB_API_URL",
        default_value = "https://statsapi.mlb.com/api/v1"
    )]
    pub mlb_api_url: String,

    /// Schedule cache revalidation interval in seconds
    #[arg(long, env = "SCHEDULE_TTL_SECS", default_value = "900")]
    pub schedule_ttl_secs: u64,

    /// Resolved stat cache TTL in seconds
    #[arg(long, env = "STATS_TTL_SECS", default_value = "900")]
    pub stats_ttl_secs: u64,

    /// Maximum entries per cache before oldest-first eviction
    #[arg(long, env = "CACHE_CAPACITY", default_value = "512")]
    pub cache_capacity: usize,

    /// Default scoring strategy served when the request does not pick one
    #[arg(long, env = "STRATEGY", value_enum, default_value = "weighted")]
    pub strategy: StrategyKind,

    /// Upstream HTTP request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
    pub http_timeout_secs: u64,

    /// Fixed seed for the recent-form draw; omit for a fresh draw per request
    #[arg(long, env = "FORM_SEED")]
    pub form_seed: Option<u64>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!("listen_addr '{}' is not a valid socket address", self.listen_addr);
        }
        if self.schedule_ttl_secs == 0 || self.stats_ttl_secs == 0 {
            anyhow::bail!("cache TTLs must be positive");
        }
        if self.cache_capacity == 0 {
            anyhow::bail!("cache_capacity must be positive");
        }
        if !(1..=120).contains(&self.http_timeout_secs) {
            anyhow::bail!("http_timeout_secs must be between 1 and 120");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            listen_addr: "0.0.0.0:8080".into(),
            mlb_api_url: "https://statsapi.mlb.com/api/v1".into(),
            schedule_ttl_secs: 900,
            stats_ttl_secs: 900,
            cache_capacity: 512,
            strategy: StrategyKind::Weighted,
            http_timeout_secs: 10,
            form_seed: None,
        }
    }

    #[test]
    fn defaults_validate() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn bad_listen_addr_is_rejected() {
        let mut config = base_config();
        config.listen_addr = "not-an-addr".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut config = base_config();
        config.schedule_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn timeout_bounds_are_enforced() {
        let mut config = base_config();
        config.http_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.http_timeout_secs = 600;
        assert!(config.validate().is_err());
    }
}
