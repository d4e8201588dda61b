//! Configuration surface consumed by the market data layer.
//!
//! Everything is an explicit, constructed value: there is no process-wide
//! singleton. `from_env` exists for deployments that configure through the
//! environment, but tests and embedders build the struct directly.

use std::env;
use std::time::Duration;

use crate::cache::TtlPolicy;
use crate::errors::MarketDataError;

/// Default upstream API root.
pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Default minimum delay between upstream requests.
pub const DEFAULT_MIN_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Configuration for the market data service.
#[derive(Clone, Debug)]
pub struct MarketDataConfig {
    /// Upstream API credential, injected into every request.
    pub api_key: String,

    /// Upstream API root URL.
    pub base_url: String,

    /// Cache backend connection string. `None` selects the in-process
    /// fallback backend.
    pub redis_url: Option<String>,

    /// Minimum delay between consecutive upstream requests.
    pub min_request_delay: Duration,

    /// Per-domain TTL policy, including any overrides.
    pub ttl: TtlPolicy,
}

impl MarketDataConfig {
    /// Build a config with defaults for everything but the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            redis_url: None,
            min_request_delay: DEFAULT_MIN_REQUEST_DELAY,
            ttl: TtlPolicy::new(),
        }
    }

    /// Read configuration from the environment.
    ///
    /// `FINNHUB_API_KEY` is required. `FINNHUB_BASE_URL`, `REDIS_URL`, and
    /// `UPSTREAM_MIN_DELAY_MS` are optional, as are the per-domain
    /// `TTL_*_SECS` overrides (see [`TtlPolicy::from_env`]).
    pub fn from_env() -> Result<Self, MarketDataError> {
        let api_key = env::var("FINNHUB_API_KEY").map_err(|_| MarketDataError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var("FINNHUB_BASE_URL") {
            config.base_url = base_url;
        }
        config.redis_url = env::var("REDIS_URL").ok();
        if let Some(ms) = env::var("UPSTREAM_MIN_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.min_request_delay = Duration::from_millis(ms);
        }
        config.ttl = TtlPolicy::from_env();

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_redis_url(mut self, redis_url: impl Into<String>) -> Self {
        self.redis_url = Some(redis_url.into());
        self
    }

    pub fn with_min_request_delay(mut self, delay: Duration) -> Self {
        self.min_request_delay = delay;
        self
    }

    pub fn with_ttl_policy(mut self, ttl: TtlPolicy) -> Self {
        self.ttl = ttl;
        self
    }
}
