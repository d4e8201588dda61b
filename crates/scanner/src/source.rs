//! Candidate sourcing strategies.
//!
//! A scan starts from a bounded symbol universe. [`CandidateSource`] is the
//! seam between the engine and wherever that universe comes from: a
//! configured static list, or the upstream symbol directory via the
//! screening source. A sourcing failure yields an empty universe (and thus
//! an empty, well-formed scan result), never an error.

use std::sync::Arc;

use async_trait::async_trait;

use tickerscout_market_data::UpstreamProvider;

/// Supplies the symbol universe for a scan.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// The symbols to evaluate. Empty on sourcing failure.
    async fn candidates(&self) -> Vec<String>;
}

/// Liquid US symbols used as the default scan universe.
pub const DEFAULT_US_UNIVERSE: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "NFLX", "AMD", "INTC", "CRM", "ORCL",
    "ADBE", "PYPL", "UBER", "LYFT", "SNAP", "TWTR", "SQ", "ROKU", "ZM", "PTON", "DOCU", "SHOP",
];

/// Fixed, configured symbol universe.
pub struct StaticUniverse {
    symbols: Vec<String>,
}

impl StaticUniverse {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    /// The default active-US-symbols universe.
    pub fn default_us() -> Self {
        Self::new(DEFAULT_US_UNIVERSE.iter().map(|s| s.to_string()).collect())
    }
}

#[async_trait]
impl CandidateSource for StaticUniverse {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn candidates(&self) -> Vec<String> {
        self.symbols.clone()
    }
}

/// Universe drawn from the upstream symbol directory, bounded to keep the
/// per-scan upstream budget predictable.
pub struct ScreeningApiSource {
    provider: Arc<dyn UpstreamProvider>,
    exchange: String,
    max_candidates: usize,
}

impl ScreeningApiSource {
    pub fn new(provider: Arc<dyn UpstreamProvider>) -> Self {
        Self {
            provider,
            exchange: "US".to_string(),
            max_candidates: 100,
        }
    }

    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = exchange.into();
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }
}

#[async_trait]
impl CandidateSource for ScreeningApiSource {
    fn name(&self) -> &'static str {
        "screening_api"
    }

    async fn candidates(&self) -> Vec<String> {
        let mut symbols = self.provider.list_symbols(&self.exchange).await;
        symbols.truncate(self.max_candidates);
        symbols
    }
}
