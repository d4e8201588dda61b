//! Upstream market data provider.
//!
//! [`UpstreamProvider`] is the seam between the cache facade and the outside
//! world: the facade only ever talks to this trait, which is what lets tests
//! substitute a counting mock and lets a different data vendor slot in
//! without touching the cache layer.
//!
//! Contract shared by every method: a rate-limited, timed-out, or otherwise
//! failed upstream call yields an empty/absent result, never an error. The
//! facade tolerates empty results; nothing in the request pipeline crashes
//! because the vendor had a bad minute.

mod finnhub;
mod pacer;

pub use finnhub::FinnhubClient;
pub use pacer::RequestPacer;

use async_trait::async_trait;

use crate::models::{
    CandleSeries, CompanyProfile, MarketStatus, NewsArticle, Quote, SymbolSearchResult,
};

/// One method per upstream data kind.
#[async_trait]
pub trait UpstreamProvider: Send + Sync {
    /// Real-time quote. `None` when the symbol is unknown or upstream failed.
    async fn quote(&self, symbol: &str) -> Option<Quote>;

    /// Company profile. `None` when absent or upstream failed.
    async fn profile(&self, symbol: &str) -> Option<CompanyProfile>;

    /// Historical candles. With `previous` set, the window ends at the prior
    /// business day (weekends skipped) instead of now.
    async fn candles(
        &self,
        symbol: &str,
        resolution: &str,
        days_back: u32,
        previous: bool,
    ) -> Option<CandleSeries>;

    /// Market-wide news for a category, paginated by `min_id`.
    async fn market_news(&self, category: &str, min_id: u64) -> Vec<NewsArticle>;

    /// Company-specific news over the trailing `days_back` days.
    async fn company_news(&self, symbol: &str, days_back: u32) -> Vec<NewsArticle>;

    /// Free-text symbol search.
    async fn search_symbols(&self, query: &str) -> Vec<SymbolSearchResult>;

    /// Open/closed state of an exchange.
    async fn market_status(&self, exchange: &str) -> Option<MarketStatus>;

    /// Symbol directory for an exchange. Feeds the screening-based scanner
    /// candidate source.
    async fn list_symbols(&self, exchange: &str) -> Vec<String>;
}
