//! Tickerscout Market Data Crate
//!
//! Cached, rate-limited market data layer for the Tickerscout backend.
//! Route handlers call [`MarketDataService`]; everything behind it is an
//! implementation detail of this crate.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   Route layer    |  (excluded: web framework glue)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! | MarketDataService| --> |    CacheStore    |  (redis, or in-process fallback)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! | UpstreamProvider |  (FinnhubClient, paced + token-authenticated)
//! +------------------+
//! ```
//!
//! The facade checks the cache before every upstream call, caches only
//! non-empty results, and never lets a cache or upstream failure escape as
//! an error: the one exception is invalid caller input (an unsupported
//! candle resolution), which is rejected explicitly.
//!
//! # Core Types
//!
//! - [`MarketDataService`] - cache-or-fetch facade
//! - [`CacheStore`] - TTL store with backend degradation
//! - [`TtlPolicy`] / [`CacheDomain`] - per-domain expiry table
//! - [`UpstreamProvider`] - upstream seam, implemented by [`FinnhubClient`]
//! - [`Quote`], [`CompanyProfile`], [`CandleSeries`], [`NewsArticle`],
//!   [`SymbolSearchResult`], [`MarketStatus`] - domain models

pub mod cache;
pub mod config;
pub mod errors;
pub mod models;
pub mod provider;

mod service;


// Re-export the primary surface
pub use cache::{CacheDomain, CacheStats, CacheStore, MemoryBackend, RedisBackend, TtlPolicy};
pub use config::MarketDataConfig;
pub use errors::MarketDataError;
pub use models::{
    is_valid_resolution, CandleSeries, CompanyProfile, MarketStatus, NewsArticle, Quote,
    SymbolSearchResult, VALID_RESOLUTIONS,
};
pub use provider::{FinnhubClient, RequestPacer, UpstreamProvider};
pub use service::MarketDataService;
