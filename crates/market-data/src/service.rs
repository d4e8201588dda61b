//! Market data facade: cache-or-fetch orchestration.
//!
//! Every operation follows the same shape: derive the cache key, return a
//! hit immediately, otherwise ask the upstream provider, and cache only
//! non-empty results (upstream failures are usually transient, so a negative
//! result is never pinned into the cache). Expired entries are treated as
//! misses; a failed refetch returns empty rather than serving stale data.
//!
//! The facade is constructed explicitly and passed to its consumers — there
//! is no process-wide instance.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::{key, CacheDomain, CacheStats, CacheStore, TtlPolicy};
use crate::config::MarketDataConfig;
use crate::errors::MarketDataError;
use crate::models::{
    is_valid_resolution, CandleSeries, CompanyProfile, MarketStatus, NewsArticle, Quote,
    SymbolSearchResult,
};
use crate::provider::{FinnhubClient, UpstreamProvider};

/// Uppercase, whitespace-trimmed form used for keys and upstream calls.
fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Cached market data service.
pub struct MarketDataService {
    cache: Arc<CacheStore>,
    provider: Arc<dyn UpstreamProvider>,
    ttl: TtlPolicy,
}

impl MarketDataService {
    /// Build a service over an explicit cache store and provider.
    pub fn new(cache: Arc<CacheStore>, provider: Arc<dyn UpstreamProvider>, ttl: TtlPolicy) -> Self {
        Self {
            cache,
            provider,
            ttl,
        }
    }

    /// Build a service from configuration: Finnhub upstream plus a cache
    /// store over the configured backend (in-process when no connection
    /// string is present or the connection fails).
    pub async fn from_config(config: MarketDataConfig) -> Self {
        let cache = Arc::new(CacheStore::from_redis_url(config.redis_url.as_deref()).await);
        let provider = Arc::new(FinnhubClient::from_config(&config));
        Self::new(cache, provider, config.ttl)
    }

    /// The underlying cache store, shared with sibling services.
    pub fn cache(&self) -> Arc<CacheStore> {
        self.cache.clone()
    }

    /// Real-time quote, cache-first.
    pub async fn get_quote(&self, symbol: &str) -> Option<Quote> {
        let symbol = normalize_symbol(symbol);
        let cache_key = key::quote(&symbol);

        if let Some(quote) = self.cache.get_value::<Quote>(&cache_key).await {
            return Some(quote);
        }

        let quote = self.provider.quote(&symbol).await?;
        self.cache
            .set_value(&cache_key, &quote, self.ttl.ttl_for(CacheDomain::Quote))
            .await;
        Some(quote)
    }

    /// Company profile, cache-first.
    pub async fn get_profile(&self, symbol: &str) -> Option<CompanyProfile> {
        let symbol = normalize_symbol(symbol);
        let cache_key = key::profile(&symbol);

        if let Some(profile) = self.cache.get_value::<CompanyProfile>(&cache_key).await {
            return Some(profile);
        }

        let profile = self.provider.profile(&symbol).await?;
        self.cache
            .set_value(
                &cache_key,
                &profile,
                self.ttl.ttl_for(CacheDomain::Profile),
            )
            .await;
        Some(profile)
    }

    /// Historical candles, cache-first.
    ///
    /// The only operation that rejects caller input: an unsupported
    /// resolution is an error, not a silent empty result.
    pub async fn get_candles(
        &self,
        symbol: &str,
        resolution: &str,
        days_back: u32,
        previous: bool,
    ) -> Result<Option<CandleSeries>, MarketDataError> {
        if !is_valid_resolution(resolution) {
            return Err(MarketDataError::InvalidResolution(resolution.to_string()));
        }

        let symbol = normalize_symbol(symbol);
        let cache_key = key::candles(&symbol, resolution, days_back, previous);

        if let Some(candles) = self.cache.get_value::<CandleSeries>(&cache_key).await {
            return Ok(Some(candles));
        }

        let Some(candles) = self
            .provider
            .candles(&symbol, resolution, days_back, previous)
            .await
        else {
            return Ok(None);
        };

        self.cache
            .set_value(
                &cache_key,
                &candles,
                self.ttl.ttl_for(CacheDomain::Candles),
            )
            .await;
        Ok(Some(candles))
    }

    /// Market-wide news for a category.
    pub async fn get_market_news(&self, category: &str, min_id: u64) -> Vec<NewsArticle> {
        let category = category.trim().to_lowercase();
        let cache_key = key::market_news(&category, min_id);

        if let Some(news) = self.cache.get_value::<Vec<NewsArticle>>(&cache_key).await {
            return news;
        }

        let news = self.provider.market_news(&category, min_id).await;
        if !news.is_empty() {
            self.cache
                .set_value(
                    &cache_key,
                    &news,
                    self.ttl.ttl_for(CacheDomain::MarketNews),
                )
                .await;
        }
        news
    }

    /// Company-specific news over the trailing `days_back` days.
    pub async fn get_company_news(&self, symbol: &str, days_back: u32) -> Vec<NewsArticle> {
        let symbol = normalize_symbol(symbol);
        let cache_key = key::company_news(&symbol, days_back);

        if let Some(news) = self.cache.get_value::<Vec<NewsArticle>>(&cache_key).await {
            return news;
        }

        let news = self.provider.company_news(&symbol, days_back).await;
        if !news.is_empty() {
            self.cache
                .set_value(
                    &cache_key,
                    &news,
                    self.ttl.ttl_for(CacheDomain::CompanyNews),
                )
                .await;
        }
        news
    }

    /// Free-text symbol search. The query is hashed into the cache key, so
    /// case variants of the same query share one entry.
    pub async fn search_symbols(&self, query: &str) -> Vec<SymbolSearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let cache_key = key::search(query);

        if let Some(results) = self
            .cache
            .get_value::<Vec<SymbolSearchResult>>(&cache_key)
            .await
        {
            return results;
        }

        let results = self.provider.search_symbols(query).await;
        if !results.is_empty() {
            self.cache
                .set_value(
                    &cache_key,
                    &results,
                    self.ttl.ttl_for(CacheDomain::Search),
                )
                .await;
        }
        results
    }

    /// Open/closed state of an exchange.
    pub async fn get_market_status(&self, exchange: &str) -> Option<MarketStatus> {
        let exchange = exchange.trim().to_uppercase();
        let cache_key = key::market_status(&exchange);

        if let Some(status) = self.cache.get_value::<MarketStatus>(&cache_key).await {
            return Some(status);
        }

        let status = self.provider.market_status(&exchange).await?;
        self.cache
            .set_value(
                &cache_key,
                &status,
                self.ttl.ttl_for(CacheDomain::MarketStatus),
            )
            .await;
        Some(status)
    }

    /// Quotes for a set of symbols, minimizing upstream calls.
    ///
    /// Checks the batch-level entry first, then each symbol's individual
    /// quote entry, and only asks the upstream for the residue. Fetched
    /// singles are cached under their own keys as well as inside the
    /// assembled batch, so batch and single callers feed each other's hits.
    pub async fn get_batch_quotes(&self, symbols: &[String]) -> HashMap<String, Quote> {
        let mut symbols: Vec<String> = symbols.iter().map(|s| normalize_symbol(s)).collect();
        symbols.sort_unstable();
        symbols.dedup();
        if symbols.is_empty() {
            return HashMap::new();
        }

        let batch_key = key::batch_quotes(&symbols);
        if let Some(batch) = self
            .cache
            .get_value::<HashMap<String, Quote>>(&batch_key)
            .await
        {
            return batch;
        }

        let quote_ttl = self.ttl.ttl_for(CacheDomain::Quote);
        let mut assembled = HashMap::new();
        let mut missing = Vec::new();

        for symbol in &symbols {
            match self.cache.get_value::<Quote>(&key::quote(symbol)).await {
                Some(quote) => {
                    assembled.insert(symbol.clone(), quote);
                }
                None => missing.push(symbol.clone()),
            }
        }

        debug!(
            "batch quotes: {} cached, {} to fetch",
            assembled.len(),
            missing.len()
        );

        for symbol in missing {
            if let Some(quote) = self.provider.quote(&symbol).await {
                self.cache
                    .set_value(&key::quote(&symbol), &quote, quote_ttl)
                    .await;
                assembled.insert(symbol, quote);
            }
        }

        if !assembled.is_empty() {
            self.cache
                .set_value(
                    &batch_key,
                    &assembled,
                    self.ttl.ttl_for(CacheDomain::BatchQuotes),
                )
                .await;
        }

        assembled
    }

    /// Cached scanner results for a `(scanner type, limit)` pair.
    pub async fn get_scanner_results<T: DeserializeOwned>(
        &self,
        scanner_type: &str,
        limit: usize,
    ) -> Option<Vec<T>> {
        self.cache
            .get_value(&key::scanner_results(scanner_type, limit))
            .await
    }

    /// Store a ranked scanner result list for a `(scanner type, limit)` pair.
    pub async fn cache_scanner_results<T: Serialize>(
        &self,
        scanner_type: &str,
        limit: usize,
        results: &[T],
    ) -> bool {
        self.cache
            .set_value(
                &key::scanner_results(scanner_type, limit),
                &results,
                self.ttl.ttl_for(CacheDomain::Scanner),
            )
            .await
    }

    /// Remove every cached entry for one symbol, across all domains.
    pub async fn clear_symbol_cache(&self, symbol: &str) -> usize {
        let symbol = normalize_symbol(symbol);
        self.cache
            .clear_pattern(&key::symbol_pattern(&symbol))
            .await
    }

    /// Cache statistics for the ops surface.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}
