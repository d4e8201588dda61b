//! Cache key derivation.
//!
//! Keys follow the convention `market:{domain}:{identifier}[:{params}]`
//! where params are `name:value` pairs sorted by name and joined with `_`.
//! Two logically identical requests therefore always collide on one entry,
//! regardless of the order their arguments were supplied in.
//!
//! High-cardinality inputs (free-text queries, arbitrary symbol lists,
//! parameter blobs) are reduced to an 8-character content hash so the key
//! space stays bounded, while the `market:{domain}` prefix stays readable
//! for glob-based invalidation.

use crate::cache::ttl::CacheDomain;

/// 8-hex-char content hash of an arbitrary string.
pub fn short_hash(input: &str) -> String {
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)[..8].to_string()
}

/// Build a cache key from domain, identifier, and named parameters.
///
/// Parameters are sorted by name before joining, so call sites never need
/// to agree on an argument order.
pub fn build(domain: CacheDomain, identifier: &str, params: &[(&str, String)]) -> String {
    let mut key = format!("market:{}:{}", domain.prefix(), identifier);

    if !params.is_empty() {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by_key(|(name, _)| *name);
        let param_str = sorted
            .iter()
            .map(|(name, value)| format!("{}:{}", name, value))
            .collect::<Vec<_>>()
            .join("_");
        key.push(':');
        key.push_str(&param_str);
    }

    key
}

/// Key for a single-symbol quote.
pub fn quote(symbol: &str) -> String {
    build(CacheDomain::Quote, symbol, &[])
}

/// Key for a company profile.
pub fn profile(symbol: &str) -> String {
    build(CacheDomain::Profile, symbol, &[])
}

/// Key for a candle series.
pub fn candles(symbol: &str, resolution: &str, days_back: u32, previous: bool) -> String {
    let mut params = vec![
        ("resolution", resolution.to_string()),
        ("days", days_back.to_string()),
    ];
    if previous {
        params.push(("prev", "1".to_string()));
    }
    build(CacheDomain::Candles, symbol, &params)
}

/// Key for a market news page.
pub fn market_news(category: &str, min_id: u64) -> String {
    build(
        CacheDomain::MarketNews,
        category,
        &[("min_id", min_id.to_string())],
    )
}

/// Key for company-specific news.
pub fn company_news(symbol: &str, days_back: u32) -> String {
    build(
        CacheDomain::CompanyNews,
        symbol,
        &[("days", days_back.to_string())],
    )
}

/// Key for a symbol search. The free-text query is hashed.
pub fn search(query: &str) -> String {
    build(CacheDomain::Search, &short_hash(&query.to_lowercase()), &[])
}

/// Key for an exchange's market status.
pub fn market_status(exchange: &str) -> String {
    build(CacheDomain::MarketStatus, exchange, &[])
}

/// Key for a batch quote request. The symbol list is sorted, deduplicated,
/// and hashed so every permutation of the same set shares one entry.
pub fn batch_quotes(symbols: &[String]) -> String {
    let mut sorted: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
    sorted.sort_unstable();
    sorted.dedup();
    build(CacheDomain::BatchQuotes, &short_hash(&sorted.join("_")), &[])
}

/// Key for a ranked scanner result list at a given limit.
pub fn scanner_results(scanner_type: &str, limit: usize) -> String {
    build(
        CacheDomain::Scanner,
        scanner_type,
        &[("limit", limit.to_string())],
    )
}

/// Glob matching every cached entry for one symbol, across all domains.
pub fn symbol_pattern(symbol: &str) -> String {
    format!("market:*:{}*", symbol)
}
