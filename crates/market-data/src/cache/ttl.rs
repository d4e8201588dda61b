//! Per-domain TTL policy.
//!
//! The defaults are tuned for a rate-limited upstream: near-real-time data
//! expires fast, slow-changing data is held long. Every value can be
//! overridden through [`TtlPolicy`] so operators can retune without a
//! rebuild.

use std::collections::HashMap;
use std::env;

/// Cache domains, one per kind of cached market data.
///
/// Closed enumeration: adding a data kind means adding a variant here, and
/// the compiler walks you through every table that needs a row for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheDomain {
    Quote,
    Profile,
    MarketNews,
    CompanyNews,
    Candles,
    Search,
    MarketStatus,
    Scanner,
    BatchQuotes,
}

impl CacheDomain {
    /// Key prefix segment for this domain (see the key policy module).
    pub fn prefix(&self) -> &'static str {
        match self {
            CacheDomain::Quote => "quote",
            CacheDomain::Profile => "profile",
            CacheDomain::MarketNews => "news",
            CacheDomain::CompanyNews => "company_news",
            CacheDomain::Candles => "candles",
            CacheDomain::Search => "search",
            CacheDomain::MarketStatus => "market_status",
            CacheDomain::Scanner => "scanner",
            CacheDomain::BatchQuotes => "batch_quotes",
        }
    }

    /// Default TTL in seconds.
    pub fn default_ttl(&self) -> u64 {
        match self {
            CacheDomain::Quote => 120,
            CacheDomain::Profile => 3600,
            CacheDomain::MarketNews => 300,
            CacheDomain::CompanyNews => 600,
            CacheDomain::Candles => 900,
            CacheDomain::Search => 1800,
            CacheDomain::MarketStatus => 60,
            CacheDomain::Scanner => 300,
            CacheDomain::BatchQuotes => 120,
        }
    }

    /// Environment variable that overrides this domain's TTL.
    fn env_override_key(&self) -> &'static str {
        match self {
            CacheDomain::Quote => "TTL_QUOTE_SECS",
            CacheDomain::Profile => "TTL_PROFILE_SECS",
            CacheDomain::MarketNews => "TTL_NEWS_SECS",
            CacheDomain::CompanyNews => "TTL_COMPANY_NEWS_SECS",
            CacheDomain::Candles => "TTL_CANDLES_SECS",
            CacheDomain::Search => "TTL_SEARCH_SECS",
            CacheDomain::MarketStatus => "TTL_MARKET_STATUS_SECS",
            CacheDomain::Scanner => "TTL_SCANNER_SECS",
            CacheDomain::BatchQuotes => "TTL_BATCH_QUOTES_SECS",
        }
    }

    /// All domains, for table-driven iteration.
    pub const ALL: [CacheDomain; 9] = [
        CacheDomain::Quote,
        CacheDomain::Profile,
        CacheDomain::MarketNews,
        CacheDomain::CompanyNews,
        CacheDomain::Candles,
        CacheDomain::Search,
        CacheDomain::MarketStatus,
        CacheDomain::Scanner,
        CacheDomain::BatchQuotes,
    ];
}

/// TTL table with optional per-domain overrides.
#[derive(Clone, Debug, Default)]
pub struct TtlPolicy {
    overrides: HashMap<CacheDomain, u64>,
}

impl TtlPolicy {
    /// Policy with the default table and no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `TTL_*_SECS` overrides from the environment.
    pub fn from_env() -> Self {
        let mut policy = Self::new();
        for domain in CacheDomain::ALL {
            if let Some(secs) = env::var(domain.env_override_key())
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
            {
                policy.overrides.insert(domain, secs);
            }
        }
        policy
    }

    /// Override the TTL for one domain.
    pub fn with_override(mut self, domain: CacheDomain, ttl_seconds: u64) -> Self {
        self.overrides.insert(domain, ttl_seconds);
        self
    }

    /// Effective TTL for a domain, in seconds.
    pub fn ttl_for(&self, domain: CacheDomain) -> u64 {
        self.overrides
            .get(&domain)
            .copied()
            .unwrap_or_else(|| domain.default_ttl())
    }
}
