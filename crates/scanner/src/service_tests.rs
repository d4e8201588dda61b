//! Scanner engine tests over an in-memory market data stack.
//!
//! Each test wires a mock upstream provider (fixture stocks with exact
//! volume ratios) behind a real `MarketDataService` with an in-process
//! cache, so scans here exercise the same cache-first path production uses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use tickerscout_market_data::{
    CacheStore, CandleSeries, CompanyProfile, MarketDataService, MarketStatus, NewsArticle, Quote,
    SymbolSearchResult, TtlPolicy, UpstreamProvider,
};

use crate::cancel::ScanToken;
use crate::criteria::ScanKind;
use crate::errors::ScannerError;
use crate::source::{CandidateSource, StaticUniverse};
use crate::{ScannerService, MAX_SCAN_LIMIT};

/// One fixture stock with exact, controllable scan inputs.
#[derive(Clone)]
struct Stock {
    symbol: String,
    price: f64,
    percent_change: f64,
    previous_close: f64,
    volume: f64,
    avg_volume: f64,
    float_millions: f64,
    has_news: bool,
    profile_missing: bool,
}

impl Stock {
    /// A stock that passes the momentum filter: $5, +15%, 6x relative
    /// volume, 8M float.
    fn momentum(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            price: 5.0,
            percent_change: 15.0,
            previous_close: 4.35,
            volume: 600_000.0,
            avg_volume: 100_000.0,
            float_millions: 8.0,
            has_news: false,
            profile_missing: false,
        }
    }

    fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    fn with_percent_change(mut self, percent_change: f64) -> Self {
        self.percent_change = percent_change;
        self
    }

    fn with_previous_close(mut self, previous_close: f64) -> Self {
        self.previous_close = previous_close;
        self
    }

    fn with_volume(mut self, volume: f64, avg_volume: f64) -> Self {
        self.volume = volume;
        self.avg_volume = avg_volume;
        self
    }

    fn with_float_millions(mut self, float_millions: f64) -> Self {
        self.float_millions = float_millions;
        self
    }

    fn with_news(mut self) -> Self {
        self.has_news = true;
        self
    }

    fn without_profile(mut self) -> Self {
        self.profile_missing = true;
        self
    }
}

#[derive(Default)]
struct MockProvider {
    quotes: HashMap<String, Quote>,
    profiles: HashMap<String, CompanyProfile>,
    candle_data: HashMap<String, CandleSeries>,
    news: HashMap<String, Vec<NewsArticle>>,
    symbol_directory: Vec<String>,
}

impl MockProvider {
    fn from_stocks(stocks: &[Stock]) -> Self {
        let mut provider = Self::default();
        for stock in stocks {
            provider.quotes.insert(
                stock.symbol.clone(),
                Quote {
                    symbol: stock.symbol.clone(),
                    current_price: stock.price,
                    change: stock.price - stock.previous_close,
                    percent_change: stock.percent_change,
                    high: stock.price,
                    low: stock.previous_close,
                    open: stock.previous_close,
                    previous_close: stock.previous_close,
                    fetched_at: Utc::now(),
                },
            );

            if !stock.profile_missing {
                provider.profiles.insert(
                    stock.symbol.clone(),
                    CompanyProfile {
                        symbol: stock.symbol.clone(),
                        name: format!("{} Inc", stock.symbol),
                        exchange: "NASDAQ".to_string(),
                        industry: "Technology".to_string(),
                        market_cap: 120.0,
                        shares_outstanding: stock.float_millions,
                        country: "US".to_string(),
                        currency: "USD".to_string(),
                        logo_url: String::new(),
                        web_url: String::new(),
                        ipo_date: String::new(),
                    },
                );
            }

            // Ten baseline bars plus the current session, so the trailing
            // average is exactly `avg_volume` and the latest is `volume`.
            let mut volumes = vec![stock.avg_volume; 10];
            volumes.push(stock.volume);
            provider.candle_data.insert(
                stock.symbol.clone(),
                CandleSeries {
                    symbol: stock.symbol.clone(),
                    resolution: "D".to_string(),
                    timestamps: (0..volumes.len() as i64).collect(),
                    open: vec![stock.price; volumes.len()],
                    high: vec![stock.price; volumes.len()],
                    low: vec![stock.price; volumes.len()],
                    close: vec![stock.price; volumes.len()],
                    volume: volumes,
                },
            );

            if stock.has_news {
                provider.news.insert(
                    stock.symbol.clone(),
                    vec![NewsArticle {
                        id: 1,
                        headline: format!("{} announces results", stock.symbol),
                        datetime: Utc::now().timestamp(),
                        ..Default::default()
                    }],
                );
            }
        }
        provider
    }
}

#[async_trait]
impl UpstreamProvider for MockProvider {
    async fn quote(&self, symbol: &str) -> Option<Quote> {
        self.quotes.get(symbol).cloned()
    }

    async fn profile(&self, symbol: &str) -> Option<CompanyProfile> {
        self.profiles.get(symbol).cloned()
    }

    async fn candles(
        &self,
        symbol: &str,
        _resolution: &str,
        _days_back: u32,
        _previous: bool,
    ) -> Option<CandleSeries> {
        self.candle_data.get(symbol).cloned()
    }

    async fn market_news(&self, _category: &str, _min_id: u64) -> Vec<NewsArticle> {
        Vec::new()
    }

    async fn company_news(&self, symbol: &str, _days_back: u32) -> Vec<NewsArticle> {
        self.news.get(symbol).cloned().unwrap_or_default()
    }

    async fn search_symbols(&self, _query: &str) -> Vec<SymbolSearchResult> {
        Vec::new()
    }

    async fn market_status(&self, _exchange: &str) -> Option<MarketStatus> {
        None
    }

    async fn list_symbols(&self, _exchange: &str) -> Vec<String> {
        self.symbol_directory.clone()
    }
}

/// Candidate source that counts how often it is asked.
struct CountingSource {
    symbols: Vec<String>,
    calls: AtomicUsize,
}

impl CountingSource {
    fn new(symbols: Vec<String>) -> Self {
        Self {
            symbols,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CandidateSource for CountingSource {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn candidates(&self) -> Vec<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.symbols.clone()
    }
}

fn market_for(stocks: &[Stock]) -> Arc<MarketDataService> {
    Arc::new(MarketDataService::new(
        Arc::new(CacheStore::in_memory()),
        Arc::new(MockProvider::from_stocks(stocks)),
        TtlPolicy::new(),
    ))
}

fn scanner_for(stocks: &[Stock]) -> ScannerService {
    let symbols: Vec<String> = stocks.iter().map(|s| s.symbol.clone()).collect();
    ScannerService::new(market_for(stocks), Arc::new(StaticUniverse::new(symbols)))
}

#[tokio::test]
async fn test_momentum_ranks_stronger_candidate_first() {
    let stocks = vec![
        Stock::momentum("BBB")
            .with_percent_change(11.0)
            .with_volume(510_000.0, 100_000.0),
        Stock::momentum("AAA"),
    ];
    let scanner = scanner_for(&stocks);

    let results = scanner.run_momentum_scan(10).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].symbol, "AAA");
    assert_eq!(results[1].symbol, "BBB");
    assert!(results[0].score > results[1].score);

    // 15% * 2 + 6x * 3 + 8M-float bonus + price band = 73.
    assert!((results[0].score - 73.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_price_boundary_is_inclusive() {
    let stocks = vec![
        Stock::momentum("ATMIN").with_price(2.00),
        Stock::momentum("BELOW").with_price(1.99),
        Stock::momentum("ATMAX").with_price(20.00),
        Stock::momentum("ABOVE").with_price(20.01),
    ];
    let scanner = scanner_for(&stocks);

    let results = scanner.run_momentum_scan(10).await.unwrap();
    let symbols: Vec<&str> = results.iter().map(|c| c.symbol.as_str()).collect();

    assert!(symbols.contains(&"ATMIN"));
    assert!(symbols.contains(&"ATMAX"));
    assert!(!symbols.contains(&"BELOW"));
    assert!(!symbols.contains(&"ABOVE"));
}

#[tokio::test]
async fn test_truncation_respects_limit() {
    let stocks: Vec<Stock> = (0..10)
        .map(|i| {
            Stock::momentum(&format!("S{:02}", i)).with_percent_change(10.0 + i as f64)
        })
        .collect();
    let scanner = scanner_for(&stocks);

    let results = scanner.run_momentum_scan(5).await.unwrap();
    assert_eq!(results.len(), 5);

    // The five kept are the five strongest, in descending score order.
    assert_eq!(results[0].symbol, "S09");
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn test_scan_output_is_deterministic() {
    let stocks = vec![
        Stock::momentum("AAA"),
        Stock::momentum("BBB").with_percent_change(12.0),
        Stock::momentum("CCC").with_percent_change(18.0),
    ];

    // Independent services with independent caches.
    let first = scanner_for(&stocks).run_momentum_scan(10).await.unwrap();
    let second = scanner_for(&stocks).run_momentum_scan(10).await.unwrap();

    let first_view: Vec<(String, f64)> = first.iter().map(|c| (c.symbol.clone(), c.score)).collect();
    let second_view: Vec<(String, f64)> =
        second.iter().map(|c| (c.symbol.clone(), c.score)).collect();
    assert_eq!(first_view, second_view);
}

#[tokio::test]
async fn test_equal_scores_break_ties_by_symbol() {
    let stocks = vec![Stock::momentum("ZZZ"), Stock::momentum("AAA")];
    let scanner = scanner_for(&stocks);

    let results = scanner.run_momentum_scan(10).await.unwrap();
    assert_eq!(results[0].symbol, "AAA");
    assert_eq!(results[1].symbol, "ZZZ");
    assert_eq!(results[0].score, results[1].score);
}

#[tokio::test]
async fn test_limit_validation() {
    let scanner = scanner_for(&[Stock::momentum("AAA")]);

    assert!(matches!(
        scanner.run_momentum_scan(0).await,
        Err(ScannerError::InvalidLimit(0))
    ));
    assert!(matches!(
        scanner.run_momentum_scan(MAX_SCAN_LIMIT + 1).await,
        Err(ScannerError::InvalidLimit(_))
    ));
    assert!(scanner.run_momentum_scan(MAX_SCAN_LIMIT).await.is_ok());
}

#[tokio::test]
async fn test_candidate_without_profile_is_skipped() {
    let stocks = vec![
        Stock::momentum("AAA"),
        Stock::momentum("GHOST").without_profile(),
    ];
    let scanner = scanner_for(&stocks);

    let results = scanner.run_momentum_scan(10).await.unwrap();
    let symbols: Vec<&str> = results.iter().map(|c| c.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAA"]);
}

#[tokio::test]
async fn test_repeated_scan_is_served_from_cache() {
    let stocks = vec![Stock::momentum("AAA")];
    let source = Arc::new(CountingSource::new(vec!["AAA".to_string()]));
    let scanner = ScannerService::new(market_for(&stocks), source.clone());

    let first = scanner.run_momentum_scan(5).await.unwrap();
    let second = scanner.run_momentum_scan(5).await.unwrap();

    assert_eq!(first, second);
    // The second invocation skipped sourcing (and with it, steps 1-6).
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_different_limits_are_cached_separately() {
    let stocks = vec![Stock::momentum("AAA"), Stock::momentum("BBB")];
    let source = Arc::new(CountingSource::new(vec![
        "AAA".to_string(),
        "BBB".to_string(),
    ]));
    let scanner = ScannerService::new(market_for(&stocks), source.clone());

    assert_eq!(scanner.run_momentum_scan(1).await.unwrap().len(), 1);
    assert_eq!(scanner.run_momentum_scan(2).await.unwrap().len(), 2);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cancelled_scan_returns_empty_without_caching() {
    let stocks = vec![Stock::momentum("AAA")];
    let source = Arc::new(CountingSource::new(vec!["AAA".to_string()]));
    let scanner = ScannerService::new(market_for(&stocks), source.clone());

    let token = ScanToken::new();
    token.cancel();

    let cancelled = scanner
        .run_scan(ScanKind::Momentum, 5, &token)
        .await
        .unwrap();
    assert!(cancelled.is_empty());

    // A fresh scan still computes the real result: nothing was cached.
    let live = scanner.run_momentum_scan(5).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_universe_yields_empty_result() {
    let scanner = ScannerService::new(
        market_for(&[]),
        Arc::new(StaticUniverse::new(Vec::new())),
    );
    assert!(scanner.run_momentum_scan(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gappers_filter_uses_gap_from_previous_close() {
    // +5% gap exactly, but a daily percent change far below the momentum
    // threshold: visible to gappers, invisible to momentum.
    let gapper = Stock::momentum("GAP")
        .with_price(10.5)
        .with_previous_close(10.0)
        .with_percent_change(2.0)
        .with_volume(300_000.0, 100_000.0);
    let scanner = scanner_for(&[gapper]);

    assert!(scanner.run_momentum_scan(10).await.unwrap().is_empty());

    let gappers = scanner.run_gappers_scan(10).await.unwrap();
    assert_eq!(gappers.len(), 1);
    assert_eq!(gappers[0].symbol, "GAP");
    assert!((gappers[0].percent_change - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_low_float_ceiling() {
    let stocks = vec![
        Stock::momentum("TIGHT")
            .with_percent_change(5.0)
            .with_volume(50_000.0, 25_000.0)
            .with_float_millions(10.0),
        Stock::momentum("WIDE")
            .with_percent_change(5.0)
            .with_volume(50_000.0, 25_000.0)
            .with_float_millions(10.1),
    ];
    let scanner = scanner_for(&stocks);

    let results = scanner.run_low_float_scan(10).await.unwrap();
    let symbols: Vec<&str> = results.iter().map(|c| c.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["TIGHT"]);
}

#[tokio::test]
async fn test_news_catalyst_flag() {
    let stocks = vec![
        Stock::momentum("NEWSY").with_news(),
        Stock::momentum("QUIET"),
    ];
    let scanner = scanner_for(&stocks);

    let results = scanner.run_momentum_scan(10).await.unwrap();
    let by_symbol: HashMap<&str, bool> = results
        .iter()
        .map(|c| (c.symbol.as_str(), c.news_catalyst))
        .collect();
    assert!(by_symbol["NEWSY"]);
    assert!(!by_symbol["QUIET"]);
}

#[tokio::test]
async fn test_screening_source_feeds_a_scan() {
    use crate::source::ScreeningApiSource;

    let stocks = vec![Stock::momentum("AAA"), Stock::momentum("BBB")];
    let mut provider = MockProvider::from_stocks(&stocks);
    provider.symbol_directory = vec![
        "AAA".to_string(),
        "BBB".to_string(),
        "CCC".to_string(),
        "DDD".to_string(),
    ];
    let provider = Arc::new(provider);

    let market = Arc::new(MarketDataService::new(
        Arc::new(CacheStore::in_memory()),
        provider.clone(),
        TtlPolicy::new(),
    ));
    // Bounded universe: only the first two directory entries are evaluated.
    let source = ScreeningApiSource::new(provider).with_max_candidates(2);
    let scanner = ScannerService::new(market, Arc::new(source));

    let results = scanner.run_momentum_scan(10).await.unwrap();
    let symbols: Vec<&str> = results.iter().map(|c| c.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAA", "BBB"]);
}

#[tokio::test]
async fn test_zero_average_volume_means_zero_relative_volume() {
    // No baseline bars at all: relative volume is 0, the candidate fails
    // the relative-volume floor, and the scan still completes.
    let mut stock = Stock::momentum("FLAT");
    stock.avg_volume = 0.0;
    let scanner = scanner_for(&[stock]);

    assert!(scanner.run_momentum_scan(10).await.unwrap().is_empty());
}
