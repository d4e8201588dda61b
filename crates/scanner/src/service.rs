//! Scanner engine.
//!
//! A scan is stateless across invocations: every piece of state lives in
//! the market data cache. Per invocation the engine sources a candidate
//! universe, evaluates candidates concurrently (the upstream pacer inside
//! the market data layer arbitrates actual upstream concurrency), filters
//! and scores the survivors, ranks them, truncates to the caller's limit,
//! and caches the ranked list so identical requests inside the TTL window
//! skip the whole pipeline.
//!
//! A scan never fails because data was unavailable: candidates that cannot
//! be evaluated are skipped and the result is a well-formed, possibly
//! empty, ranked list. The only rejected input is an out-of-range limit.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use tickerscout_market_data::MarketDataService;

use crate::cancel::ScanToken;
use crate::candidate::ScannerCandidate;
use crate::criteria::{CandidateMetrics, ScanCriteria, ScanKind};
use crate::errors::ScannerError;
use crate::score::score_for;
use crate::source::CandidateSource;

/// Upper bound on the caller-supplied result limit.
pub const MAX_SCAN_LIMIT: usize = 100;

/// Daily-candle lookback used to derive volume figures.
const VOLUME_LOOKBACK_DAYS: u32 = 15;

/// Trailing window (in bars) for the average-volume baseline.
const AVG_VOLUME_WINDOW: usize = 10;

/// How far back company news counts as a catalyst.
const NEWS_LOOKBACK_DAYS: u32 = 1;

/// Default bound on concurrently evaluated candidates.
const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Rule-based stock scanner over the market data facade.
pub struct ScannerService {
    market: Arc<MarketDataService>,
    source: Arc<dyn CandidateSource>,
    max_in_flight: usize,
}

impl ScannerService {
    pub fn new(market: Arc<MarketDataService>, source: Arc<dyn CandidateSource>) -> Self {
        Self {
            market,
            source,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Bound the number of candidates evaluated concurrently.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Momentum scan: high relative volume, strong daily gain.
    pub async fn run_momentum_scan(
        &self,
        limit: usize,
    ) -> Result<Vec<ScannerCandidate>, ScannerError> {
        self.run_scan(ScanKind::Momentum, limit, &ScanToken::new())
            .await
    }

    /// Gappers scan: gapping up from the previous close.
    pub async fn run_gappers_scan(
        &self,
        limit: usize,
    ) -> Result<Vec<ScannerCandidate>, ScannerError> {
        self.run_scan(ScanKind::Gappers, limit, &ScanToken::new())
            .await
    }

    /// Low-float scan: tight float with early momentum.
    pub async fn run_low_float_scan(
        &self,
        limit: usize,
    ) -> Result<Vec<ScannerCandidate>, ScannerError> {
        self.run_scan(ScanKind::LowFloat, limit, &ScanToken::new())
            .await
    }

    /// Run a scan with an explicit cancellation token.
    ///
    /// The ranked output ordering is score descending with ties broken by
    /// symbol ascending, independent of evaluation completion order.
    pub async fn run_scan(
        &self,
        kind: ScanKind,
        limit: usize,
        token: &ScanToken,
    ) -> Result<Vec<ScannerCandidate>, ScannerError> {
        if limit == 0 || limit > MAX_SCAN_LIMIT {
            return Err(ScannerError::InvalidLimit(limit));
        }

        if let Some(cached) = self
            .market
            .get_scanner_results::<ScannerCandidate>(kind.as_str(), limit)
            .await
        {
            debug!("{} scan served from cache (limit {})", kind.as_str(), limit);
            return Ok(cached);
        }

        let symbols = self.source.candidates().await;
        if symbols.is_empty() {
            warn!(
                "{} scan: candidate source '{}' returned no symbols",
                kind.as_str(),
                self.source.name()
            );
            return Ok(Vec::new());
        }

        let criteria = ScanCriteria::for_kind(kind);
        let candidate_count = symbols.len();

        let evaluated: Vec<Option<ScannerCandidate>> = stream::iter(symbols)
            .map(|symbol| {
                let token = token.clone();
                async move {
                    if token.is_cancelled() {
                        return None;
                    }
                    self.evaluate(kind, criteria, symbol).await
                }
            })
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await;

        if token.is_cancelled() {
            debug!("{} scan cancelled", kind.as_str());
            return Ok(Vec::new());
        }

        let mut eligible: Vec<ScannerCandidate> = evaluated.into_iter().flatten().collect();

        eligible.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        eligible.truncate(limit);

        info!(
            "{} scan: {} of {} candidates eligible (limit {})",
            kind.as_str(),
            eligible.len(),
            candidate_count,
            limit
        );

        self.market
            .cache_scanner_results(kind.as_str(), limit, &eligible)
            .await;

        Ok(eligible)
    }

    /// Evaluate one candidate: fetch its inputs cache-first, filter, score.
    ///
    /// Returns `None` for ineligible candidates and for candidates whose
    /// quote or profile is unavailable; either way the scan continues.
    async fn evaluate(
        &self,
        kind: ScanKind,
        criteria: ScanCriteria,
        symbol: String,
    ) -> Option<ScannerCandidate> {
        let quote = self.market.get_quote(&symbol).await?;
        let profile = self.market.get_profile(&symbol).await?;

        // Volume figures come from daily candles: the latest bar is the
        // current session, the trailing average is the baseline. A symbol
        // without candle data scans with zero volume and drops out at the
        // volume floor.
        let candles = match self
            .market
            .get_candles(&symbol, "D", VOLUME_LOOKBACK_DAYS, false)
            .await
        {
            Ok(candles) => candles,
            Err(e) => {
                warn!("skipping {}: candle lookup failed: {}", symbol, e);
                None
            }
        };

        let volume = candles.as_ref().map_or(0.0, |c| c.latest_volume());
        let average_volume = candles
            .as_ref()
            .map_or(0.0, |c| c.trailing_average_volume(AVG_VOLUME_WINDOW));
        let relative_volume = if average_volume > 0.0 {
            volume / average_volume
        } else {
            0.0
        };

        let change_metric = match kind {
            ScanKind::Gappers => quote.gap_percent(),
            _ => quote.percent_change,
        };

        let metrics = CandidateMetrics {
            price: quote.current_price,
            change_percent: change_metric,
            volume,
            relative_volume,
            float_shares: profile.float_shares(),
        };

        if !criteria.is_eligible(&metrics) {
            return None;
        }

        // Only eligible candidates pay for the news lookup.
        let news = self
            .market
            .get_company_news(&symbol, NEWS_LOOKBACK_DAYS)
            .await;

        Some(ScannerCandidate {
            symbol: quote.symbol.clone(),
            company_name: profile.name.clone(),
            price: quote.current_price,
            change: quote.change,
            percent_change: change_metric,
            volume,
            relative_volume,
            float_shares: metrics.float_shares,
            market_cap: profile.market_cap,
            news_catalyst: !news.is_empty(),
            score: score_for(kind, &metrics),
            scanned_at: Utc::now(),
        })
    }
}
