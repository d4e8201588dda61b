//! Finnhub upstream client.
//!
//! Fetches quotes, company profiles, candles, news, symbol search, and
//! market status from the Finnhub REST API. Free-tier accounts are limited
//! to 60 calls per minute, so every request passes through the shared
//! [`RequestPacer`] before it reaches the wire.
//!
//! API documentation: https://finnhub.io/docs/api

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{MarketDataConfig, DEFAULT_BASE_URL, DEFAULT_MIN_REQUEST_DELAY};
use crate::errors::MarketDataError;
use crate::models::{
    CandleSeries, CompanyProfile, MarketStatus, NewsArticle, Quote, SymbolSearchResult,
};
use crate::provider::{RequestPacer, UpstreamProvider};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /quote
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// High of the day
    h: Option<f64>,
    /// Low of the day
    l: Option<f64>,
    /// Open of the day
    o: Option<f64>,
    /// Previous close
    pc: Option<f64>,
}

/// Response from /stock/profile2
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    name: Option<String>,
    ticker: Option<String>,
    exchange: Option<String>,
    finnhub_industry: Option<String>,
    /// Market capitalization, in millions
    market_capitalization: Option<f64>,
    /// Shares outstanding, in millions
    share_outstanding: Option<f64>,
    country: Option<String>,
    currency: Option<String>,
    logo: Option<String>,
    weburl: Option<String>,
    ipo: Option<String>,
}

/// Response from /stock/candle
#[derive(Debug, Deserialize)]
struct CandleResponse {
    /// Status: "ok" or "no_data"
    s: String,
    #[serde(default)]
    t: Vec<i64>,
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    v: Vec<f64>,
}

/// Item in /news and /company-news responses
#[derive(Debug, Deserialize)]
struct NewsItem {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    headline: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    datetime: i64,
    #[serde(default)]
    category: String,
    #[serde(default)]
    related: String,
}

/// Response from /search
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    display_symbol: String,
    #[serde(rename = "type", default)]
    security_type: String,
}

/// Response from /stock/market-status
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketStatusResponse {
    exchange: Option<String>,
    is_open: Option<bool>,
    session: Option<String>,
    timezone: Option<String>,
}

/// Item in /stock/symbol responses
#[derive(Debug, Deserialize)]
struct SymbolEntry {
    #[serde(default)]
    symbol: String,
}

// ============================================================================
// FinnhubClient
// ============================================================================

/// Rate-limited Finnhub API client.
pub struct FinnhubClient {
    http: Client,
    api_key: String,
    base_url: String,
    pacer: RequestPacer,
}

impl FinnhubClient {
    /// Create a client with the default base URL and request pacing.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            pacer: RequestPacer::new(DEFAULT_MIN_REQUEST_DELAY),
        }
    }

    /// Create a client from a full configuration.
    pub fn from_config(config: &MarketDataConfig) -> Self {
        Self::new(config.api_key.clone())
            .with_base_url(config.base_url.clone())
            .with_min_delay(config.min_request_delay)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.pacer = RequestPacer::new(min_delay);
        self
    }

    /// Make an authenticated, paced GET request.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<String, MarketDataError> {
        self.pacer.pace().await;

        let url = format!("{}/{}", self.base_url, endpoint);
        let mut request = self
            .http
            .get(&url)
            .query(&[("token", self.api_key.as_str())]);

        for (name, value) in params {
            request = request.query(&[(name, value)]);
        }

        debug!("finnhub request: {} with {} params", endpoint, params.len());

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout
            } else {
                MarketDataError::Upstream(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::Upstream(
                "invalid or missing API key".to_string(),
            ));
        }

        // Finnhub reports an exhausted quota as 403.
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(MarketDataError::RateLimited);
        }

        if !status.is_success() {
            return Err(MarketDataError::Upstream(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::Upstream(format!("failed to read response: {}", e)))
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>, MarketDataError> {
        let params = [("symbol", symbol.to_string())];
        let text = self.fetch("quote", &params).await?;

        let response: QuoteResponse = serde_json::from_str(&text)
            .map_err(|e| MarketDataError::MalformedPayload(format!("quote: {}", e)))?;

        let current_price = response.c.unwrap_or_default();
        let open = response.o.unwrap_or_default();

        // Finnhub returns all zeros for unknown symbols instead of an error.
        if current_price == 0.0 && open == 0.0 {
            return Ok(None);
        }

        Ok(Some(Quote {
            symbol: symbol.to_string(),
            current_price,
            change: response.d.unwrap_or_default(),
            percent_change: response.dp.unwrap_or_default(),
            high: response.h.unwrap_or_default(),
            low: response.l.unwrap_or_default(),
            open,
            previous_close: response.pc.unwrap_or_default(),
            fetched_at: Utc::now(),
        }))
    }

    async fn fetch_profile(
        &self,
        symbol: &str,
    ) -> Result<Option<CompanyProfile>, MarketDataError> {
        let params = [("symbol", symbol.to_string())];
        let text = self.fetch("stock/profile2", &params).await?;

        // Unknown symbols come back as an empty object.
        if text.trim() == "{}" {
            return Ok(None);
        }

        let response: ProfileResponse = serde_json::from_str(&text)
            .map_err(|e| MarketDataError::MalformedPayload(format!("profile: {}", e)))?;

        if response.name.is_none() && response.ticker.is_none() {
            return Ok(None);
        }

        Ok(Some(CompanyProfile {
            symbol: symbol.to_string(),
            name: response.name.unwrap_or_default(),
            exchange: response.exchange.unwrap_or_default(),
            industry: response.finnhub_industry.unwrap_or_default(),
            market_cap: response.market_capitalization.unwrap_or_default(),
            shares_outstanding: response.share_outstanding.unwrap_or_default(),
            country: response.country.unwrap_or_default(),
            currency: response.currency.unwrap_or_else(|| "USD".to_string()),
            logo_url: response.logo.unwrap_or_default(),
            web_url: response.weburl.unwrap_or_default(),
            ipo_date: response.ipo.unwrap_or_default(),
        }))
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        resolution: &str,
        days_back: u32,
        previous: bool,
    ) -> Result<Option<CandleSeries>, MarketDataError> {
        let (from, to) = candle_window(Utc::now(), days_back, previous);
        let params = [
            ("symbol", symbol.to_string()),
            ("resolution", resolution.to_string()),
            ("from", from.to_string()),
            ("to", to.to_string()),
        ];
        let text = self.fetch("stock/candle", &params).await?;

        let response: CandleResponse = serde_json::from_str(&text)
            .map_err(|e| MarketDataError::MalformedPayload(format!("candles: {}", e)))?;

        if response.s != "ok" {
            return Ok(None);
        }

        let len = response.t.len();
        if len == 0 {
            return Ok(None);
        }
        if response.o.len() != len
            || response.h.len() != len
            || response.l.len() != len
            || response.c.len() != len
            || response.v.len() != len
        {
            return Err(MarketDataError::MalformedPayload(
                "mismatched candle array lengths".to_string(),
            ));
        }

        Ok(Some(CandleSeries {
            symbol: symbol.to_string(),
            resolution: resolution.to_string(),
            timestamps: response.t,
            open: response.o,
            high: response.h,
            low: response.l,
            close: response.c,
            volume: response.v,
        }))
    }

    async fn fetch_market_news(
        &self,
        category: &str,
        min_id: u64,
    ) -> Result<Vec<NewsArticle>, MarketDataError> {
        let params = [
            ("category", category.to_string()),
            ("minId", min_id.to_string()),
        ];
        let text = self.fetch("news", &params).await?;
        parse_news(&text)
    }

    async fn fetch_company_news(
        &self,
        symbol: &str,
        days_back: u32,
    ) -> Result<Vec<NewsArticle>, MarketDataError> {
        let now = Utc::now();
        let from = now - chrono::Duration::days(i64::from(days_back));
        let params = [
            ("symbol", symbol.to_string()),
            ("from", from.format("%Y-%m-%d").to_string()),
            ("to", now.format("%Y-%m-%d").to_string()),
        ];
        let text = self.fetch("company-news", &params).await?;
        parse_news(&text)
    }

    async fn fetch_search(
        &self,
        query: &str,
    ) -> Result<Vec<SymbolSearchResult>, MarketDataError> {
        let params = [("q", query.to_string())];
        let text = self.fetch("search", &params).await?;

        let response: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| MarketDataError::MalformedPayload(format!("search: {}", e)))?;

        Ok(response
            .result
            .into_iter()
            .map(|item| SymbolSearchResult {
                symbol: item.symbol,
                description: item.description,
                display_symbol: item.display_symbol,
                security_type: item.security_type,
            })
            .collect())
    }

    async fn fetch_market_status(
        &self,
        exchange: &str,
    ) -> Result<Option<MarketStatus>, MarketDataError> {
        let params = [("exchange", exchange.to_string())];
        let text = self.fetch("stock/market-status", &params).await?;

        let response: MarketStatusResponse = serde_json::from_str(&text)
            .map_err(|e| MarketDataError::MalformedPayload(format!("market status: {}", e)))?;

        Ok(Some(MarketStatus {
            exchange: response.exchange.unwrap_or_else(|| exchange.to_string()),
            is_open: response.is_open.unwrap_or(false),
            session: response.session.unwrap_or_else(|| "closed".to_string()),
            timezone: response
                .timezone
                .unwrap_or_else(|| "America/New_York".to_string()),
            checked_at: Utc::now(),
        }))
    }

    async fn fetch_symbol_list(&self, exchange: &str) -> Result<Vec<String>, MarketDataError> {
        let params = [("exchange", exchange.to_string())];
        let text = self.fetch("stock/symbol", &params).await?;

        let entries: Vec<SymbolEntry> = serde_json::from_str(&text)
            .map_err(|e| MarketDataError::MalformedPayload(format!("symbol list: {}", e)))?;

        Ok(entries
            .into_iter()
            .map(|entry| entry.symbol)
            .filter(|symbol| !symbol.is_empty())
            .collect())
    }
}

// ============================================================================
// UpstreamProvider Implementation
// ============================================================================

#[async_trait]
impl UpstreamProvider for FinnhubClient {
    async fn quote(&self, symbol: &str) -> Option<Quote> {
        match self.fetch_quote(symbol).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!("quote fetch failed for {}: {}", symbol, e);
                None
            }
        }
    }

    async fn profile(&self, symbol: &str) -> Option<CompanyProfile> {
        match self.fetch_profile(symbol).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("profile fetch failed for {}: {}", symbol, e);
                None
            }
        }
    }

    async fn candles(
        &self,
        symbol: &str,
        resolution: &str,
        days_back: u32,
        previous: bool,
    ) -> Option<CandleSeries> {
        match self
            .fetch_candles(symbol, resolution, days_back, previous)
            .await
        {
            Ok(candles) => candles,
            Err(e) => {
                warn!("candle fetch failed for {}: {}", symbol, e);
                None
            }
        }
    }

    async fn market_news(&self, category: &str, min_id: u64) -> Vec<NewsArticle> {
        match self.fetch_market_news(category, min_id).await {
            Ok(news) => news,
            Err(e) => {
                warn!("market news fetch failed for {}: {}", category, e);
                Vec::new()
            }
        }
    }

    async fn company_news(&self, symbol: &str, days_back: u32) -> Vec<NewsArticle> {
        match self.fetch_company_news(symbol, days_back).await {
            Ok(news) => news,
            Err(e) => {
                warn!("company news fetch failed for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }

    async fn search_symbols(&self, query: &str) -> Vec<SymbolSearchResult> {
        match self.fetch_search(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!("symbol search failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    async fn market_status(&self, exchange: &str) -> Option<MarketStatus> {
        match self.fetch_market_status(exchange).await {
            Ok(status) => status,
            Err(e) => {
                warn!("market status fetch failed for {}: {}", exchange, e);
                None
            }
        }
    }

    async fn list_symbols(&self, exchange: &str) -> Vec<String> {
        match self.fetch_symbol_list(exchange).await {
            Ok(symbols) => symbols,
            Err(e) => {
                warn!("symbol list fetch failed for {}: {}", exchange, e);
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_news(text: &str) -> Result<Vec<NewsArticle>, MarketDataError> {
    let items: Vec<NewsItem> = serde_json::from_str(text)
        .map_err(|e| MarketDataError::MalformedPayload(format!("news: {}", e)))?;

    Ok(items
        .into_iter()
        .map(|item| NewsArticle {
            id: item.id,
            headline: item.headline,
            summary: item.summary,
            source: item.source,
            url: item.url,
            image: item.image,
            datetime: item.datetime,
            category: item.category,
            related: item.related,
        })
        .collect())
}

/// The most recent weekday strictly before `today`.
fn previous_business_day(today: NaiveDate) -> NaiveDate {
    let mut day = today - chrono::Duration::days(1);
    while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        day -= chrono::Duration::days(1);
    }
    day
}

/// Unix-second window for a candle request.
///
/// Normal mode ends now; `previous` mode ends at the close of the prior
/// business day. Both subtract the full lookback from the window end.
fn candle_window(now: DateTime<Utc>, days_back: u32, previous: bool) -> (i64, i64) {
    let to = if previous {
        let end_day = previous_business_day(now.date_naive());
        let end = end_day.and_hms_opt(23, 59, 59).unwrap();
        Utc.from_utc_datetime(&end).timestamp()
    } else {
        now.timestamp()
    };
    let from = to - i64::from(days_back) * 86_400;
    (from, to)
}

// ============================================================================
// Tests
// ============================================================================
