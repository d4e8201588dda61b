use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ranked scanner result.
///
/// Constructed per scan from the cached quote/profile/candle inputs and
/// discarded with the response; only the ranked list as a whole is cached,
/// never individual candidates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScannerCandidate {
    pub symbol: String,
    pub company_name: String,
    pub price: f64,
    /// Absolute change since previous close
    pub change: f64,
    /// Percent change since previous close (the gap, for the gappers scan)
    pub percent_change: f64,
    /// Latest session volume
    pub volume: f64,
    /// Latest volume over the trailing average
    pub relative_volume: f64,
    /// Approximate float, in shares
    pub float_shares: f64,
    /// Market capitalization, in millions
    pub market_cap: f64,
    /// Whether the symbol has company news within the last day
    pub news_catalyst: bool,
    /// Variant-specific composite score, higher is better
    pub score: f64,
    pub scanned_at: DateTime<Utc>,
}
