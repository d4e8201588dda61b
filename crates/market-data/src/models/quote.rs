use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Real-time quote for a single symbol.
///
/// A quote is immutable once fetched; a fresher fetch supersedes it in the
/// cache rather than mutating it in place. Prices default to `0.0` when the
/// upstream omits a field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol (e.g., "AAPL")
    pub symbol: String,

    /// Last traded price
    pub current_price: f64,

    /// Absolute change since previous close
    pub change: f64,

    /// Percent change since previous close
    pub percent_change: f64,

    /// High of the current session
    pub high: f64,

    /// Low of the current session
    pub low: f64,

    /// Open of the current session
    pub open: f64,

    /// Previous session close
    pub previous_close: f64,

    /// When this quote was fetched from upstream
    pub fetched_at: DateTime<Utc>,
}

impl Quote {
    /// Gap from the previous session close, in percent.
    ///
    /// A zero previous close yields 0 rather than a division error.
    pub fn gap_percent(&self) -> f64 {
        if self.previous_close == 0.0 {
            return 0.0;
        }
        (self.current_price - self.previous_close) / self.previous_close * 100.0
    }
}
