use serde::{Deserialize, Serialize};

/// Candle resolutions accepted by the upstream API.
pub const VALID_RESOLUTIONS: &[&str] = &["1", "5", "15", "30", "60", "D", "W", "M"];

/// Returns true when `resolution` is one of the supported values.
pub fn is_valid_resolution(resolution: &str) -> bool {
    VALID_RESOLUTIONS.contains(&resolution)
}

/// Historical candle data for one symbol, as parallel arrays.
///
/// The arrays share indices: entry `i` of each array describes the same bar.
/// Upstream guarantees equal lengths for a well-formed response; the adapter
/// rejects mismatched payloads before they reach here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    pub symbol: String,
    pub resolution: String,
    /// Bar timestamps (Unix seconds), ascending
    pub timestamps: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl CandleSeries {
    /// Number of bars in the series.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Volume of the most recent bar, or 0 for an empty series.
    pub fn latest_volume(&self) -> f64 {
        self.volume.last().copied().unwrap_or(0.0)
    }

    /// Average volume over up to `window` bars preceding the latest bar.
    ///
    /// The latest bar is excluded: it is the in-progress session whose volume
    /// is being compared against this trailing baseline. Returns 0 when there
    /// are no preceding bars.
    pub fn trailing_average_volume(&self, window: usize) -> f64 {
        if self.volume.len() < 2 || window == 0 {
            return 0.0;
        }
        let prior = &self.volume[..self.volume.len() - 1];
        let start = prior.len().saturating_sub(window);
        let tail = &prior[start..];
        tail.iter().sum::<f64>() / tail.len() as f64
    }
}
