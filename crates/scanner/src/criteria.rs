//! Scanner variants and their eligibility criteria.
//!
//! The three variants share one predicate shape and differ only in their
//! thresholds. All bounds are inclusive: a candidate sitting exactly on a
//! threshold is eligible.

/// The scanner variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanKind {
    /// High relative volume, strong daily gain, bounded float.
    Momentum,
    /// Gapping up from the previous close on elevated volume.
    Gappers,
    /// Tight float with early momentum.
    LowFloat,
}

impl ScanKind {
    /// Stable identifier used in cache keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Momentum => "momentum",
            ScanKind::Gappers => "gappers",
            ScanKind::LowFloat => "low_float",
        }
    }

    pub const ALL: [ScanKind; 3] = [ScanKind::Momentum, ScanKind::Gappers, ScanKind::LowFloat];
}

/// Per-candidate inputs to filtering and scoring.
///
/// For the gappers variant, `change_percent` carries the gap from the
/// previous close rather than the daily percent change.
#[derive(Clone, Copy, Debug, Default)]
pub struct CandidateMetrics {
    pub price: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub relative_volume: f64,
    pub float_shares: f64,
}

/// Threshold set for one scanner variant.
#[derive(Clone, Copy, Debug)]
pub struct ScanCriteria {
    pub price_min: f64,
    pub price_max: f64,
    pub min_change_percent: f64,
    pub min_volume: f64,
    pub max_float_shares: f64,
    pub min_relative_volume: f64,
}

impl ScanCriteria {
    /// The documented thresholds for a scanner variant.
    pub fn for_kind(kind: ScanKind) -> Self {
        match kind {
            ScanKind::Momentum => Self {
                price_min: 2.00,
                price_max: 20.00,
                min_change_percent: 10.0,
                min_volume: 100_000.0,
                max_float_shares: 20_000_000.0,
                min_relative_volume: 5.0,
            },
            ScanKind::Gappers => Self {
                price_min: 2.00,
                price_max: 20.00,
                min_change_percent: 5.0,
                min_volume: 100_000.0,
                max_float_shares: 20_000_000.0,
                min_relative_volume: 3.0,
            },
            ScanKind::LowFloat => Self {
                price_min: 2.00,
                price_max: 20.00,
                min_change_percent: 5.0,
                min_volume: 50_000.0,
                max_float_shares: 10_000_000.0,
                min_relative_volume: 2.0,
            },
        }
    }

    /// Whether a candidate clears every threshold. Inclusive on all bounds.
    pub fn is_eligible(&self, metrics: &CandidateMetrics) -> bool {
        self.price_min <= metrics.price
            && metrics.price <= self.price_max
            && metrics.change_percent >= self.min_change_percent
            && metrics.volume >= self.min_volume
            && metrics.float_shares <= self.max_float_shares
            && metrics.relative_volume >= self.min_relative_volume
    }
}
