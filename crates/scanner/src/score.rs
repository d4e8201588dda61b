//! Scoring functions for ranked scanner output.
//!
//! Each variant's score is a bounded sum of capped and tiered sub-scores,
//! a pure function of the candidate metrics: same inputs, same score, no
//! hidden state. Scores are rounded to two decimals.

use crate::criteria::{CandidateMetrics, ScanKind};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score a candidate for the given scanner variant.
pub fn score_for(kind: ScanKind, metrics: &CandidateMetrics) -> f64 {
    match kind {
        ScanKind::Momentum => momentum_score(metrics),
        ScanKind::Gappers => gap_score(metrics),
        ScanKind::LowFloat => low_float_score(metrics),
    }
}

/// Momentum quality score, 0-100 for non-negative inputs.
///
/// Percent change dominates (up to 40), then relative volume (up to 30),
/// a tiered bonus for small floats (up to 20), and a price-band bonus that
/// favors the $2-$10 range (up to 10).
pub fn momentum_score(metrics: &CandidateMetrics) -> f64 {
    let mut score = 0.0;

    score += (metrics.change_percent * 2.0).min(40.0);
    score += (metrics.relative_volume * 3.0).min(30.0);

    score += if metrics.float_shares <= 5_000_000.0 {
        20.0
    } else if metrics.float_shares <= 10_000_000.0 {
        15.0
    } else if metrics.float_shares <= 20_000_000.0 {
        10.0
    } else {
        0.0
    };

    score += if (2.0..=10.0).contains(&metrics.price) {
        10.0
    } else if (1.0..=20.0).contains(&metrics.price) {
        5.0
    } else {
        0.0
    };

    round2(score)
}

/// Gapper quality score, 0-100 for non-negative inputs.
///
/// The gap itself dominates (up to 50); `change_percent` carries the gap
/// from the previous close for this variant.
pub fn gap_score(metrics: &CandidateMetrics) -> f64 {
    let mut score = 0.0;

    score += (metrics.change_percent * 3.0).min(50.0);
    score += (metrics.relative_volume * 2.0).min(30.0);

    if metrics.float_shares <= 10_000_000.0 {
        score += 20.0;
    }

    round2(score)
}

/// Low-float explosive-potential score, 0-100 for non-negative inputs.
///
/// Float size dominates (up to 40), then float turnover — the share of the
/// float that has already traded today (up to 30) — then relative volume
/// (up to 20) and percent change (up to 10).
pub fn low_float_score(metrics: &CandidateMetrics) -> f64 {
    let mut score = 0.0;

    score += if metrics.float_shares <= 2_000_000.0 {
        40.0
    } else if metrics.float_shares <= 5_000_000.0 {
        30.0
    } else if metrics.float_shares <= 10_000_000.0 {
        20.0
    } else {
        0.0
    };

    let float_turnover = if metrics.float_shares > 0.0 {
        metrics.volume / metrics.float_shares * 100.0
    } else {
        0.0
    };
    score += (float_turnover * 2.0).min(30.0);

    score += (metrics.relative_volume * 2.0).min(20.0);
    score += metrics.change_percent.min(10.0);

    round2(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(
        price: f64,
        change_percent: f64,
        volume: f64,
        relative_volume: f64,
        float_shares: f64,
    ) -> CandidateMetrics {
        CandidateMetrics {
            price,
            change_percent,
            volume,
            relative_volume,
            float_shares,
        }
    }

    #[test]
    fn test_momentum_score_known_value() {
        // 15% * 2 = 30, rvol 6 * 3 = 18, 8M float = 15, $5 price band = 10
        let m = metrics(5.0, 15.0, 500_000.0, 6.0, 8_000_000.0);
        assert_eq!(momentum_score(&m), 73.0);
    }

    #[test]
    fn test_higher_percent_change_scores_higher() {
        let stronger = metrics(5.0, 15.0, 500_000.0, 6.0, 8_000_000.0);
        let weaker = metrics(5.0, 11.0, 500_000.0, 5.1, 8_000_000.0);
        assert!(momentum_score(&stronger) > momentum_score(&weaker));
    }

    #[test]
    fn test_momentum_sub_scores_are_capped() {
        let extreme = metrics(5.0, 500.0, 9e9, 100.0, 1_000_000.0);
        assert_eq!(momentum_score(&extreme), 100.0);
    }

    #[test]
    fn test_gap_score_known_value() {
        // gap 10 * 3 = 30, rvol 4 * 2 = 8, float 9M <= 10M = 20
        let m = metrics(5.0, 10.0, 300_000.0, 4.0, 9_000_000.0);
        assert_eq!(gap_score(&m), 58.0);
    }

    #[test]
    fn test_low_float_score_known_value() {
        // 1.5M float = 40, turnover 150k/1.5M = 10% -> 20, rvol 3 * 2 = 6,
        // change 8 -> 8
        let m = metrics(5.0, 8.0, 150_000.0, 3.0, 1_500_000.0);
        assert_eq!(low_float_score(&m), 74.0);
    }

    #[test]
    fn test_low_float_zero_float_has_no_turnover() {
        let m = metrics(5.0, 8.0, 150_000.0, 3.0, 0.0);
        // 40 (tier) + 0 (turnover) + 6 + 8
        assert_eq!(low_float_score(&m), 54.0);
    }

    #[test]
    fn test_scores_are_deterministic() {
        let m = metrics(7.5, 12.3, 456_789.0, 5.4, 6_543_210.0);
        for kind in ScanKind::ALL {
            assert_eq!(score_for(kind, &m), score_for(kind, &m));
        }
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        // rvol 5.1 * 3 = 15.299999... territory
        let m = metrics(5.0, 11.0, 500_000.0, 5.1, 8_000_000.0);
        let score = momentum_score(&m);
        assert_eq!(score, (score * 100.0).round() / 100.0);
    }
}
