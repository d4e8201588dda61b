//! Property tests for the scoring functions.
//!
//! The ranking contract depends on two things holding for every input:
//! scores are bounded, and more percent change never scores lower when
//! everything else is held equal.

use proptest::prelude::*;

use tickerscout_scanner::{momentum_score, score_for, CandidateMetrics, ScanKind};

fn non_negative_metrics() -> impl Strategy<Value = CandidateMetrics> {
    (
        0.0f64..1000.0,
        0.0f64..500.0,
        0.0f64..1e9,
        0.0f64..200.0,
        0.0f64..1e10,
    )
        .prop_map(
            |(price, change_percent, volume, relative_volume, float_shares)| CandidateMetrics {
                price,
                change_percent,
                volume,
                relative_volume,
                float_shares,
            },
        )
}

proptest! {
    #[test]
    fn scores_are_bounded_for_non_negative_inputs(m in non_negative_metrics()) {
        for kind in ScanKind::ALL {
            let score = score_for(kind, &m);
            prop_assert!((0.0..=100.0).contains(&score), "{:?} scored {}", kind, score);
        }
    }

    #[test]
    fn momentum_score_is_monotone_in_percent_change(
        m in non_negative_metrics(),
        bump in 0.0f64..100.0,
    ) {
        let mut stronger = m;
        stronger.change_percent += bump;
        prop_assert!(momentum_score(&stronger) >= momentum_score(&m));
    }

    #[test]
    fn scores_are_pure_functions(m in non_negative_metrics()) {
        for kind in ScanKind::ALL {
            prop_assert_eq!(score_for(kind, &m), score_for(kind, &m));
        }
    }
}
