//! Tickerscout Scanner Crate
//!
//! Rule-based stock scanners (momentum, gappers, low-float) over the
//! market data facade. Route handlers resolve the caller's subscription
//! tier to a result limit via [`SubscriptionTier`], then call
//! [`ScannerService`]; everything the engine touches is served cache-first
//! by `tickerscout-market-data`, so repeated scans inside the TTL window
//! cost no upstream calls at all.

pub mod cancel;
pub mod candidate;
pub mod criteria;
pub mod errors;
pub mod score;
pub mod source;
pub mod tier;

mod service;

#[cfg(test)]
mod service_tests;

pub use cancel::ScanToken;
pub use candidate::ScannerCandidate;
pub use criteria::{CandidateMetrics, ScanCriteria, ScanKind};
pub use errors::ScannerError;
pub use score::{gap_score, low_float_score, momentum_score, score_for};
pub use source::{CandidateSource, ScreeningApiSource, StaticUniverse, DEFAULT_US_UNIVERSE};
pub use tier::SubscriptionTier;
pub use service::{ScannerService, MAX_SCAN_LIMIT};
