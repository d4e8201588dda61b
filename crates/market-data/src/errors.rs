//! Error types for the market data crate.
//!
//! Almost every failure in this crate is absorbed at a module boundary:
//! upstream and cache errors degrade to empty results / cache misses so the
//! request pipeline never crashes on a flaky dependency. The variants here
//! exist for the few places that do need a typed error internally, plus the
//! one class of error that is surfaced to callers: invalid caller input.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The caller asked for a candle resolution outside the supported set.
    /// This is the only error the facade propagates; everything else
    /// degrades to an empty result.
    #[error("Unsupported candle resolution: {0}")]
    InvalidResolution(String),

    /// No upstream API key was configured.
    #[error("FINNHUB_API_KEY is not set")]
    MissingApiKey,

    /// The upstream rate limited the request (HTTP 429).
    #[error("Rate limited by upstream")]
    RateLimited,

    /// The upstream request timed out.
    #[error("Upstream request timed out")]
    Timeout,

    /// Any other upstream transport or HTTP failure.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The upstream returned a payload we could not parse.
    #[error("Malformed upstream payload: {0}")]
    MalformedPayload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MarketDataError::InvalidResolution("2h".to_string());
        assert_eq!(format!("{}", error), "Unsupported candle resolution: 2h");

        let error = MarketDataError::Upstream("HTTP 500".to_string());
        assert_eq!(format!("{}", error), "Upstream error: HTTP 500");
    }
}
