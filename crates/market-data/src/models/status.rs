use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Open/closed state of an exchange.
///
/// Short TTL: the state flips at session boundaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketStatus {
    /// Exchange code (e.g., "US")
    pub exchange: String,

    /// Whether the exchange is currently in a trading session
    pub is_open: bool,

    /// Session label ("pre-market", "market", "post-market", "closed")
    pub session: String,

    /// Exchange timezone (e.g., "America/New_York")
    pub timezone: String,

    /// When this status was observed
    pub checked_at: DateTime<Utc>,
}
