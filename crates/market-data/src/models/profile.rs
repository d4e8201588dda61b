use serde::{Deserialize, Serialize};

/// Company profile data for a symbol.
///
/// Profiles change rarely, so they carry the longest cache TTL. Fields the
/// upstream omits default to zero/empty rather than failing the fetch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Ticker symbol this profile describes
    pub symbol: String,

    /// Company name (e.g., "Apple Inc")
    pub name: String,

    /// Listing exchange
    pub exchange: String,

    /// Industry classification
    pub industry: String,

    /// Market capitalization, in millions (upstream units)
    pub market_cap: f64,

    /// Shares outstanding, in millions (upstream units).
    /// Used as the float proxy for scanner eligibility.
    pub shares_outstanding: f64,

    /// Country of domicile
    pub country: String,

    /// Quote currency
    pub currency: String,

    /// Logo image URL
    pub logo_url: String,

    /// Company website URL
    pub web_url: String,

    /// IPO date as reported upstream (YYYY-MM-DD, may be empty)
    pub ipo_date: String,
}

impl CompanyProfile {
    /// Approximate float, in absolute shares.
    ///
    /// The upstream reports shares outstanding in millions; eligibility
    /// thresholds are expressed in shares, so convert here.
    pub fn float_shares(&self) -> f64 {
        self.shares_outstanding * 1_000_000.0
    }

    /// A profile with no name or shares is treated as absent data.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.shares_outstanding == 0.0
    }
}
