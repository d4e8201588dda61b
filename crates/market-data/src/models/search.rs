use serde::{Deserialize, Serialize};

/// Result from a symbol search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolSearchResult {
    /// Symbol for API calls (e.g., "AAPL")
    pub symbol: String,

    /// Full description/name (e.g., "Apple Inc")
    pub description: String,

    /// Human-facing display symbol
    pub display_symbol: String,

    /// Security type (e.g., "Common Stock", "ETF")
    pub security_type: String,
}

impl SymbolSearchResult {
    pub fn new(
        symbol: impl Into<String>,
        description: impl Into<String>,
        display_symbol: impl Into<String>,
        security_type: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            description: description.into(),
            display_symbol: display_symbol.into(),
            security_type: security_type.into(),
        }
    }
}
