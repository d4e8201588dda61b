use serde::{Deserialize, Serialize};

/// A single news article from the market or company news feeds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Upstream article id (0 when not provided)
    pub id: u64,
    pub headline: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub image: String,
    /// Publication time (Unix seconds)
    pub datetime: i64,
    pub category: String,
    /// Related symbols, comma separated as upstream reports them
    pub related: String,
}
