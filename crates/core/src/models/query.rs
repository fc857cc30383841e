use serde::{Deserialize, Serialize};

/// Classification of coins by their 24h price change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendFilter {
    /// No filtering
    #[default]
    All,
    /// 24h change strictly above zero
    Positive,
    /// 24h change strictly below zero
    Negative,
}

impl std::fmt::Display for TrendFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendFilter::All => write!(f, "all"),
            TrendFilter::Positive => write!(f, "positive"),
            TrendFilter::Negative => write!(f, "negative"),
        }
    }
}

/// Sort key for coin listings. Both keys sort descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    MarketCap,
    CurrentPrice,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::MarketCap => write!(f, "market_cap"),
            SortKey::CurrentPrice => write!(f, "current_price"),
        }
    }
}

/// User-controlled view parameters for a coin list.
///
/// `search` is expected to be already debounced by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinQuery {
    /// Case-insensitive substring of name or symbol; empty matches everything
    #[serde(default)]
    pub search: String,

    #[serde(default)]
    pub trend: TrendFilter,

    #[serde(default)]
    pub sort: SortKey,
}

impl CoinQuery {
    pub fn new(search: impl Into<String>, trend: TrendFilter, sort: SortKey) -> Self {
        Self {
            search: search.into(),
            trend,
            sort,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_trend(mut self, trend: TrendFilter) -> Self {
        self.trend = trend;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}
