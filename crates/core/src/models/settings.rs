use serde::{Deserialize, Serialize};

/// Largest page size the markets endpoint accepts.
pub const MAX_PER_PAGE: u32 = 250;

/// User-configurable settings, persisted next to the portfolio.
///
/// Every field has a default so settings written by older versions
/// (or hand-edited files missing keys) still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Quote currency for all prices (lowercase, e.g., "usd")
    pub vs_currency: String,

    /// Number of coins fetched for the market listing
    pub per_page: u32,

    /// Change windows requested alongside the listing (e.g., "24h,7d,30d")
    pub price_change_windows: String,

    /// Serve the built-in demo snapshot when every live provider fails
    pub degraded_mode: bool,

    /// Optional CoinGecko key. Keys starting with `CG-` are demo keys.
    pub api_key: Option<String>,

    /// How long a fetched listing is served from memory
    pub cache_ttl_secs: u64,

    /// Extra attempts per provider before falling through to the next one
    pub retries: u32,

    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            per_page: 50,
            price_change_windows: "24h,7d,30d".to_string(),
            degraded_mode: true,
            api_key: None,
            cache_ttl_secs: 300,
            retries: 1,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Page size clamped to what the provider accepts.
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }
}
