use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// CoinGecko sends `null` for figures it does not track (dead coins, fresh listings).
/// Treat those as zero rather than failing the whole listing.
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// A tradable crypto asset as listed by the market data provider.
///
/// Read-only: the core never mutates a `Coin`, it only filters, sorts
/// and reads prices from it. Field names follow the upstream
/// `/coins/markets` payload so records deserialize without mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Provider identifier, lowercase (e.g., "bitcoin")
    pub id: String,

    /// Ticker symbol as sent upstream, usually lowercase (e.g., "btc")
    pub symbol: String,

    /// Display name (e.g., "Bitcoin")
    pub name: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    #[serde(default, deserialize_with = "null_as_zero")]
    pub current_price: f64,

    #[serde(default, deserialize_with = "null_as_zero")]
    pub market_cap: f64,

    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    /// 24h traded volume
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_volume: f64,

    #[serde(default)]
    pub high_24h: Option<f64>,

    #[serde(default)]
    pub low_24h: Option<f64>,

    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    #[serde(default, alias = "price_change_percentage_7d_in_currency")]
    pub price_change_percentage_7d: Option<f64>,

    #[serde(default, alias = "price_change_percentage_30d_in_currency")]
    pub price_change_percentage_30d: Option<f64>,

    #[serde(default)]
    pub circulating_supply: Option<f64>,

    #[serde(default)]
    pub total_supply: Option<f64>,

    #[serde(default)]
    pub max_supply: Option<f64>,

    #[serde(default)]
    pub last_updated: Option<String>,
}

impl Coin {
    /// Minimal constructor; market figures start at zero.
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            image: String::new(),
            current_price: 0.0,
            market_cap: 0.0,
            market_cap_rank: None,
            total_volume: 0.0,
            high_24h: None,
            low_24h: None,
            price_change_percentage_24h: None,
            price_change_percentage_7d: None,
            price_change_percentage_30d: None,
            circulating_supply: None,
            total_supply: None,
            max_supply: None,
            last_updated: None,
        }
    }

    /// 24h change in percent; a missing figure counts as no change.
    pub fn change_24h(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }
}

/// Text block keyed by language; only English is requested upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinDescription {
    #[serde(default)]
    pub en: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinImages {
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub large: String,
}

/// Market figures of the detail endpoint. Per-currency values are maps
/// keyed by lowercase currency code ("usd", "eur", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinMarketData {
    #[serde(default)]
    pub current_price: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub total_volume: HashMap<String, f64>,
    #[serde(default)]
    pub high_24h: HashMap<String, f64>,
    #[serde(default)]
    pub low_24h: HashMap<String, f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_30d: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub ath: HashMap<String, f64>,
    #[serde(default)]
    pub ath_change_percentage: HashMap<String, f64>,
    #[serde(default)]
    pub ath_date: HashMap<String, String>,
    #[serde(default)]
    pub atl: HashMap<String, f64>,
    #[serde(default)]
    pub atl_change_percentage: HashMap<String, f64>,
    #[serde(default)]
    pub atl_date: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinLinks {
    #[serde(default)]
    pub homepage: Vec<String>,
    #[serde(default)]
    pub blockchain_site: Vec<String>,
    #[serde(default)]
    pub subreddit_url: Option<String>,
    #[serde(default)]
    pub twitter_screen_name: Option<String>,
}

/// Detail record for a single coin (used by the coin-detail view only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetails {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub description: CoinDescription,
    #[serde(default)]
    pub image: CoinImages,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub market_data: CoinMarketData,
    #[serde(default)]
    pub links: CoinLinks,
}

impl CoinDetails {
    /// Current price in `currency` (case-insensitive), if the provider sent one.
    pub fn price_in(&self, currency: &str) -> Option<f64> {
        self.market_data
            .current_price
            .get(&currency.to_lowercase())
            .copied()
    }

    /// Homepage links with the empty placeholders upstream pads the list with removed.
    pub fn homepages(&self) -> Vec<&str> {
        self.links
            .homepage
            .iter()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .collect()
    }
}

/// Raw historical series for a coin: parallel `[timestamp_ms, value]` arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub prices: Vec<[f64; 2]>,
    #[serde(default)]
    pub market_caps: Vec<[f64; 2]>,
    #[serde(default)]
    pub total_volumes: Vec<[f64; 2]>,
}
