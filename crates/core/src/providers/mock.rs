use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::coin::{Coin, CoinDetails, PriceHistory};
use super::traits::MarketDataProvider;

/// Static demo listing served in degraded mode when every live provider fails.
///
/// Only the listing is available; details and history report `NotFound`
/// so the detail view shows its regular error state instead of fake charts.
pub struct MockMarketProvider {
    coins: Vec<Coin>,
}

impl MockMarketProvider {
    pub fn new() -> Self {
        Self {
            coins: demo_coins(),
        }
    }

    /// Serve a custom snapshot instead of the built-in one.
    pub fn with_coins(coins: Vec<Coin>) -> Self {
        Self { coins }
    }
}

impl Default for MockMarketProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_coin(
    id: &str,
    symbol: &str,
    name: &str,
    image: &str,
    rank: u32,
    price: f64,
    market_cap: f64,
    volume: f64,
    (low, high): (f64, f64),
    change_24h: f64,
    (circulating, total, max): (f64, Option<f64>, Option<f64>),
) -> Coin {
    Coin {
        image: image.to_string(),
        current_price: price,
        market_cap,
        market_cap_rank: Some(rank),
        total_volume: volume,
        high_24h: Some(high),
        low_24h: Some(low),
        price_change_percentage_24h: Some(change_24h),
        circulating_supply: Some(circulating),
        total_supply: total,
        max_supply: max,
        ..Coin::new(id, symbol, name)
    }
}

/// The three-coin snapshot used when the market feed is unreachable.
pub fn demo_coins() -> Vec<Coin> {
    vec![
        demo_coin(
            "bitcoin",
            "btc",
            "Bitcoin",
            "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            1,
            45_000.0,
            850_000_000_000.0,
            25_000_000_000.0,
            (44_000.0, 46_000.0),
            2.5,
            (19_800_000.0, Some(21_000_000.0), Some(21_000_000.0)),
        ),
        demo_coin(
            "ethereum",
            "eth",
            "Ethereum",
            "https://assets.coingecko.com/coins/images/279/large/ethereum.png",
            2,
            3_000.0,
            360_000_000_000.0,
            15_000_000_000.0,
            (2_950.0, 3_050.0),
            -1.2,
            (120_000_000.0, Some(120_000_000.0), None),
        ),
        demo_coin(
            "tether",
            "usdt",
            "Tether",
            "https://assets.coingecko.com/coins/images/325/large/Tether.png",
            3,
            1.0,
            95_000_000_000.0,
            45_000_000_000.0,
            (0.998, 1.002),
            0.1,
            (95_000_000_000.0, Some(95_000_000_000.0), None),
        ),
    ]
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for MockMarketProvider {
    fn name(&self) -> &str {
        "Demo snapshot"
    }

    fn is_fallback(&self) -> bool {
        true
    }

    async fn list_coins(&self) -> Result<Vec<Coin>, CoreError> {
        Ok(self.coins.clone())
    }

    async fn get_coin_detail(&self, coin_id: &str) -> Result<CoinDetails, CoreError> {
        Err(CoreError::NotFound(coin_id.to_string()))
    }

    async fn get_price_history(&self, coin_id: &str, _days: u32) -> Result<PriceHistory, CoreError> {
        Err(CoreError::NotFound(coin_id.to_string()))
    }
}
