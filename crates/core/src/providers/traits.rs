use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::coin::{Coin, CoinDetails, PriceHistory};

/// Trait abstraction for market data sources.
///
/// The portfolio engine never talks to a provider directly; the facade
/// fetches listings through this trait and hands the engine a plain
/// price map. Swapping the upstream API means adding one implementation.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fallback sources serve stand-in data. Their results are never cached
    /// and their errors never hide a live provider's error.
    fn is_fallback(&self) -> bool {
        false
    }

    /// Current market listing, ordered by market cap as the provider ranks it.
    async fn list_coins(&self) -> Result<Vec<Coin>, CoreError>;

    /// Full detail record for one coin. Unknown ids fail with `CoreError::NotFound`.
    async fn get_coin_detail(&self, coin_id: &str) -> Result<CoinDetails, CoreError>;

    /// Price, market cap and volume series over the last `days` days.
    async fn get_price_history(&self, coin_id: &str, days: u32) -> Result<PriceHistory, CoreError>;
}
