use chrono::Utc;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::cache::CoinCache;
use crate::models::coin::{Coin, CoinDetails, PriceHistory};
use crate::providers::registry::ProviderRegistry;
use crate::providers::traits::MarketDataProvider;

/// Fetches market data from the registered providers with caching,
/// retries and fallback.
///
/// - **Listing**: served from memory while younger than the TTL; refetched
///   on expiry or on explicit refresh. Fallback (demo) listings are returned
///   but never cached, so the next call tries the live feed again.
/// - **Details / history**: always fetched. A `NotFound` from a live
///   provider is final; other errors fall through to the next provider.
/// - Each provider gets `retries` extra attempts on retryable errors.
pub struct MarketService {
    registry: ProviderRegistry,
    cache: CoinCache,
    ttl_secs: u64,
    retries: u32,
}

impl MarketService {
    pub fn new(registry: ProviderRegistry, ttl_secs: u64, retries: u32) -> Self {
        Self {
            registry,
            cache: CoinCache::new(),
            ttl_secs,
            retries,
        }
    }

    /// Names of the registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// The last cached listing, if any (may be stale).
    pub fn cached_coins(&self) -> &[Coin] {
        &self.cache.coins
    }

    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Apply new cache/retry limits; the cached listing is dropped.
    pub fn configure(&mut self, ttl_secs: u64, retries: u32) {
        self.ttl_secs = ttl_secs;
        self.retries = retries;
        self.cache.clear();
    }

    /// Swap the provider set, e.g. after the API key or currency changed.
    pub fn replace_registry(&mut self, registry: ProviderRegistry) {
        self.registry = registry;
        self.cache.clear();
    }

    /// Current listing; cached unless `force_refresh` or the TTL expired.
    pub async fn get_coins(&mut self, force_refresh: bool) -> Result<Vec<Coin>, CoreError> {
        let now = Utc::now();
        if !force_refresh && self.cache.is_fresh(now, self.ttl_secs) {
            return Ok(self.cache.coins.clone());
        }

        let mut last_error = None;
        let mut fetched = None;

        'providers: for provider in self.registry.providers() {
            for attempt in 0..=self.retries {
                match provider.list_coins().await {
                    Ok(coins) => {
                        fetched = Some((coins, provider.is_fallback()));
                        break 'providers;
                    }
                    Err(e) => {
                        log::warn!(
                            "{} listing failed (attempt {}): {e}",
                            provider.name(),
                            attempt + 1
                        );
                        let retryable = e.is_retryable();
                        Self::record_error(&mut last_error, provider, e);
                        if !retryable {
                            break;
                        }
                    }
                }
            }
        }

        match fetched {
            Some((coins, true)) => {
                log::info!("Serving demo market data ({} coins)", coins.len());
                Ok(coins)
            }
            Some((coins, false)) => {
                self.cache.store(coins.clone(), now);
                Ok(coins)
            }
            None => Err(last_error.unwrap_or(CoreError::NoProvider)),
        }
    }

    /// Detail record for one coin.
    pub async fn get_coin_detail(&self, coin_id: &str) -> Result<CoinDetails, CoreError> {
        let mut last_error = None;

        for provider in self.registry.providers() {
            for attempt in 0..=self.retries {
                match provider.get_coin_detail(coin_id).await {
                    Ok(details) => return Ok(details),
                    Err(CoreError::NotFound(id)) if !provider.is_fallback() => {
                        return Err(CoreError::NotFound(id));
                    }
                    Err(e) => {
                        log::warn!(
                            "{} details for {coin_id} failed (attempt {}): {e}",
                            provider.name(),
                            attempt + 1
                        );
                        let retryable = e.is_retryable();
                        Self::record_error(&mut last_error, provider, e);
                        if !retryable {
                            break;
                        }
                    }
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Price history for one coin over the last `days` days.
    pub async fn get_price_history(&self, coin_id: &str, days: u32) -> Result<PriceHistory, CoreError> {
        if days == 0 {
            return Err(CoreError::ValidationError(
                "History range must be at least one day".into(),
            ));
        }

        let mut last_error = None;

        for provider in self.registry.providers() {
            for attempt in 0..=self.retries {
                match provider.get_price_history(coin_id, days).await {
                    Ok(history) => return Ok(history),
                    Err(CoreError::NotFound(id)) if !provider.is_fallback() => {
                        return Err(CoreError::NotFound(id));
                    }
                    Err(e) => {
                        log::warn!(
                            "{} history for {coin_id} failed (attempt {}): {e}",
                            provider.name(),
                            attempt + 1
                        );
                        let retryable = e.is_retryable();
                        Self::record_error(&mut last_error, provider, e);
                        if !retryable {
                            break;
                        }
                    }
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Build the `coin id → current price` map the portfolio engine values against.
    ///
    /// Non-finite or negative prices are dropped, so those coins value at 0.
    pub fn price_map(coins: &[Coin]) -> HashMap<String, f64> {
        coins
            .iter()
            .filter(|c| {
                let valid = c.current_price.is_finite() && c.current_price >= 0.0;
                if !valid {
                    log::warn!("Ignoring invalid price {} for {}", c.current_price, c.id);
                }
                valid
            })
            .map(|c| (c.id.clone(), c.current_price))
            .collect()
    }

    /// Keep the most useful error: a fallback's error never replaces a live one.
    fn record_error(slot: &mut Option<CoreError>, provider: &dyn MarketDataProvider, error: CoreError) {
        if slot.is_none() || !provider.is_fallback() {
            *slot = Some(error);
        }
    }
}
