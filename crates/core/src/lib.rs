pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use models::{
    chart::ChartDataPoint,
    coin::{Coin, CoinDetails},
    favorites::Favorites,
    holding::Holding,
    portfolio::{HoldingPerformance, Portfolio, PortfolioStats},
    query::CoinQuery,
    settings::Settings,
};
use providers::registry::ProviderRegistry;
use services::{
    chart_service::ChartService,
    favorites_service::FavoritesService,
    filter_service::{FilterService, MarketOverview, OVERVIEW_SIZE},
    market_service::MarketService,
    portfolio_service::PortfolioService,
};
use std::collections::HashMap;
use storage::backend::{KeyValueStore, MemoryStore};
use storage::manager::StorageManager;

use errors::CoreError;

/// Main entry point for the Crypto Tracker core library.
///
/// Constructed once at application start and handed to the views by
/// reference. Owns the persisted state (holdings, favourites, settings)
/// and all services that operate on it. Every committed mutation is
/// written back to the store right away; a failed write is logged and the
/// in-memory state stays authoritative for the session.
#[must_use]
pub struct CryptoTracker {
    store: Box<dyn KeyValueStore>,
    portfolio: Portfolio,
    favorites: Favorites,
    settings: Settings,
    portfolio_service: PortfolioService,
    favorites_service: FavoritesService,
    filter_service: FilterService,
    chart_service: ChartService,
    market_service: MarketService,
    /// False once a caller supplied its own providers; settings changes
    /// then leave the provider set alone.
    default_providers: bool,
}

impl std::fmt::Debug for CryptoTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoTracker")
            .field("holdings", &self.portfolio.len())
            .field("favorites", &self.favorites.len())
            .field("settings", &self.settings)
            .field("providers", &self.market_service.provider_names())
            .finish()
    }
}

impl CryptoTracker {
    /// Fresh tracker backed by an in-memory store (nothing survives the process).
    pub fn create_new() -> Self {
        Self::open(Box::new(MemoryStore::new()))
    }

    /// Load state from `store` and use the default providers for the stored settings.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let settings = StorageManager::load_settings(&*store);
        let registry = ProviderRegistry::new_with_defaults(&settings);
        Self::build(store, settings, registry, true)
    }

    /// Load state from `store` but fetch market data through `registry`.
    pub fn open_with_registry(store: Box<dyn KeyValueStore>, registry: ProviderRegistry) -> Self {
        let settings = StorageManager::load_settings(&*store);
        Self::build(store, settings, registry, false)
    }

    /// Open a directory-backed store (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_dir(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let store = storage::backend::FileStore::open(path)?;
        Ok(Self::open(Box::new(store)))
    }

    fn build(
        store: Box<dyn KeyValueStore>,
        settings: Settings,
        registry: ProviderRegistry,
        default_providers: bool,
    ) -> Self {
        let portfolio = StorageManager::load_portfolio(&*store);
        let favorites = StorageManager::load_favorites(&*store);
        log::debug!(
            "Loaded {} holdings and {} favourites",
            portfolio.len(),
            favorites.len()
        );
        let market_service = MarketService::new(registry, settings.cache_ttl_secs, settings.retries);
        Self {
            store,
            portfolio,
            favorites,
            settings,
            portfolio_service: PortfolioService::new(),
            favorites_service: FavoritesService::new(),
            filter_service: FilterService::new(),
            chart_service: ChartService::new(),
            market_service,
            default_providers,
        }
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Add units of `coin` bought at `unit_price`, merging into an existing
    /// holding with a weighted-average cost. Returns the holding id.
    pub fn add_holding(&mut self, coin: &Coin, quantity: f64, unit_price: f64) -> Result<String, CoreError> {
        let id = self
            .portfolio_service
            .add_holding(&mut self.portfolio, coin, quantity, unit_price)?;
        self.persist_portfolio();
        Ok(id)
    }

    /// Remove a holding. Unknown ids are ignored; returns whether anything was removed.
    pub fn remove_holding(&mut self, holding_id: &str) -> bool {
        let removed = self
            .portfolio_service
            .remove_holding(&mut self.portfolio, holding_id);
        if removed {
            self.persist_portfolio();
        }
        removed
    }

    /// Overwrite quantity and average cost of a holding.
    pub fn update_holding(&mut self, holding_id: &str, quantity: f64, unit_price: f64) -> Result<(), CoreError> {
        self.portfolio_service
            .update_holding(&mut self.portfolio, holding_id, quantity, unit_price)?;
        self.persist_portfolio();
        Ok(())
    }

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.portfolio.holdings
    }

    #[must_use]
    pub fn get_holding(&self, holding_id: &str) -> Option<&Holding> {
        self.portfolio.get(holding_id)
    }

    /// Aggregate valuation against a caller-supplied price map.
    #[must_use]
    pub fn compute_stats(&self, prices: &HashMap<String, f64>) -> PortfolioStats {
        self.portfolio_service.compute_stats(&self.portfolio, prices)
    }

    #[must_use]
    pub fn holding_performance(&self, prices: &HashMap<String, f64>) -> Vec<HoldingPerformance> {
        self.portfolio_service
            .holding_performance(&self.portfolio, prices)
    }

    /// Price map from the market listing.
    ///
    /// Never fails: when the feed is unreachable the last cached listing is
    /// used, and with no cache every coin values at 0.
    pub async fn live_prices(&mut self) -> HashMap<String, f64> {
        match self.market_service.get_coins(false).await {
            Ok(coins) => MarketService::price_map(&coins),
            Err(e) => {
                log::warn!("Live prices unavailable, valuing from cache: {e}");
                MarketService::price_map(self.market_service.cached_coins())
            }
        }
    }

    /// Fetch live prices and value the portfolio against them.
    pub async fn portfolio_stats_live(&mut self) -> PortfolioStats {
        let prices = self.live_prices().await;
        self.compute_stats(&prices)
    }

    // ── Favourites ──────────────────────────────────────────────────

    #[must_use]
    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    #[must_use]
    pub fn is_favorite(&self, coin_id: &str) -> bool {
        self.favorites.contains(coin_id)
    }

    pub fn add_favorite(&mut self, coin_id: &str) -> bool {
        let changed = self.favorites_service.add(&mut self.favorites, coin_id);
        if changed {
            self.persist_favorites();
        }
        changed
    }

    pub fn remove_favorite(&mut self, coin_id: &str) -> bool {
        let changed = self.favorites_service.remove(&mut self.favorites, coin_id);
        if changed {
            self.persist_favorites();
        }
        changed
    }

    /// Flip a coin's favourite flag. Returns whether it is a favourite afterwards.
    pub fn toggle_favorite(&mut self, coin_id: &str) -> bool {
        let now_favorite = self.favorites_service.toggle(&mut self.favorites, coin_id);
        self.persist_favorites();
        now_favorite
    }

    // ── Market data ─────────────────────────────────────────────────

    /// Market listing, cached for the configured TTL.
    pub async fn coins(&mut self, force_refresh: bool) -> Result<Vec<Coin>, CoreError> {
        self.market_service.get_coins(force_refresh).await
    }

    /// Market listing narrowed and ordered by `query`.
    pub async fn filtered_coins(&mut self, query: &CoinQuery) -> Result<Vec<Coin>, CoreError> {
        let coins = self.coins(false).await?;
        Ok(self.filter_service.apply(&coins, query))
    }

    /// Favourite coins narrowed and ordered by `query`.
    pub async fn favorite_coins(&mut self, query: &CoinQuery) -> Result<Vec<Coin>, CoreError> {
        let coins = self.coins(false).await?;
        Ok(self
            .filter_service
            .favorite_coins(&coins, &self.favorites, query))
    }

    /// Top gainers, losers and most traded coins of the current listing.
    pub async fn market_overview(&mut self) -> Result<MarketOverview, CoreError> {
        let coins = self.coins(false).await?;
        Ok(self.filter_service.market_overview(&coins, OVERVIEW_SIZE))
    }

    pub async fn coin_detail(&self, coin_id: &str) -> Result<CoinDetails, CoreError> {
        self.market_service.get_coin_detail(coin_id).await
    }

    /// Chart points for a coin over the last `days` days.
    pub async fn price_chart(&self, coin_id: &str, days: u32) -> Result<Vec<ChartDataPoint>, CoreError> {
        let history = self.market_service.get_price_history(coin_id, days).await?;
        Ok(self.chart_service.chart_points(&history))
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace and persist the settings. Unlike holdings, a failed write is
    /// returned: the user is looking at a settings form and can retry.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), CoreError> {
        StorageManager::save_settings(&*self.store, &settings)?;
        self.market_service
            .configure(settings.cache_ttl_secs, settings.retries);
        if self.default_providers {
            self.market_service
                .replace_registry(ProviderRegistry::new_with_defaults(&settings));
        }
        self.settings = settings;
        Ok(())
    }

    // ── Persistence ─────────────────────────────────────────────────

    fn persist_portfolio(&self) {
        if let Err(e) = StorageManager::save_portfolio(&*self.store, &self.portfolio) {
            log::warn!("Portfolio change not saved, it will be lost on reload: {e}");
        }
    }

    fn persist_favorites(&self) {
        if let Err(e) = StorageManager::save_favorites(&*self.store, &self.favorites) {
            log::warn!("Favourites change not saved, it will be lost on reload: {e}");
        }
    }
}
