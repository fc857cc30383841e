use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CoreError;
use crate::models::favorites::Favorites;
use crate::models::portfolio::Portfolio;
use crate::models::settings::Settings;
use crate::services::portfolio_service::PortfolioService;

use super::backend::KeyValueStore;

/// Storage key of the holding list.
pub const PORTFOLIO_KEY: &str = "crypto-portfolio";

/// Storage key of the favourite coin ids.
pub const FAVORITES_KEY: &str = "crypto-favorites";

pub const SETTINGS_KEY: &str = "crypto-settings";

/// High-level storage operations: load/save app state as JSON under fixed keys.
///
/// Loading never fails: a missing key yields the default value and an
/// unreadable or corrupt value is logged and replaced by the default, so a
/// damaged store can't keep the app from starting. Saving returns errors;
/// the caller decides whether they are fatal.
pub struct StorageManager;

impl StorageManager {
    /// Stored rows are normalized: one holding per coin, invalid rows dropped.
    pub fn load_portfolio(store: &dyn KeyValueStore) -> Portfolio {
        let mut portfolio: Portfolio = Self::load_or_default(store, PORTFOLIO_KEY);
        PortfolioService::new().normalize(&mut portfolio);
        portfolio
    }

    /// Flow: Portfolio → JSON array of holdings → store[`crypto-portfolio`]
    pub fn save_portfolio(store: &dyn KeyValueStore, portfolio: &Portfolio) -> Result<(), CoreError> {
        Self::save(store, PORTFOLIO_KEY, portfolio)
    }

    pub fn load_favorites(store: &dyn KeyValueStore) -> Favorites {
        let mut favorites: Favorites = Self::load_or_default(store, FAVORITES_KEY);
        // Hand-edited or older data may carry duplicates; keep the first occurrence.
        let mut seen = std::collections::HashSet::new();
        favorites.coin_ids.retain(|id| seen.insert(id.clone()));
        favorites
    }

    pub fn save_favorites(store: &dyn KeyValueStore, favorites: &Favorites) -> Result<(), CoreError> {
        Self::save(store, FAVORITES_KEY, favorites)
    }

    pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
        Self::load_or_default(store, SETTINGS_KEY)
    }

    pub fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> Result<(), CoreError> {
        Self::save(store, SETTINGS_KEY, settings)
    }

    /// Strict variant of the loaders: surfaces missing backends and corrupt data.
    pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, CoreError> {
        let Some(raw) = store.get(key)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw)
            .map_err(|e| CoreError::Deserialization(format!("Failed to parse {key}: {e}")))?;
        Ok(Some(value))
    }

    pub fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), CoreError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize {key}: {e}")))?;
        store.set(key, &raw)
    }

    fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
        match Self::load(store, key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("Could not load {key}, starting empty: {e}");
                T::default()
            }
        }
    }
}
