use crate::models::settings::Settings;

use super::coingecko::CoinGeckoProvider;
use super::mock::MockMarketProvider;
use super::traits::MarketDataProvider;

/// Ordered list of market data providers.
///
/// Callers try providers in registration order and fall through to the
/// next one on failure. Degraded mode is just the demo snapshot
/// registered last, so it is only reached when everything live failed.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn MarketDataProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the default providers for `settings`.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();

        // CoinGecko: works without a key, a key only raises rate limits
        registry.register(Box::new(CoinGeckoProvider::new(settings)));

        if settings.degraded_mode {
            registry.register(Box::new(MockMarketProvider::new()));
        }

        registry
    }

    /// Register a new provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn MarketDataProvider>) {
        self.providers.push(provider);
    }

    /// All providers, ordered by registration priority.
    pub fn providers(&self) -> impl Iterator<Item = &dyn MarketDataProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn names(&self) -> Vec<String> {
        self.providers().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
