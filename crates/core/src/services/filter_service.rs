use std::cmp::Ordering;

use crate::models::coin::Coin;
use crate::models::favorites::Favorites;
use crate::models::query::{CoinQuery, SortKey, TrendFilter};

/// Number of coins in each market overview column.
pub const OVERVIEW_SIZE: usize = 5;

/// Derives display-ordered views of a coin listing.
///
/// Every function here borrows the listing and returns a fresh `Vec`;
/// the input is never reordered. All sorts are stable, so coins with equal
/// keys keep their listing order.
pub struct FilterService;

impl FilterService {
    pub fn new() -> Self {
        Self
    }

    /// Search, trend-filter and sort `coins` according to `query`.
    pub fn apply(&self, coins: &[Coin], query: &CoinQuery) -> Vec<Coin> {
        let needle = query.search.to_lowercase();

        let mut filtered: Vec<Coin> = coins
            .iter()
            .filter(|c| Self::matches_search(c, &needle))
            .filter(|c| Self::matches_trend(c, query.trend))
            .cloned()
            .collect();

        match query.sort {
            SortKey::MarketCap => filtered.sort_by(|a, b| descending(a.market_cap, b.market_cap)),
            SortKey::CurrentPrice => {
                filtered.sort_by(|a, b| descending(a.current_price, b.current_price))
            }
        }

        filtered
    }

    /// The favourites page: restrict to favourite ids, then apply `query`.
    pub fn favorite_coins(&self, coins: &[Coin], favorites: &Favorites, query: &CoinQuery) -> Vec<Coin> {
        if favorites.is_empty() {
            return Vec::new();
        }
        let favorite: Vec<Coin> = coins
            .iter()
            .filter(|c| favorites.contains(&c.id))
            .cloned()
            .collect();
        self.apply(&favorite, query)
    }

    /// Build the three overview columns shown above the listing.
    pub fn market_overview(&self, coins: &[Coin], size: usize) -> MarketOverview {
        MarketOverview {
            top_gainers: Self::top_by(coins, size, |a, b| descending(a.change_24h(), b.change_24h())),
            top_losers: Self::top_by(coins, size, |a, b| descending(b.change_24h(), a.change_24h())),
            top_by_volume: Self::top_by(coins, size, |a, b| descending(a.total_volume, b.total_volume)),
        }
    }

    /// Empty needle matches everything.
    fn matches_search(coin: &Coin, needle: &str) -> bool {
        needle.is_empty()
            || coin.name.to_lowercase().contains(needle)
            || coin.symbol.to_lowercase().contains(needle)
    }

    /// Zero change belongs to neither `Positive` nor `Negative`.
    fn matches_trend(coin: &Coin, trend: TrendFilter) -> bool {
        match trend {
            TrendFilter::All => true,
            TrendFilter::Positive => coin.change_24h() > 0.0,
            TrendFilter::Negative => coin.change_24h() < 0.0,
        }
    }

    fn top_by<F>(coins: &[Coin], size: usize, compare: F) -> Vec<Coin>
    where
        F: FnMut(&Coin, &Coin) -> Ordering,
    {
        let mut sorted = coins.to_vec();
        sorted.sort_by(compare);
        sorted.truncate(size);
        sorted
    }
}

/// Larger keys first, with `-0.0` and `0.0` tied (adding 0.0 turns -0.0 into 0.0).
fn descending(a: f64, b: f64) -> Ordering {
    (b + 0.0).total_cmp(&(a + 0.0))
}

impl Default for FilterService {
    fn default() -> Self {
        Self::new()
    }
}

/// Top movers and most traded coins of a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketOverview {
    pub top_gainers: Vec<Coin>,
    pub top_losers: Vec<Coin>,
    pub top_by_volume: Vec<Coin>,
}
