use chrono::{DateTime, Utc};

use super::coin::Coin;

/// In-memory copy of the last live market listing.
///
/// Lives for the session only; listings go stale within minutes so there
/// is nothing worth persisting.
#[derive(Debug, Clone, Default)]
pub struct CoinCache {
    pub coins: Vec<Coin>,

    /// When `coins` was fetched; `None` until the first successful fetch
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CoinCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the listing is younger than `ttl_secs`. A zero TTL disables caching.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl_secs: u64) -> bool {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        self.fetched_at
            .is_some_and(|at| ttl > 0 && (now - at).num_seconds() < ttl)
    }

    pub fn store(&mut self, coins: Vec<Coin>, now: DateTime<Utc>) {
        self.coins = coins;
        self.fetched_at = Some(now);
    }

    pub fn clear(&mut self) {
        self.coins.clear();
        self.fetched_at = None;
    }
}
