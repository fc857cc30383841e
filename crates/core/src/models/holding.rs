use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coin::Coin;

/// A tracked position in one coin with its weighted-average cost basis.
///
/// The JSON field names (`amount`, `averagePrice`, `dateAdded`) are the
/// persisted layout and must not change, or previously saved portfolios
/// stop loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Unique identifier, generated when the holding is first created
    pub id: String,

    /// Provider identifier of the coin (e.g., "bitcoin"); unique across holdings
    pub coin_id: String,

    /// Display copies captured at first add, never re-synced from live data
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: String,

    /// Cumulative units held (always > 0)
    #[serde(rename = "amount")]
    pub quantity: f64,

    /// Weighted-average purchase price per unit, in the quote currency
    #[serde(rename = "averagePrice")]
    pub average_cost: f64,

    /// Time of the most recent add or update
    #[serde(rename = "dateAdded")]
    pub last_modified: DateTime<Utc>,
}

impl Holding {
    /// Open a new position from a resolved coin record.
    pub fn open(coin: &Coin, quantity: f64, unit_price: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            coin_id: coin.id.clone(),
            symbol: coin.symbol.clone(),
            name: coin.name.clone(),
            image: coin.image.clone(),
            quantity,
            average_cost: unit_price,
            last_modified: Utc::now(),
        }
    }

    /// Total cost paid for the units held.
    pub fn invested_value(&self) -> f64 {
        self.quantity * self.average_cost
    }

    /// Market value of the units held at `price`.
    pub fn value_at(&self, price: f64) -> f64 {
        self.quantity * price
    }
}
