use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// The holding collection owned by the portfolio engine.
///
/// Serialized as a bare JSON array of holdings, so the stored value is
/// exactly the persisted list and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    /// Holdings in insertion order; at most one per `coin_id`
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn get(&self, holding_id: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.id == holding_id)
    }

    pub fn find_by_coin(&self, coin_id: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.coin_id == coin_id)
    }

    /// Distinct coin ids held, in holding order. Useful to scope price lookups.
    pub fn coin_ids(&self) -> Vec<&str> {
        self.holdings.iter().map(|h| h.coin_id.as_str()).collect()
    }
}

/// Aggregate valuation of the portfolio against a live price map.
///
/// Derived on demand and never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    /// Sum of quantity × live price
    pub total_value: f64,

    /// Sum of quantity × average cost
    pub total_invested: f64,

    /// total_value - total_invested
    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,

    /// (total_pnl / total_invested) × 100, or exactly 0 when nothing is invested
    #[serde(rename = "totalPnLPercentage")]
    pub total_pnl_percentage: f64,
}

/// Per-holding breakdown shown next to each row of the portfolio table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingPerformance {
    pub holding_id: String,
    pub coin_id: String,
    pub symbol: String,
    pub quantity: f64,
    pub average_cost: f64,

    /// Live price used for the valuation (0 when the feed had none)
    pub current_price: f64,
    pub current_value: f64,
    pub invested_value: f64,
    pub pnl: f64,
    pub pnl_percentage: f64,

    /// Share of the portfolio's current value, in percent
    pub allocation_pct: f64,
}
