use chrono::Utc;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::coin::Coin;
use crate::models::holding::Holding;
use crate::models::portfolio::{HoldingPerformance, Portfolio, PortfolioStats};

/// Maintains holdings with weighted-average cost accounting and values them
/// against a live price map.
///
/// Pure business logic: no I/O, no API calls. Persistence is the caller's
/// job once a mutation has been committed.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Add units of `coin` bought at `unit_price`.
    ///
    /// Opens a new holding for an unseen coin, otherwise merges into the
    /// existing one:
    /// `new_avg = (q_old * avg_old + q_added * unit_price) / (q_old + q_added)`.
    /// Returns the id of the created or updated holding.
    pub fn add_holding(
        &self,
        portfolio: &mut Portfolio,
        coin: &Coin,
        quantity: f64,
        unit_price: f64,
    ) -> Result<String, CoreError> {
        Self::validate(quantity, unit_price)?;

        if let Some(existing) = portfolio.holdings.iter_mut().find(|h| h.coin_id == coin.id) {
            Self::merge(existing, quantity, unit_price);
            existing.last_modified = Utc::now();
            return Ok(existing.id.clone());
        }

        let holding = Holding::open(coin, quantity, unit_price);
        let id = holding.id.clone();
        portfolio.holdings.push(holding);
        Ok(id)
    }

    /// Remove a holding by id. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub fn remove_holding(&self, portfolio: &mut Portfolio, holding_id: &str) -> bool {
        let before = portfolio.holdings.len();
        portfolio.holdings.retain(|h| h.id != holding_id);
        portfolio.holdings.len() != before
    }

    /// Overwrite quantity and average cost of a holding (corrections, not accumulation).
    pub fn update_holding(
        &self,
        portfolio: &mut Portfolio,
        holding_id: &str,
        quantity: f64,
        unit_price: f64,
    ) -> Result<(), CoreError> {
        Self::validate(quantity, unit_price)?;

        let holding = portfolio
            .holdings
            .iter_mut()
            .find(|h| h.id == holding_id)
            .ok_or_else(|| CoreError::HoldingNotFound(holding_id.to_string()))?;

        holding.quantity = quantity;
        holding.average_cost = unit_price;
        holding.last_modified = Utc::now();
        Ok(())
    }

    /// Aggregate valuation against `prices` (coin id → current price).
    ///
    /// A coin missing from the map is valued at 0. The percentage is
    /// exactly 0 when nothing is invested.
    pub fn compute_stats(&self, portfolio: &Portfolio, prices: &HashMap<String, f64>) -> PortfolioStats {
        let mut total_value = 0.0;
        let mut total_invested = 0.0;

        for holding in &portfolio.holdings {
            total_value += holding.value_at(Self::price_of(prices, &holding.coin_id));
            total_invested += holding.invested_value();
        }

        let total_pnl = total_value - total_invested;
        PortfolioStats {
            total_value,
            total_invested,
            total_pnl,
            total_pnl_percentage: Self::percentage(total_pnl, total_invested),
        }
    }

    /// Per-holding valuation, in holding order.
    pub fn holding_performance(
        &self,
        portfolio: &Portfolio,
        prices: &HashMap<String, f64>,
    ) -> Vec<HoldingPerformance> {
        let total_value: f64 = portfolio
            .holdings
            .iter()
            .map(|h| h.value_at(Self::price_of(prices, &h.coin_id)))
            .sum();

        portfolio
            .holdings
            .iter()
            .map(|h| {
                let current_price = Self::price_of(prices, &h.coin_id);
                let current_value = h.value_at(current_price);
                let invested_value = h.invested_value();
                let pnl = current_value - invested_value;
                HoldingPerformance {
                    holding_id: h.id.clone(),
                    coin_id: h.coin_id.clone(),
                    symbol: h.symbol.clone(),
                    quantity: h.quantity,
                    average_cost: h.average_cost,
                    current_price,
                    current_value,
                    invested_value,
                    pnl,
                    pnl_percentage: Self::percentage(pnl, invested_value),
                    allocation_pct: Self::percentage(current_value, total_value),
                }
            })
            .collect()
    }

    /// Repair a portfolio read from storage.
    ///
    /// Rows with an invalid quantity or cost are dropped. Further rows for an
    /// already seen coin are folded into the first one with the same
    /// weighted-average rule as `add_holding`. Returns the number of rows removed.
    pub fn normalize(&self, portfolio: &mut Portfolio) -> usize {
        let rows = std::mem::take(&mut portfolio.holdings);
        let before = rows.len();

        for row in rows {
            if let Err(e) = Self::validate(row.quantity, row.average_cost) {
                log::warn!("Dropping stored holding {} ({}): {e}", row.id, row.coin_id);
                continue;
            }
            match portfolio.holdings.iter_mut().find(|h| h.coin_id == row.coin_id) {
                Some(first) => {
                    log::warn!(
                        "Folding duplicate holding {} into {} for {}",
                        row.id,
                        first.id,
                        row.coin_id
                    );
                    Self::merge(first, row.quantity, row.average_cost);
                    first.last_modified = first.last_modified.max(row.last_modified);
                }
                None => portfolio.holdings.push(row),
            }
        }

        before - portfolio.holdings.len()
    }

    fn merge(existing: &mut Holding, quantity: f64, unit_price: f64) {
        let total_cost = existing.invested_value() + quantity * unit_price;
        let new_quantity = existing.quantity + quantity;
        existing.average_cost = total_cost / new_quantity;
        existing.quantity = new_quantity;
    }

    /// Engine-side guard: quantity must be positive and price non-negative,
    /// both finite. Checked before any state is touched.
    fn validate(quantity: f64, unit_price: f64) -> Result<(), CoreError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Quantity must be a positive number, got {quantity}"
            )));
        }
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Unit price must be zero or positive, got {unit_price}"
            )));
        }
        Ok(())
    }

    fn price_of(prices: &HashMap<String, f64>, coin_id: &str) -> f64 {
        prices.get(coin_id).copied().unwrap_or(0.0)
    }

    /// `part / whole × 100`, or 0 when `whole` is not positive.
    fn percentage(part: f64, whole: f64) -> f64 {
        if whole > 0.0 {
            part / whole * 100.0
        } else {
            0.0
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
