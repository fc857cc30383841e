use chrono::DateTime;

use crate::models::chart::{ChartDataPoint, PriceChange};
use crate::models::coin::PriceHistory;

/// Turns raw price history into chart-ready points.
///
/// The upstream series are parallel `[timestamp_ms, value]` arrays. Prices
/// drive the x-axis; volume and market cap are matched by index and default
/// to 0 when their series is shorter.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// One point per price sample. Samples with an unrepresentable
    /// timestamp are skipped.
    pub fn chart_points(&self, history: &PriceHistory) -> Vec<ChartDataPoint> {
        history
            .prices
            .iter()
            .enumerate()
            .filter_map(|(idx, &[timestamp_ms, price])| {
                let timestamp = DateTime::from_timestamp_millis(timestamp_ms as i64)?;
                let volume = history.total_volumes.get(idx).map_or(0.0, |v| v[1]);
                let market_cap = history.market_caps.get(idx).map_or(0.0, |v| v[1]);
                Some(ChartDataPoint {
                    timestamp,
                    price: round_to(price, 2),
                    volume: volume.round(),
                    market_cap: market_cap.round(),
                })
            })
            .collect()
    }

    /// Movement from the first to the last point; 0% when the window starts at 0.
    pub fn price_change(&self, points: &[ChartDataPoint]) -> PriceChange {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return PriceChange::default();
        };
        let absolute = last.price - first.price;
        let percentage = if first.price > 0.0 {
            absolute / first.price * 100.0
        } else {
            0.0
        };
        PriceChange {
            absolute,
            percentage,
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
