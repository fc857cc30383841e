use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single data point for coin price chart rendering.
///
/// The core generates these; the frontend only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// Sample time (upstream sends milliseconds since the epoch)
    pub timestamp: DateTime<Utc>,

    /// Price rounded to cents
    pub price: f64,

    /// Volume at this sample, whole units (0 when the series was shorter)
    pub volume: f64,

    /// Market cap at this sample, whole units (0 when the series was shorter)
    pub market_cap: f64,
}

/// First-to-last movement over a chart window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub absolute: f64,
    pub percentage: f64,
}
