pub mod registry;
pub mod traits;

// Provider implementations
pub mod coingecko;
pub mod mock;
