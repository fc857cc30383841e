pub mod chart_service;
pub mod favorites_service;
pub mod filter_service;
pub mod market_service;
pub mod portfolio_service;
