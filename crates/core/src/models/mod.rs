pub mod cache;
pub mod chart;
pub mod coin;
pub mod favorites;
pub mod holding;
pub mod portfolio;
pub mod query;
pub mod settings;
