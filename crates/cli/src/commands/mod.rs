//! Command implementations

pub mod cluster;
pub mod costs;
pub mod generate;
pub mod presets;
pub mod rebalance;
