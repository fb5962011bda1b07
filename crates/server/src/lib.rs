//! Karpenter configuration wizard service
//!
//! Serves preset discovery, configuration synthesis, cluster cost
//! analysis and rebalancing guidance over HTTP.

pub mod api;
pub mod config;
pub mod inventory;
