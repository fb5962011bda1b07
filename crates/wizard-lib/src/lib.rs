//! Configuration wizard core for cluster autoscaler provisioning
//!
//! This crate provides:
//! - The preset catalog and scheduling requirement composition
//! - Synthesis of provisioning policy and node template descriptors
//! - Cost estimation and rebalancing guidance from inventory snapshots
//! - Health checks and observability for the serving layer

pub mod cost;
pub mod descriptor;
pub mod error;
pub mod health;
pub mod inventory;
pub mod observability;
pub mod preset;
pub mod pricing;
pub mod rebalancing;
pub mod requirements;
pub mod synthesizer;

pub use cost::{CostAnalysis, CostEstimator, CostModel};
pub use descriptor::{NodeTemplateDescriptor, ProvisioningPolicy};
pub use error::{WizardError, WizardResult};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use inventory::{NodeInventory, PodInventory};
pub use observability::{StructuredLogger, WizardMetrics};
pub use preset::{Preset, PresetCatalog};
pub use pricing::{PricePair, PriceQuote, PriceSource, StaticPriceTable};
pub use rebalancing::{RebalancingRecommendations, RebalancingSimulation};
pub use requirements::Requirement;
pub use synthesizer::{synthesize, ConfigRequest, GeneratedConfig, Manifests};
