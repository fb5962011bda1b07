//! Karp Wizard - Karpenter configuration wizard service
//!
//! Generates NodePool and EC2NodeClass resources from presets, and reports
//! cost and rebalancing guidance for the connected cluster.

use anyhow::Result;
use karp_wizard::{
    api,
    config::WizardConfig,
    inventory::{InventorySource, KubeInventory, UnavailableInventory},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wizard_lib::{
    health::{components, HealthRegistry},
    CostEstimator, StaticPriceTable, StructuredLogger, WizardMetrics,
};

const SERVICE_NAME: &str = "karp-wizard";
const WIZARD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = WizardConfig::load()?;
    info!(port = config.port, origins = ?config.allowed_origins, "Wizard configured");

    let health_registry = HealthRegistry::new();
    health_registry.register(components::CATALOG).await;
    health_registry.register(components::INVENTORY).await;

    let metrics = WizardMetrics::new();
    let logger = StructuredLogger::new(SERVICE_NAME);
    logger.log_startup(WIZARD_VERSION, config.port);

    // Configuration synthesis does not need a cluster; keep serving without one
    let inventory: Arc<dyn InventorySource> = match KubeInventory::connect().await {
        Ok(kube) => Arc::new(kube),
        Err(e) => {
            let reason = format!("{:#}", e);
            warn!(error = %reason, "Kubernetes client unavailable, cluster endpoints disabled");
            health_registry
                .set_degraded(components::INVENTORY, reason.clone())
                .await;
            Arc::new(UnavailableInventory::new(reason))
        }
    };

    let app_state = Arc::new(api::AppState::new(
        health_registry.clone(),
        metrics,
        logger.clone(),
        inventory,
        Arc::new(StaticPriceTable),
        CostEstimator::with_model(config.cost_model()),
    ));

    health_registry.set_ready(true).await;

    api::serve(config.port, &config.allowed_origins, app_state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
        }
    })
    .await?;

    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
