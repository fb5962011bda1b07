//! Observability for the wizard service
//!
//! Prometheus metrics registered once per process, and event-tagged
//! structured logging through `tracing`.

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for inventory retrieval latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

static GLOBAL_METRICS: OnceLock<WizardMetricsInner> = OnceLock::new();

struct WizardMetricsInner {
    configs_generated: IntCounterVec,
    preset_fallbacks: IntCounter,
    cost_analyses: IntCounter,
    inventory_errors: IntCounter,
    inventory_latency_seconds: Histogram,
}

impl WizardMetricsInner {
    fn new() -> Self {
        Self {
            configs_generated: register_int_counter_vec!(
                "karp_wizard_configs_generated_total",
                "Number of provisioning configurations generated",
                &["preset"]
            )
            .expect("Failed to register configs_generated"),

            preset_fallbacks: register_int_counter!(
                "karp_wizard_preset_fallbacks_total",
                "Requests whose preset was unrecognized and resolved to balanced"
            )
            .expect("Failed to register preset_fallbacks"),

            cost_analyses: register_int_counter!(
                "karp_wizard_cost_analyses_total",
                "Number of cost analyses computed"
            )
            .expect("Failed to register cost_analyses"),

            inventory_errors: register_int_counter!(
                "karp_wizard_inventory_errors_total",
                "Number of failed cluster inventory reads"
            )
            .expect("Failed to register inventory_errors"),

            inventory_latency_seconds: register_histogram!(
                "karp_wizard_inventory_latency_seconds",
                "Time spent reading cluster inventory",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register inventory_latency_seconds"),
        }
    }
}

/// Handle to the process-wide wizard metrics. Clones share one registry.
#[derive(Clone)]
pub struct WizardMetrics {
    _private: (),
}

impl Default for WizardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(WizardMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &WizardMetricsInner {
        GLOBAL_METRICS.get_or_init(WizardMetricsInner::new)
    }

    pub fn inc_configs_generated(&self, preset: &str) {
        self.inner()
            .configs_generated
            .with_label_values(&[preset])
            .inc();
    }

    pub fn inc_preset_fallbacks(&self) {
        self.inner().preset_fallbacks.inc();
    }

    pub fn inc_cost_analyses(&self) {
        self.inner().cost_analyses.inc();
    }

    pub fn inc_inventory_errors(&self) {
        self.inner().inventory_errors.inc();
    }

    pub fn observe_inventory_latency(&self, duration_secs: f64) {
        self.inner().inventory_latency_seconds.observe(duration_secs);
    }
}

/// Structured logger for significant service events
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, port: u16) {
        info!(
            event = "server_started",
            service = %self.service,
            version = %version,
            port = port,
            "Configuration wizard started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "server_shutdown",
            service = %self.service,
            reason = %reason,
            "Configuration wizard shutting down"
        );
    }

    pub fn log_config_generated(
        &self,
        requested: &str,
        resolved: &str,
        region: &str,
        consolidation: bool,
    ) {
        info!(
            event = "config_generated",
            service = %self.service,
            requested_preset = %requested,
            resolved_preset = %resolved,
            region = %region,
            consolidation = consolidation,
            "Generated provisioning configuration"
        );
    }

    pub fn log_cost_analysis(
        &self,
        on_demand_nodes: u32,
        spot_nodes: u32,
        savings_percentage: f64,
    ) {
        info!(
            event = "cost_analysis",
            service = %self.service,
            on_demand_nodes = on_demand_nodes,
            spot_nodes = spot_nodes,
            savings_percentage = savings_percentage,
            "Computed cluster cost analysis"
        );
    }

    pub fn log_inventory_unavailable(&self, resource: &str, error: &str) {
        warn!(
            event = "inventory_unavailable",
            service = %self.service,
            resource = %resource,
            error = %error,
            "Failed to read cluster inventory"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_handles_share_registry() {
        let metrics = WizardMetrics::new();
        let clone = metrics.clone();

        metrics.inc_configs_generated("balanced");
        clone.inc_configs_generated("balanced");
        metrics.inc_preset_fallbacks();
        metrics.inc_cost_analyses();
        metrics.inc_inventory_errors();
        metrics.observe_inventory_latency(0.02);

        let count = metrics
            .inner()
            .configs_generated
            .with_label_values(&["balanced"])
            .get();
        assert!(count >= 2);
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("karp-wizard");
        assert_eq!(logger.service, "karp-wizard");
    }
}
