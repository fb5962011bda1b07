//! Cluster cost estimation
//!
//! A coarse heuristic over node counts. The unit costs are placeholders in
//! an arbitrary per-node-hour unit, not live prices.

use serde::{Deserialize, Serialize};

use crate::inventory::NodeInventory;

/// Placeholder cost of one on-demand node
pub const DEFAULT_ON_DEMAND_NODE_COST: f64 = 100.0;

/// Approximate saving per node already running on spot
pub const DEFAULT_SPOT_NODE_SAVINGS: f64 = 70.0;

/// Share of capacity assumed to move to spot in the potential breakdown
pub const DEFAULT_SPOT_ADOPTION_RATIO: f64 = 0.7;

/// Cost model constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub on_demand_node_cost: f64,
    pub spot_node_savings: f64,
    pub spot_adoption_ratio: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            on_demand_node_cost: DEFAULT_ON_DEMAND_NODE_COST,
            spot_node_savings: DEFAULT_SPOT_NODE_SAVINGS,
            spot_adoption_ratio: DEFAULT_SPOT_ADOPTION_RATIO,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total: f64,
    #[serde(rename = "ondemand")]
    pub on_demand: f64,
    pub spot: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    pub amount: f64,
    pub percentage: f64,
}

/// Result of a cost estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub current: CostBreakdown,
    pub potential: CostBreakdown,
    pub savings: Savings,
    pub recommendations: Vec<String>,
}

/// Percentage of `part` in `whole`, zero when `whole` is zero
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Estimates current and potential spend from a node inventory
#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    model: CostModel,
}

impl CostEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: CostModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }

    pub fn estimate(&self, inventory: &NodeInventory) -> CostAnalysis {
        let current_cost = inventory.on_demand_nodes as f64 * self.model.on_demand_node_cost;
        let spot_savings = inventory.spot_nodes as f64 * self.model.spot_node_savings;
        let potential_cost = current_cost - spot_savings;
        let savings = current_cost - potential_cost;
        let ratio = self.model.spot_adoption_ratio;

        CostAnalysis {
            current: CostBreakdown {
                total: current_cost,
                on_demand: current_cost,
                spot: 0.0,
            },
            potential: CostBreakdown {
                total: potential_cost,
                on_demand: current_cost * (1.0 - ratio),
                spot: current_cost * ratio,
            },
            savings: Savings {
                amount: savings,
                percentage: percentage_of(savings, current_cost),
            },
            recommendations: vec![
                format!(
                    "Consider migrating {} workloads to Spot instances",
                    inventory.on_demand_nodes
                ),
                "Enable Karpenter consolidation for better resource utilization".to_string(),
                "Review instance sizing based on actual resource requirements".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(on_demand: u32, spot: u32) -> NodeInventory {
        NodeInventory {
            total_nodes: on_demand + spot,
            spot_nodes: spot,
            on_demand_nodes: on_demand,
            ..Default::default()
        }
    }

    #[test]
    fn test_all_on_demand_has_no_savings() {
        let analysis = CostEstimator::new().estimate(&inventory(10, 0));

        assert_eq!(analysis.current.total, 1000.0);
        assert_eq!(analysis.potential.total, 1000.0);
        assert_eq!(analysis.savings.amount, 0.0);
        assert_eq!(analysis.savings.percentage, 0.0);
    }

    #[test]
    fn test_zero_current_cost_has_zero_percentage() {
        let analysis = CostEstimator::new().estimate(&inventory(0, 4));

        assert_eq!(analysis.current.total, 0.0);
        assert_eq!(analysis.savings.amount, 280.0);
        assert_eq!(analysis.savings.percentage, 0.0);
        assert!(analysis.savings.percentage.is_finite());
    }

    #[test]
    fn test_mixed_fleet() {
        let analysis = CostEstimator::new().estimate(&inventory(10, 5));

        assert_eq!(analysis.current.total, 1000.0);
        assert_eq!(analysis.potential.total, 650.0);
        assert_eq!(analysis.savings.amount, 350.0);
        assert!((analysis.savings.percentage - 35.0).abs() < 1e-9);
        assert!((analysis.potential.on_demand - 300.0).abs() < 1e-9);
        assert!((analysis.potential.spot - 700.0).abs() < 1e-9);
    }

    #[test]
    fn test_recommendations_mention_on_demand_count() {
        let analysis = CostEstimator::new().estimate(&inventory(7, 1));
        assert_eq!(analysis.recommendations.len(), 3);
        assert_eq!(
            analysis.recommendations[0],
            "Consider migrating 7 workloads to Spot instances"
        );
    }

    #[test]
    fn test_custom_model() {
        let estimator = CostEstimator::with_model(CostModel {
            on_demand_node_cost: 10.0,
            spot_node_savings: 5.0,
            spot_adoption_ratio: 0.5,
        });
        let analysis = estimator.estimate(&inventory(2, 2));
        assert_eq!(analysis.current.total, 20.0);
        assert_eq!(analysis.potential.total, 10.0);
        assert_eq!(analysis.savings.percentage, 50.0);
    }

    #[test]
    fn test_breakdown_json_keys() {
        let analysis = CostEstimator::new().estimate(&inventory(1, 0));
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["current"]["ondemand"], 100.0);
        assert_eq!(json["savings"]["percentage"], 0.0);
    }
}
