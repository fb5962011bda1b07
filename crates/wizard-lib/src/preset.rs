//! Preset catalog
//!
//! A preset is a named bundle of provisioning defaults: which instance types
//! the autoscaler may launch, which capacity types it may buy, and how much
//! aggregate CPU and memory it may provision. The set of presets is closed;
//! every lookup succeeds, with unrecognized identifiers resolving to
//! [`Preset::Balanced`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Supported preset identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Spot-first, small and Graviton instance types
    CostOptimized,
    /// On-demand only, larger compute-heavy instance types
    Performance,
    /// Mixed spot/on-demand general purpose instance types
    Balanced,
}

/// Purchasing option for a compute instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapacityType {
    Spot,
    OnDemand,
}

impl CapacityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityType::Spot => "spot",
            CapacityType::OnDemand => "on-demand",
        }
    }
}

impl fmt::Display for CapacityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate resource bounds for everything provisioned under a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceBounds {
    /// CPU budget in cores, as a Kubernetes quantity literal
    pub cpu: &'static str,
    /// Memory budget as a Kubernetes quantity literal
    pub memory: &'static str,
}

/// Static definition of a preset
#[derive(Debug, Clone, PartialEq)]
pub struct PresetDefinition {
    pub preset: Preset,
    /// Allowed instance types, in preference order
    pub instance_types: &'static [&'static str],
    /// Permitted capacity types, in preference order
    pub capacity_types: &'static [CapacityType],
    pub limits: ResourceBounds,
    pub display_name: &'static str,
    pub description: &'static str,
    pub highlights: &'static [&'static str],
    pub instance_families: &'static [&'static str],
    /// Target share of spot capacity, in percent
    pub spot_ratio: u8,
}

const COST_OPTIMIZED_TYPES: &[&str] = &[
    "t3.medium",
    "t3.large",
    "t3.xlarge",
    "m5.large",
    "m5.xlarge",
    "m5.2xlarge",
    "c5.large",
    "c5.xlarge",
    "c5.2xlarge",
    // Graviton
    "c6g.large",
    "c6g.xlarge",
];

const PERFORMANCE_TYPES: &[&str] = &[
    "c5.xlarge",
    "c5.2xlarge",
    "c5.4xlarge",
    "c6i.xlarge",
    "c6i.2xlarge",
    "c6i.4xlarge",
    "m5.2xlarge",
    "m5.4xlarge",
    "m5.8xlarge",
];

const BALANCED_TYPES: &[&str] = &[
    "m5.large",
    "m5.xlarge",
    "m5.2xlarge",
    "c5.large",
    "c5.xlarge",
    "c5.2xlarge",
    "t3.medium",
    "t3.large",
    "t3.xlarge",
];

const SPOT_THEN_ON_DEMAND: &[CapacityType] = &[CapacityType::Spot, CapacityType::OnDemand];
const ON_DEMAND_ONLY: &[CapacityType] = &[CapacityType::OnDemand];

static COST_OPTIMIZED: PresetDefinition = PresetDefinition {
    preset: Preset::CostOptimized,
    instance_types: COST_OPTIMIZED_TYPES,
    capacity_types: SPOT_THEN_ON_DEMAND,
    limits: ResourceBounds {
        cpu: "1000",
        memory: "1900Gi",
    },
    display_name: "Cost Optimized",
    description: "Maximize savings with Spot instances and Graviton processors",
    highlights: &[
        "Prefer Spot instances (up to 90% savings)",
        "Graviton instances (ARM64) for better price/performance",
        "Smaller instance sizes for cost efficiency",
        "Consolidation enabled",
    ],
    instance_families: &["t3", "m5", "c5", "c6g"],
    spot_ratio: 90,
};

static PERFORMANCE: PresetDefinition = PresetDefinition {
    preset: Preset::Performance,
    instance_types: PERFORMANCE_TYPES,
    capacity_types: ON_DEMAND_ONLY,
    limits: ResourceBounds {
        cpu: "2000",
        memory: "3800Gi",
    },
    display_name: "Performance",
    description: "Optimize for compute-intensive workloads",
    highlights: &[
        "On-demand instances for stability",
        "Larger instance sizes",
        "Latest generation processors (C6i, M6i)",
        "Consolidation disabled for consistent performance",
    ],
    instance_families: &["c5", "c6i", "m5", "m6i"],
    spot_ratio: 0,
};

static BALANCED: PresetDefinition = PresetDefinition {
    preset: Preset::Balanced,
    instance_types: BALANCED_TYPES,
    capacity_types: SPOT_THEN_ON_DEMAND,
    limits: ResourceBounds {
        cpu: "1500",
        memory: "2850Gi",
    },
    display_name: "Balanced",
    description: "Balance cost and performance with mixed instances",
    highlights: &[
        "Mix of Spot and On-demand instances",
        "Moderate instance sizing",
        "General-purpose instance families",
        "Flexible consolidation policies",
    ],
    instance_families: &["t3", "m5", "c5"],
    spot_ratio: 50,
};

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::CostOptimized, Preset::Performance, Preset::Balanced];

    /// Parse a preset identifier, ignoring surrounding whitespace.
    /// Identifiers are case-sensitive.
    pub fn parse(id: &str) -> Option<Preset> {
        match id.trim() {
            "cost-optimized" => Some(Preset::CostOptimized),
            "performance" => Some(Preset::Performance),
            "balanced" => Some(Preset::Balanced),
            _ => None,
        }
    }

    /// Resolve a preset identifier, falling back to `balanced` on a miss
    pub fn resolve(id: &str) -> Preset {
        Self::parse(id).unwrap_or(Preset::Balanced)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::CostOptimized => "cost-optimized",
            Preset::Performance => "performance",
            Preset::Balanced => "balanced",
        }
    }

    pub fn definition(&self) -> &'static PresetDefinition {
        match self {
            Preset::CostOptimized => &COST_OPTIMIZED,
            Preset::Performance => &PERFORMANCE,
            Preset::Balanced => &BALANCED,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up a preset definition by identifier.
///
/// Never fails: unknown identifiers resolve to the `balanced` definition.
/// Note that this cannot distinguish an omitted preset from a misspelled one.
pub fn lookup(id: &str) -> &'static PresetDefinition {
    Preset::resolve(id).definition()
}

/// Regions offered by the wizard
pub const SUPPORTED_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-west-2",
    "eu-central-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
];

/// Feature toggles understood by the wizard
pub mod features {
    pub const CONSOLIDATION: &str = "consolidation";
    pub const SPOT_INTERRUPTION_HANDLING: &str = "spotInterruptionHandling";
    pub const NODE_TERMINATION_HANDLER: &str = "nodeTerminationHandler";
}

/// Presentation of a single preset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSummary {
    pub name: String,
    pub description: String,
    pub features: Vec<String>,
    pub instance_families: Vec<String>,
    pub spot_ratio: u8,
}

impl From<&PresetDefinition> for PresetSummary {
    fn from(def: &PresetDefinition) -> Self {
        Self {
            name: def.display_name.to_string(),
            description: def.description.to_string(),
            features: def.highlights.iter().map(|s| s.to_string()).collect(),
            instance_families: def.instance_families.iter().map(|s| s.to_string()).collect(),
            spot_ratio: def.spot_ratio,
        }
    }
}

/// Description of a feature toggle and its default
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    pub description: String,
    pub default: bool,
}

/// Everything a client needs to render the wizard's choices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetCatalog {
    pub presets: BTreeMap<String, PresetSummary>,
    pub regions: Vec<String>,
    pub features: BTreeMap<String, FeatureDescriptor>,
}

/// Build the preset catalog listing
pub fn catalog() -> PresetCatalog {
    let presets = Preset::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), PresetSummary::from(p.definition())))
        .collect();

    let feature = |description: &str, default: bool| FeatureDescriptor {
        description: description.to_string(),
        default,
    };

    let mut toggles = BTreeMap::new();
    toggles.insert(
        features::CONSOLIDATION.to_string(),
        feature("Enable node consolidation for better resource utilization", false),
    );
    toggles.insert(
        features::SPOT_INTERRUPTION_HANDLING.to_string(),
        feature("Handle spot instance interruptions gracefully", true),
    );
    toggles.insert(
        features::NODE_TERMINATION_HANDLER.to_string(),
        feature("Automatic graceful termination handling", true),
    );

    PresetCatalog {
        presets,
        regions: SUPPORTED_REGIONS.iter().map(|r| r.to_string()).collect(),
        features: toggles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_presets() {
        assert_eq!(Preset::parse("cost-optimized"), Some(Preset::CostOptimized));
        assert_eq!(Preset::parse("performance"), Some(Preset::Performance));
        assert_eq!(Preset::parse(" balanced "), Some(Preset::Balanced));
        assert_eq!(Preset::parse("turbo"), None);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(Preset::parse("Balanced"), None);
        assert_eq!(Preset::parse("PERFORMANCE"), None);
        assert_eq!(Preset::resolve("Cost-Optimized"), Preset::Balanced);
        assert_eq!(lookup("PERFORMANCE").limits, BALANCED.limits);
    }

    #[test]
    fn test_lookup_falls_back_to_balanced() {
        assert_eq!(lookup("no-such-preset").preset, Preset::Balanced);
        assert_eq!(lookup("").preset, Preset::Balanced);
    }

    #[test]
    fn test_limits_per_preset() {
        assert_eq!(
            lookup("cost-optimized").limits,
            ResourceBounds {
                cpu: "1000",
                memory: "1900Gi",
            }
        );
        assert_eq!(
            lookup("performance").limits,
            ResourceBounds {
                cpu: "2000",
                memory: "3800Gi",
            }
        );
        assert_eq!(
            lookup("balanced").limits,
            ResourceBounds {
                cpu: "1500",
                memory: "2850Gi",
            }
        );
    }

    #[test]
    fn test_performance_is_on_demand_only() {
        assert_eq!(lookup("performance").capacity_types, &[CapacityType::OnDemand]);
        assert_eq!(
            lookup("cost-optimized").capacity_types,
            &[CapacityType::Spot, CapacityType::OnDemand]
        );
    }

    #[test]
    fn test_serde_identifiers_match_as_str() {
        for preset in Preset::ALL {
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.as_str()));
        }
    }

    #[test]
    fn test_catalog_listing() {
        let catalog = catalog();
        assert_eq!(catalog.presets.len(), 3);
        assert_eq!(catalog.presets["cost-optimized"].spot_ratio, 90);
        assert_eq!(catalog.presets["performance"].spot_ratio, 0);
        assert_eq!(catalog.regions.len(), 10);
        assert!(!catalog.features[features::CONSOLIDATION].default);
        assert!(catalog.features[features::NODE_TERMINATION_HANDLER].default);
    }
}
