//! Scheduling requirement composition

use serde::{Deserialize, Serialize};

use crate::preset::{CapacityType, PresetDefinition};

/// Well-known node label keys used as requirement keys
pub mod keys {
    pub const ARCH: &str = "kubernetes.io/arch";
    pub const ZONE: &str = "topology.kubernetes.io/zone";
    pub const REGION: &str = "topology.kubernetes.io/region";
    pub const CAPACITY_TYPE: &str = "karpenter.sh/capacity-type";
    pub const INSTANCE_TYPE: &str = "node.kubernetes.io/instance-type";
}

/// Architectures always offered; selection is left to the instance-type set
pub const ARCHITECTURES: &[&str] = &["amd64", "arm64"];

/// Requirement operator. Only set membership is supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    In,
}

/// A (key, operator, values) scheduling constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub key: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl Requirement {
    pub fn is_in<I, S>(key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.to_string(),
            operator: Operator::In,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

fn capacity_values(types: &[CapacityType]) -> Vec<String> {
    types.iter().map(|t| t.as_str().to_string()).collect()
}

/// Compose the provisioning policy requirements for a preset.
///
/// Emitted in order: architecture, zone, region, capacity type, instance
/// type. The zone requirement is omitted when `zone` is blank.
pub fn compose_provisioning_requirements(
    preset: &PresetDefinition,
    region: &str,
    zone: Option<&str>,
) -> Vec<Requirement> {
    let mut requirements = Vec::with_capacity(5);
    requirements.push(Requirement::is_in(keys::ARCH, ARCHITECTURES.iter().copied()));

    if let Some(zone) = zone.map(str::trim).filter(|z| !z.is_empty()) {
        requirements.push(Requirement::is_in(keys::ZONE, [zone]));
    }

    requirements.push(Requirement::is_in(keys::REGION, [region.trim()]));
    requirements.push(Requirement::is_in(
        keys::CAPACITY_TYPE,
        capacity_values(preset.capacity_types),
    ));

    if !preset.instance_types.is_empty() {
        requirements.push(Requirement::is_in(
            keys::INSTANCE_TYPE,
            preset.instance_types.iter().copied(),
        ));
    }

    requirements
}

/// Compose the fixed node template requirements (architecture and capacity type)
pub fn compose_node_template_requirements() -> Vec<Requirement> {
    vec![
        Requirement::is_in(keys::ARCH, ARCHITECTURES.iter().copied()),
        Requirement::is_in(
            keys::CAPACITY_TYPE,
            capacity_values(&[CapacityType::Spot, CapacityType::OnDemand]),
        ),
    ]
}
