//! Descriptor synthesis
//!
//! Expands a [`ConfigRequest`] into a provisioning policy and its companion
//! node template. Synthesis is deterministic: identical requests produce
//! identical descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::descriptor::{
    Consolidation, Metadata, NodeTemplateDescriptor, NodeTemplateSpec, ProviderRef,
    ProvisioningPolicy, ProvisioningSpec, ResourceLimits, CLUSTER_LABEL, NODE_CLASS_API_VERSION,
    NODE_CLASS_KIND, POLICY_API_VERSION, POLICY_KIND,
};
use crate::error::{WizardError, WizardResult};
use crate::preset::{features, Preset};
use crate::requirements::{compose_node_template_requirements, compose_provisioning_requirements};

const POLICY_NAMESPACE: &str = "karpenter";
const NODE_TEMPLATE_NAMESPACE: &str = "default";
const CLUSTER_NAME: &str = "default";
const POLICY_WEIGHT: u32 = 50;
const INSTANCE_PROFILE: &str = "KarpenterNodeInstanceProfile";

/// Customization keys recognized in [`Customizations`]
pub mod customization_keys {
    pub const TTL_SECONDS_AFTER_EMPTY: &str = "ttlSecondsAfterEmpty";
    pub const TTL_SECONDS_UNTIL_EXPIRED: &str = "ttlSecondsUntilExpired";
}

/// Feature toggles keyed by feature name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureToggles(BTreeMap<String, bool>);

impl FeatureToggles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, enabled: bool) -> Self {
        self.0.insert(name.to_string(), enabled);
        self
    }

    /// Whether a toggle is present and set
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn consolidation(&self) -> bool {
        self.is_enabled(features::CONSOLIDATION)
    }
}

impl From<BTreeMap<String, bool>> for FeatureToggles {
    fn from(map: BTreeMap<String, bool>) -> Self {
        Self(map)
    }
}

/// Optional per-request overrides.
///
/// Deserialized from an open JSON object. Recognized keys must carry a
/// non-negative number (fractional parts are truncated); anything else,
/// including unknown keys, is ignored and listed by [`Self::ignored_keys`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", rename_all = "camelCase")]
pub struct Customizations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds_after_empty: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds_until_expired: Option<u64>,
    #[serde(skip)]
    ignored: Vec<String>,
}

impl Customizations {
    pub fn ignored_keys(&self) -> &[String] {
        &self.ignored
    }
}

fn seconds(value: &Value) -> Option<u64> {
    let n = value.as_f64()?;
    // u64::MAX as f64 rounds up to 2^64, so the bound is exclusive
    if n.is_finite() && n >= 0.0 && n < u64::MAX as f64 {
        Some(n.trunc() as u64)
    } else {
        None
    }
}

impl From<BTreeMap<String, Value>> for Customizations {
    fn from(map: BTreeMap<String, Value>) -> Self {
        let mut out = Customizations::default();
        for (key, value) in map {
            let parsed = seconds(&value);
            let slot = match key.as_str() {
                customization_keys::TTL_SECONDS_AFTER_EMPTY => {
                    Some(&mut out.ttl_seconds_after_empty)
                }
                customization_keys::TTL_SECONDS_UNTIL_EXPIRED => {
                    Some(&mut out.ttl_seconds_until_expired)
                }
                _ => None,
            };
            match (slot, parsed) {
                (Some(slot), Some(secs)) => *slot = Some(secs),
                _ => out.ignored.push(key),
            }
        }
        out
    }
}

/// Request to generate a provisioning configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRequest {
    pub preset: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default)]
    pub features: FeatureToggles,
    #[serde(default)]
    pub customizations: Customizations,
}

impl ConfigRequest {
    pub fn new(preset: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            preset: preset.into(),
            region: region.into(),
            ..Default::default()
        }
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn with_feature(mut self, name: &str, enabled: bool) -> Self {
        self.features = self.features.with(name, enabled);
        self
    }

    /// Ensure the fields names are derived from are present
    pub fn validate(&self) -> WizardResult<()> {
        if self.preset.trim().is_empty() {
            return Err(WizardError::InvalidRequest("preset is required".to_string()));
        }
        if self.region.trim().is_empty() {
            return Err(WizardError::InvalidRequest("region is required".to_string()));
        }
        Ok(())
    }
}

/// Summary returned alongside generated descriptors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    /// Preset identifier as requested
    pub preset: String,
    /// Preset the request resolved to
    pub resolved_preset: Preset,
    pub region: String,
    pub features: FeatureToggles,
    pub instructions: Vec<String>,
}

/// Output of [`synthesize`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedConfig {
    pub provisioner: ProvisioningPolicy,
    pub node_template: NodeTemplateDescriptor,
    pub summary: ConfigSummary,
}

/// Rendered YAML manifests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifests {
    pub provisioner: String,
    pub node_template: String,
}

impl Manifests {
    pub const PROVISIONER_FILE: &'static str = "provisioner.yaml";
    pub const NODE_TEMPLATE_FILE: &'static str = "node-template.yaml";
}

impl GeneratedConfig {
    /// Render both descriptors as YAML documents
    pub fn to_manifests(&self) -> WizardResult<Manifests> {
        Ok(Manifests {
            provisioner: serde_yaml::to_string(&self.provisioner)?,
            node_template: serde_yaml::to_string(&self.node_template)?,
        })
    }
}

pub fn provisioner_name(preset_id: &str) -> String {
    format!("{}-provisioner", preset_id)
}

/// Name shared by the node template and the policy's provider reference
pub fn node_pool_name(preset_id: &str) -> String {
    format!("{}-nodepool", preset_id)
}

pub fn launch_template_name(preset_id: &str) -> String {
    format!("KarpenterLaunchTemplate-{}", preset_id)
}

fn cluster_labels() -> BTreeMap<String, String> {
    BTreeMap::from([(CLUSTER_LABEL.to_string(), CLUSTER_NAME.to_string())])
}

fn apply_instructions() -> Vec<String> {
    vec![
        format!(
            "1. Apply the provisioner configuration: kubectl apply -f {}",
            Manifests::PROVISIONER_FILE
        ),
        format!(
            "2. Apply the node template: kubectl apply -f {}",
            Manifests::NODE_TEMPLATE_FILE
        ),
        "3. Monitor node provisioning: kubectl get nodes -w".to_string(),
    ]
}

/// Build the provisioning policy for a validated request
pub fn synthesize_policy(req: &ConfigRequest, preset: Preset) -> ProvisioningPolicy {
    let preset_id = req.preset.trim();
    let definition = preset.definition();

    let consolidation = Consolidation {
        enabled: req.features.consolidation(),
    };

    ProvisioningPolicy {
        api_version: POLICY_API_VERSION.to_string(),
        kind: POLICY_KIND.to_string(),
        metadata: Metadata {
            name: provisioner_name(preset_id),
            namespace: POLICY_NAMESPACE.to_string(),
            labels: cluster_labels(),
        },
        spec: ProvisioningSpec {
            provider_ref: ProviderRef {
                api_version: NODE_CLASS_API_VERSION.to_string(),
                kind: NODE_CLASS_KIND.to_string(),
                name: node_pool_name(preset_id),
            },
            requirements: compose_provisioning_requirements(
                definition,
                &req.region,
                req.zone.as_deref(),
            ),
            resource_limits: ResourceLimits {
                cpu: definition.limits.cpu.to_string(),
                memory: definition.limits.memory.to_string(),
            },
            taints: Vec::new(),
            labels: BTreeMap::new(),
            weight: POLICY_WEIGHT,
            consolidation,
            ttl_seconds_after_empty: req.customizations.ttl_seconds_after_empty,
            ttl_seconds_until_expired: req.customizations.ttl_seconds_until_expired,
        },
    }
}

/// Build the node template descriptor for a validated request
pub fn synthesize_node_template(req: &ConfigRequest) -> NodeTemplateDescriptor {
    let preset_id = req.preset.trim();

    NodeTemplateDescriptor {
        api_version: NODE_CLASS_API_VERSION.to_string(),
        kind: NODE_CLASS_KIND.to_string(),
        metadata: Metadata {
            name: node_pool_name(preset_id),
            namespace: NODE_TEMPLATE_NAMESPACE.to_string(),
            labels: cluster_labels(),
        },
        spec: NodeTemplateSpec {
            requirements: compose_node_template_requirements(),
            instance_profile: Some(INSTANCE_PROFILE.to_string()),
            launch_template_name: Some(launch_template_name(preset_id)),
            ..Default::default()
        },
    }
}

/// Expand a request into a provisioning policy and node template.
///
/// Fails with [`WizardError::InvalidRequest`] when the preset or region is
/// blank. An unrecognized preset resolves to `balanced`; descriptor names
/// keep the identifier as requested.
pub fn synthesize(req: &ConfigRequest) -> WizardResult<GeneratedConfig> {
    req.validate()?;

    let preset = match Preset::parse(&req.preset) {
        Some(preset) => preset,
        None => {
            warn!(
                event = "preset_fallback",
                requested = %req.preset,
                resolved = %Preset::Balanced,
                "Unrecognized preset, using balanced"
            );
            Preset::Balanced
        }
    };

    if !req.customizations.ignored_keys().is_empty() {
        debug!(
            ignored = ?req.customizations.ignored_keys(),
            "Ignoring unsupported customizations"
        );
    }

    Ok(GeneratedConfig {
        provisioner: synthesize_policy(req, preset),
        node_template: synthesize_node_template(req),
        summary: ConfigSummary {
            preset: req.preset.clone(),
            resolved_preset: preset,
            region: req.region.clone(),
            features: req.features.clone(),
            instructions: apply_instructions(),
        },
    })
}
