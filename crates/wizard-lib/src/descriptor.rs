//! Autoscaler descriptor documents
//!
//! Field names and nesting follow the manifest layout consumed by the
//! autoscaler. Optional fields are omitted when unset so the rendered
//! manifests stay minimal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::requirements::Requirement;

pub const POLICY_API_VERSION: &str = "karpenter.sh/v1beta1";
pub const POLICY_KIND: &str = "NodePool";
pub const NODE_CLASS_API_VERSION: &str = "karpenter.k8s.aws/v1beta1";
pub const NODE_CLASS_KIND: &str = "EC2NodeClass";
pub const CLUSTER_LABEL: &str = "karpenter.io/cluster";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRef {
    pub api_version: String,
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub cpu: String,
    pub memory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taint {
    pub key: String,
    pub value: String,
    pub effect: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consolidation {
    pub enabled: bool,
}

impl Consolidation {
    fn is_disabled(&self) -> bool {
        !self.enabled
    }
}

/// Provisioning policy (autoscaler node pool)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningPolicy {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: ProvisioningSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningSpec {
    pub provider_ref: ProviderRef,
    pub requirements: Vec<Requirement>,
    pub resource_limits: ResourceLimits,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<Taint>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Consolidation::is_disabled")]
    pub consolidation: Consolidation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds_after_empty: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds_until_expired: Option<u64>,
}

/// Node template (launch mechanics) descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTemplateDescriptor {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: NodeTemplateSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTemplateSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<NodeTemplateContent>,
    pub requirements: Vec<Requirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ami: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_template_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subnet_selector: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "MetadataOptions::is_unset")]
    pub metadata_options: MetadataOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplateContent {
    pub metadata: Metadata,
    pub spec: NodeTemplateNodeSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTemplateNodeSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<Taint>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

/// Instance metadata service options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataOptions {
    #[serde(rename = "httpEndpoint", default, skip_serializing_if = "Option::is_none")]
    pub http_endpoint: Option<String>,
    #[serde(rename = "httpProtocolIPv6", default, skip_serializing_if = "Option::is_none")]
    pub http_protocol_ipv6: Option<String>,
    #[serde(rename = "httpPutResponseHopLimit", default, skip_serializing_if = "Option::is_none")]
    pub http_put_response_hop_limit: Option<u32>,
}

impl MetadataOptions {
    fn is_unset(&self) -> bool {
        self == &MetadataOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_consolidation_is_omitted() {
        let spec = ProvisioningSpec {
            provider_ref: ProviderRef {
                api_version: NODE_CLASS_API_VERSION.to_string(),
                kind: NODE_CLASS_KIND.to_string(),
                name: "balanced-nodepool".to_string(),
            },
            requirements: Vec::new(),
            resource_limits: ResourceLimits {
                cpu: "1500".to_string(),
                memory: "2850Gi".to_string(),
            },
            taints: Vec::new(),
            labels: BTreeMap::new(),
            weight: 50,
            consolidation: Consolidation::default(),
            ttl_seconds_after_empty: None,
            ttl_seconds_until_expired: None,
        };

        let json = serde_json::to_value(&spec).unwrap();
        assert!(json.get("consolidation").is_none());
        assert!(json.get("taints").is_none());
        assert!(json.get("ttlSecondsAfterEmpty").is_none());
        assert_eq!(json["providerRef"]["apiVersion"], NODE_CLASS_API_VERSION);
        assert_eq!(json["resourceLimits"]["memory"], "2850Gi");
    }

    #[test]
    fn test_node_template_omits_unset_fields() {
        let spec = NodeTemplateSpec {
            instance_profile: Some("KarpenterNodeInstanceProfile".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["instanceProfile"], "KarpenterNodeInstanceProfile");
        assert!(json.get("ami").is_none());
        assert!(json.get("metadataOptions").is_none());
        assert!(json.get("template").is_none());
        assert!(json["requirements"].as_array().unwrap().is_empty());
    }
}
