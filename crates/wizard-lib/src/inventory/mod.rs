//! Cluster inventory snapshots
//!
//! A snapshot is a point-in-time read of node and pod state. The wizard
//! never fetches these itself; an inventory source builds them from
//! [`NodeObservation`] and [`PodObservation`] records.

pub mod labels;
pub mod quantity;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use quantity::{parse_bytes, parse_cpu_millis};

const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

pub mod node_state {
    pub const READY: &str = "Ready";
    pub const NOT_READY: &str = "NotReady";
    pub const UNKNOWN: &str = "Unknown";
}

/// Per-node detail record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetail {
    pub name: String,
    pub instance_type: String,
    pub region: String,
    pub zone: String,
    pub is_spot: bool,
    pub state: String,
    pub cpu_cores: u64,
    pub memory_gb: u64,
}

/// Node inventory snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInventory {
    pub total_nodes: u32,
    pub spot_nodes: u32,
    pub on_demand_nodes: u32,
    /// Aggregate CPU capacity in cores
    pub total_cpu: u64,
    /// Aggregate memory capacity in bytes
    pub total_memory: u64,
    #[serde(default)]
    pub nodes: Vec<NodeDetail>,
}

/// Per-pod detail record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodDetail {
    pub name: String,
    pub namespace: String,
    pub node_name: String,
    /// Pod phase
    pub status: String,
    /// Requested CPU in milli-units
    pub cpu_request: u64,
    /// Requested memory in bytes
    pub memory_request: u64,
}

/// Pod inventory snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodInventory {
    pub total_pods: u32,
    /// Aggregate requested CPU in milli-units
    pub total_cpu: u64,
    /// Aggregate requested memory in bytes
    pub total_memory: u64,
    #[serde(default)]
    pub pods: Vec<PodDetail>,
}

/// Raw node state as read from the cluster
#[derive(Debug, Clone, Default)]
pub struct NodeObservation {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    /// Status of the `Ready` condition, if reported
    pub ready: Option<bool>,
    pub cpu_capacity: Option<String>,
    pub memory_capacity: Option<String>,
}

/// Raw pod state as read from the cluster
#[derive(Debug, Clone, Default)]
pub struct PodObservation {
    pub name: String,
    pub namespace: String,
    pub node_name: Option<String>,
    pub phase: Option<String>,
    /// CPU request of each container that declares one
    pub cpu_requests: Vec<String>,
    /// Memory request of each container that declares one
    pub memory_requests: Vec<String>,
}

fn sum_quantities(quantities: &[String], parse: fn(&str) -> Option<u64>) -> u64 {
    quantities
        .iter()
        .filter_map(|q| parse(q))
        .fold(0u64, u64::saturating_add)
}

impl NodeInventory {
    /// Aggregate node observations into a snapshot
    pub fn from_observations(observations: impl IntoIterator<Item = NodeObservation>) -> Self {
        let mut inventory = NodeInventory::default();
        let mut total_cpu_millis = 0u64;

        for node in observations {
            let cpu_millis = node
                .cpu_capacity
                .as_deref()
                .and_then(parse_cpu_millis)
                .unwrap_or(0);
            let memory_bytes = node
                .memory_capacity
                .as_deref()
                .and_then(parse_bytes)
                .unwrap_or(0);

            let is_spot = labels::is_spot(&node.labels);
            let state = match node.ready {
                Some(true) => node_state::READY,
                Some(false) => node_state::NOT_READY,
                None => node_state::UNKNOWN,
            };

            total_cpu_millis = total_cpu_millis.saturating_add(cpu_millis);
            inventory.total_memory = inventory.total_memory.saturating_add(memory_bytes);
            if is_spot {
                inventory.spot_nodes += 1;
            } else {
                inventory.on_demand_nodes += 1;
            }

            inventory.nodes.push(NodeDetail {
                instance_type: labels::instance_type(&node.labels),
                region: labels::region(&node.labels),
                zone: labels::zone(&node.labels),
                name: node.name,
                is_spot,
                state: state.to_string(),
                cpu_cores: cpu_millis / 1000,
                memory_gb: memory_bytes / BYTES_PER_GIB,
            });
        }

        inventory.total_nodes = inventory.nodes.len() as u32;
        inventory.total_cpu = total_cpu_millis / 1000;
        inventory
    }

    /// Number of nodes reporting ready
    pub fn ready_nodes(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.state == node_state::READY)
            .count()
    }
}

impl PodInventory {
    /// Aggregate pod observations into a snapshot
    pub fn from_observations(observations: impl IntoIterator<Item = PodObservation>) -> Self {
        let mut inventory = PodInventory::default();

        for pod in observations {
            let cpu_request = sum_quantities(&pod.cpu_requests, parse_cpu_millis);
            let memory_request = sum_quantities(&pod.memory_requests, parse_bytes);

            inventory.total_cpu = inventory.total_cpu.saturating_add(cpu_request);
            inventory.total_memory = inventory.total_memory.saturating_add(memory_request);
            inventory.pods.push(PodDetail {
                name: pod.name,
                namespace: pod.namespace,
                node_name: pod.node_name.unwrap_or_default(),
                status: pod.phase.unwrap_or_else(|| "Unknown".to_string()),
                cpu_request,
                memory_request,
            });
        }

        inventory.total_pods = inventory.pods.len() as u32;
        inventory
    }
}
