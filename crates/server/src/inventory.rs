//! Cluster inventory sources

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::{Api, ListParams};
use kube::Client;
use wizard_lib::inventory::{NodeInventory, NodeObservation, PodInventory, PodObservation};

/// Source of point-in-time node and pod snapshots
#[async_trait]
pub trait InventorySource: Send + Sync + 'static {
    async fn nodes(&self) -> Result<NodeInventory>;

    async fn pods(&self) -> Result<PodInventory>;
}

/// Reads inventory from the Kubernetes API
pub struct KubeInventory {
    client: Client,
}

impl KubeInventory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using in-cluster credentials, falling back to kubeconfig
    pub async fn connect() -> Result<Self> {
        let client = Client::try_default()
            .await
            .context("Failed to build Kubernetes client")?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl InventorySource for KubeInventory {
    async fn nodes(&self) -> Result<NodeInventory> {
        let api: Api<Node> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .context("failed to list nodes")?;
        Ok(NodeInventory::from_observations(
            list.items.iter().map(node_observation),
        ))
    }

    async fn pods(&self) -> Result<PodInventory> {
        let api: Api<Pod> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .context("failed to list pods")?;
        Ok(PodInventory::from_observations(
            list.items.iter().map(pod_observation),
        ))
    }
}

/// Fixed snapshots, for tests and offline use
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    pub nodes: NodeInventory,
    pub pods: PodInventory,
}

#[async_trait]
impl InventorySource for StaticInventory {
    async fn nodes(&self) -> Result<NodeInventory> {
        Ok(self.nodes.clone())
    }

    async fn pods(&self) -> Result<PodInventory> {
        Ok(self.pods.clone())
    }
}

/// Stands in when no cluster connection could be made
pub struct UnavailableInventory {
    reason: String,
}

impl UnavailableInventory {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl InventorySource for UnavailableInventory {
    async fn nodes(&self) -> Result<NodeInventory> {
        anyhow::bail!("cluster inventory unavailable: {}", self.reason)
    }

    async fn pods(&self) -> Result<PodInventory> {
        anyhow::bail!("cluster inventory unavailable: {}", self.reason)
    }
}

pub fn node_observation(node: &Node) -> NodeObservation {
    let status = node.status.as_ref();
    let capacity = status.and_then(|s| s.capacity.as_ref());

    let ready = status
        .and_then(|s| s.conditions.as_ref())
        .and_then(|conditions| conditions.iter().find(|c| c.type_ == "Ready"))
        .map(|c| c.status == "True");

    NodeObservation {
        name: node.metadata.name.clone().unwrap_or_default(),
        labels: node.metadata.labels.clone().unwrap_or_default(),
        ready,
        cpu_capacity: capacity.and_then(|c| c.get("cpu")).map(|q| q.0.clone()),
        memory_capacity: capacity.and_then(|c| c.get("memory")).map(|q| q.0.clone()),
    }
}

pub fn pod_observation(pod: &Pod) -> PodObservation {
    let mut cpu_requests = Vec::new();
    let mut memory_requests = Vec::new();

    let spec = pod.spec.as_ref();
    for container in spec.map(|s| s.containers.as_slice()).unwrap_or_default() {
        let Some(requests) = container.resources.as_ref().and_then(|r| r.requests.as_ref()) else {
            continue;
        };
        if let Some(cpu) = requests.get("cpu") {
            cpu_requests.push(cpu.0.clone());
        }
        if let Some(memory) = requests.get("memory") {
            memory_requests.push(memory.0.clone());
        }
    }

    PodObservation {
        name: pod.metadata.name.clone().unwrap_or_default(),
        namespace: pod.metadata.namespace.clone().unwrap_or_default(),
        node_name: spec.and_then(|s| s.node_name.clone()),
        phase: pod.status.as_ref().and_then(|s| s.phase.clone()),
        cpu_requests,
        memory_requests,
    }
}
