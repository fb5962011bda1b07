//! Cluster inventory views

use anyhow::Result;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{
    color_status, format_bytes, format_cpu, print_heading, print_json, print_table, OutputFormat,
};

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Instance Type")]
    instance_type: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "State")]
    state: String,
}

#[derive(Tabled)]
struct PodRow {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "CPU Req")]
    cpu_request: String,
    #[tabled(rename = "Mem Req")]
    memory_request: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub async fn show_nodes(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let inventory = client.cluster_nodes().await?;

    if format == OutputFormat::Json {
        return print_json(&inventory);
    }

    print_heading("Nodes");
    println!(
        "Total: {}   Spot: {}   On-demand: {}   Ready: {}",
        inventory.total_nodes,
        inventory.spot_nodes,
        inventory.on_demand_nodes,
        inventory.ready_nodes()
    );
    println!(
        "CPU: {} cores   Memory: {}",
        inventory.total_cpu,
        format_bytes(inventory.total_memory)
    );
    println!();

    let rows = inventory
        .nodes
        .iter()
        .map(|node| NodeRow {
            name: node.name.clone(),
            instance_type: node.instance_type.clone(),
            zone: node.zone.clone(),
            capacity: if node.is_spot { "spot" } else { "on-demand" }.to_string(),
            cpu: node.cpu_cores.to_string(),
            memory: format!("{}Gi", node.memory_gb),
            state: color_status(&node.state),
        })
        .collect();
    print_table(rows);

    Ok(())
}

pub async fn show_pods(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let inventory = client.cluster_pods().await?;

    if format == OutputFormat::Json {
        return print_json(&inventory);
    }

    print_heading("Pods");
    println!(
        "Total: {}   CPU requested: {}   Memory requested: {}",
        inventory.total_pods,
        format_cpu(inventory.total_cpu),
        format_bytes(inventory.total_memory)
    );
    println!();

    let rows = inventory
        .pods
        .iter()
        .map(|pod| PodRow {
            namespace: pod.namespace.clone(),
            name: pod.name.clone(),
            node: pod.node_name.clone(),
            cpu_request: format_cpu(pod.cpu_request),
            memory_request: format_bytes(pod.memory_request),
            status: color_status(&pod.status),
        })
        .collect();
    print_table(rows);

    Ok(())
}
