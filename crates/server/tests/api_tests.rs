//! Integration tests for the wizard API endpoints

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use karp_wizard::{
    api::{create_router, AppState},
    inventory::{InventorySource, StaticInventory, UnavailableInventory},
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;
use wizard_lib::{
    health::{components, HealthRegistry},
    inventory::{NodeObservation, PodObservation},
    CostEstimator, NodeInventory, PodInventory, StaticPriceTable, StructuredLogger, WizardMetrics,
};

fn node(name: &str, capacity_type: &str) -> NodeObservation {
    NodeObservation {
        name: name.to_string(),
        labels: BTreeMap::from([
            ("karpenter.sh/capacity-type".to_string(), capacity_type.to_string()),
            ("node.kubernetes.io/instance-type".to_string(), "m5.large".to_string()),
            ("topology.kubernetes.io/region".to_string(), "us-east-1".to_string()),
        ]),
        ready: Some(true),
        cpu_capacity: Some("2".to_string()),
        memory_capacity: Some("8Gi".to_string()),
    }
}

fn pod(name: &str) -> PodObservation {
    PodObservation {
        name: name.to_string(),
        namespace: "default".to_string(),
        node_name: Some("node-a".to_string()),
        phase: Some("Running".to_string()),
        cpu_requests: vec!["250m".to_string()],
        memory_requests: vec!["128Mi".to_string()],
    }
}

fn sample_inventory() -> StaticInventory {
    let mut nodes: Vec<NodeObservation> = (0..10)
        .map(|i| node(&format!("od-{}", i), "on-demand"))
        .collect();
    nodes.push(node("spot-0", "spot"));

    StaticInventory {
        nodes: NodeInventory::from_observations(nodes),
        pods: PodInventory::from_observations(vec![pod("web-0"), pod("web-1"), pod("web-2")]),
    }
}

async fn setup_app(inventory: Arc<dyn InventorySource>) -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::CATALOG).await;
    health_registry.register(components::INVENTORY).await;

    let state = Arc::new(AppState::new(
        health_registry,
        WizardMetrics::new(),
        StructuredLogger::new("karp-wizard-test"),
        inventory,
        Arc::new(StaticPriceTable),
        CostEstimator::new(),
    ));

    (create_router(state.clone()), state)
}

async fn setup_test_app() -> (Router, Arc<AppState>) {
    setup_app(Arc::new(sample_inventory())).await
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!((actual - expected).abs() < 1e-6, "expected {}, got {}", expected, actual);
}

fn requirement_values<'a>(config: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    config["provisioner"]["spec"]["requirements"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["key"] == key)
        .and_then(|r| r["values"].as_array())
}

#[tokio::test]
async fn test_health_returns_ok() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_healthz_returns_ok_when_degraded() {
    let (app, state) = setup_test_app().await;

    state
        .health_registry
        .set_degraded(components::INVENTORY, "cluster unreachable")
        .await;

    let (status, body) = get(app, "/healthz").await;

    // Degraded still returns 200 (operational)
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_healthz_returns_503_when_unhealthy() {
    let (app, state) = setup_test_app().await;

    state
        .health_registry
        .set_unhealthy(components::CATALOG, "catalog failed to load")
        .await;

    let (status, body) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_readyz_follows_ready_flag() {
    let (app, state) = setup_test_app().await;

    let (status, body) = get(app.clone(), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);

    state.health_registry.set_ready(true).await;

    let (status, body) = get(app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn test_presets_lists_catalog() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app, "/api/v1/presets").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["presets"]["cost-optimized"]["spotRatio"], 90);
    assert_eq!(body["presets"]["performance"]["spotRatio"], 0);
    assert_eq!(body["presets"]["balanced"]["spotRatio"], 50);
    assert_eq!(body["regions"].as_array().unwrap().len(), 10);
    assert_eq!(body["features"]["consolidation"]["default"], false);
}

#[tokio::test]
async fn test_generate_config_cost_optimized() {
    let (app, _state) = setup_test_app().await;

    let request = json!({
        "preset": "cost-optimized",
        "region": "us-west-2",
        "zone": "us-west-2a",
        "features": { "consolidation": true }
    });
    let (status, body) = post_json(app, "/api/v1/generate-config", request.to_string()).await;

    assert_eq!(status, StatusCode::OK);

    let policy = &body["provisioner"];
    assert_eq!(policy["apiVersion"], "karpenter.sh/v1beta1");
    assert_eq!(policy["kind"], "NodePool");
    assert_eq!(policy["metadata"]["name"], "cost-optimized-provisioner");
    assert_eq!(policy["metadata"]["namespace"], "karpenter");
    assert_eq!(policy["spec"]["weight"], 50);
    assert_eq!(policy["spec"]["consolidation"]["enabled"], true);
    assert_eq!(policy["spec"]["resourceLimits"]["cpu"], "1000");
    assert_eq!(policy["spec"]["resourceLimits"]["memory"], "1900Gi");

    let capacity = requirement_values(&body, "karpenter.sh/capacity-type").unwrap();
    assert_eq!(capacity, &vec![json!("spot"), json!("on-demand")]);
    let zone = requirement_values(&body, "topology.kubernetes.io/zone").unwrap();
    assert_eq!(zone, &vec![json!("us-west-2a")]);

    // The policy points at the node template it was generated with
    assert_eq!(
        policy["spec"]["providerRef"]["name"],
        body["nodeTemplate"]["metadata"]["name"]
    );
    assert_eq!(body["nodeTemplate"]["kind"], "EC2NodeClass");
    assert_eq!(body["nodeTemplate"]["metadata"]["name"], "cost-optimized-nodepool");
    assert_eq!(body["summary"]["resolvedPreset"], "cost-optimized");
    assert_eq!(body["summary"]["instructions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_generate_config_without_consolidation_omits_it() {
    let (app, _state) = setup_test_app().await;

    let request = json!({ "preset": "performance", "region": "eu-west-1" });
    let (status, body) = post_json(app, "/api/v1/generate-config", request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["provisioner"]["spec"].get("consolidation").is_none());
    assert!(requirement_values(&body, "topology.kubernetes.io/zone").is_none());

    let capacity = requirement_values(&body, "karpenter.sh/capacity-type").unwrap();
    assert_eq!(capacity, &vec![json!("on-demand")]);
}

#[tokio::test]
async fn test_generate_config_unknown_preset_resolves_to_balanced() {
    let (app, _state) = setup_test_app().await;

    let request = json!({ "preset": "turbo", "region": "us-east-1" });
    let (status, body) = post_json(app, "/api/v1/generate-config", request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["preset"], "turbo");
    assert_eq!(body["summary"]["resolvedPreset"], "balanced");
    assert_eq!(body["provisioner"]["metadata"]["name"], "turbo-provisioner");
    assert_eq!(body["provisioner"]["spec"]["resourceLimits"]["cpu"], "1500");
}

#[tokio::test]
async fn test_generate_config_blank_region_returns_400() {
    let (app, _state) = setup_test_app().await;

    let request = json!({ "preset": "balanced", "region": "  " });
    let (status, body) = post_json(app, "/api/v1/generate-config", request.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("region"));
}

#[tokio::test]
async fn test_generate_config_malformed_json_returns_400() {
    let (app, _state) = setup_test_app().await;

    let (status, body) =
        post_json(app, "/api/v1/generate-config", "{\"preset\": ".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_cluster_cost_from_inventory() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app, "/api/v1/cluster/cost").await;

    assert_eq!(status, StatusCode::OK);
    // 10 on-demand nodes at 100, one spot node saving 70
    assert_close(&body["current"]["total"], 1000.0);
    assert_close(&body["potential"]["total"], 930.0);
    assert_close(&body["savings"]["amount"], 70.0);
    assert_close(&body["savings"]["percentage"], 7.0);
    assert_eq!(
        body["recommendations"][0],
        "Consider migrating 10 workloads to Spot instances"
    );
}

#[tokio::test]
async fn test_cluster_cost_all_on_demand_has_no_savings() {
    let inventory = StaticInventory {
        nodes: NodeInventory::from_observations(
            (0..10).map(|i| node(&format!("od-{}", i), "on-demand")),
        ),
        pods: PodInventory::default(),
    };
    let (app, _state) = setup_app(Arc::new(inventory)).await;

    let (status, body) = get(app, "/api/v1/cluster/cost").await;

    assert_eq!(status, StatusCode::OK);
    assert_close(&body["current"]["total"], 1000.0);
    assert_close(&body["potential"]["ondemand"], 300.0);
    assert_close(&body["potential"]["spot"], 700.0);
    assert_close(&body["savings"]["amount"], 0.0);
    assert_close(&body["savings"]["percentage"], 0.0);
}

#[tokio::test]
async fn test_cluster_nodes_and_pods() {
    let (app, _state) = setup_test_app().await;

    let (status, nodes) = get(app.clone(), "/api/v1/cluster/nodes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(nodes["totalNodes"], 11);
    assert_eq!(nodes["spotNodes"], 1);
    assert_eq!(nodes["onDemandNodes"], 10);
    assert_eq!(nodes["totalCpu"], 22);
    assert_eq!(nodes["nodes"][0]["instanceType"], "m5.large");
    assert_eq!(nodes["nodes"][0]["state"], "Ready");

    let (status, pods) = get(app, "/api/v1/cluster/pods").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pods["totalPods"], 3);
    assert_eq!(pods["totalCpu"], 750);
    assert_eq!(pods["pods"][0]["status"], "Running");
}

#[tokio::test]
async fn test_pricing_quote() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app, "/api/v1/pricing/us-east-1/m5.large").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["region"], "us-east-1");
    assert_eq!(body["instanceType"], "m5.large");
    assert_close(&body["onDemand"]["price"], 0.096);
    assert_eq!(body["spot"]["discount"], "70%");
}

#[tokio::test]
async fn test_rebalancing_recommendations() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app, "/api/v1/recommendations/rebalancing").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["consolidation"][0],
        "Consider consolidating 3 pods across fewer nodes"
    );
    assert_eq!(body["estimatedSavings"]["monthly"], 892.3);
    assert_eq!(body["estimatedSavings"]["currency"], "USD");
}

#[tokio::test]
async fn test_simulate_rebalancing() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = post_json(app, "/api/v1/simulate/rebalancing", String::new()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["savings"]["amount"], 245.6);
    assert_eq!(body["estimatedTime"], "2-3 hours");
    assert_eq!(body["actions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unavailable_inventory_returns_500_and_degrades_health() {
    let (app, state) = setup_app(Arc::new(UnavailableInventory::new("no kubeconfig"))).await;

    let (status, body) = get(app.clone(), "/api/v1/cluster/cost").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("no kubeconfig"));

    let health = state.health_registry.health().await;
    assert_eq!(
        health.components[components::INVENTORY].status,
        wizard_lib::ComponentStatus::Degraded
    );

    // Synthesis does not depend on the cluster
    let request = json!({ "preset": "balanced", "region": "us-east-1" });
    let (status, _) = post_json(app, "/api/v1/generate-config", request.to_string()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let (app, state) = setup_test_app().await;

    state.metrics.inc_configs_generated("balanced");

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("karp_wizard_configs_generated_total"));
}
