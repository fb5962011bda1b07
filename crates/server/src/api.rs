//! HTTP API for the configuration wizard

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use wizard_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    preset, rebalancing, synthesize, ConfigRequest, CostEstimator, GeneratedConfig, NodeInventory,
    PodInventory, PriceQuote, PriceSource, Preset, StructuredLogger, WizardError, WizardMetrics,
};

use crate::inventory::InventorySource;

/// Errors returned by API handlers as `{"error": "..."}` bodies
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error("{0}")]
    Inventory(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Wizard(WizardError::InvalidRequest(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Wizard(_) | ApiError::Inventory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Shared application state
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: WizardMetrics,
    pub logger: StructuredLogger,
    pub inventory: Arc<dyn InventorySource>,
    pub pricing: Arc<dyn PriceSource>,
    pub estimator: CostEstimator,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: WizardMetrics,
        logger: StructuredLogger,
        inventory: Arc<dyn InventorySource>,
        pricing: Arc<dyn PriceSource>,
        estimator: CostEstimator,
    ) -> Self {
        Self {
            health_registry,
            metrics,
            logger,
            inventory,
            pricing,
            estimator,
        }
    }

    async fn record_inventory<T>(
        &self,
        resource: &str,
        result: anyhow::Result<T>,
        started: Instant,
    ) -> Result<T, ApiError> {
        self.metrics
            .observe_inventory_latency(started.elapsed().as_secs_f64());

        match result {
            Ok(value) => {
                self.health_registry.set_healthy(components::INVENTORY).await;
                Ok(value)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                self.metrics.inc_inventory_errors();
                self.logger.log_inventory_unavailable(resource, &message);
                self.health_registry
                    .set_degraded(components::INVENTORY, message.clone())
                    .await;
                Err(ApiError::Inventory(message))
            }
        }
    }

    async fn read_nodes(&self) -> Result<NodeInventory, ApiError> {
        let started = Instant::now();
        let result = self.inventory.nodes().await;
        self.record_inventory("nodes", result, started).await
    }

    async fn read_pods(&self) -> Result<PodInventory, ApiError> {
        let started = Instant::now();
        let result = self.inventory.pods().await;
        self.record_inventory("pods", result, started).await
    }
}

type SharedState = State<Arc<AppState>>;

/// Liveness: 200 if healthy or degraded, 503 if unhealthy
async fn healthz(State(state): SharedState) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

async fn readyz(State(state): SharedState) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

async fn list_presets() -> Json<preset::PresetCatalog> {
    Json(preset::catalog())
}

async fn generate_config(
    State(state): SharedState,
    payload: Result<Json<ConfigRequest>, JsonRejection>,
) -> Result<Json<GeneratedConfig>, ApiError> {
    let Json(request) = payload?;
    let config = synthesize(&request)?;

    let resolved = config.summary.resolved_preset;
    if Preset::parse(&request.preset).is_none() {
        state.metrics.inc_preset_fallbacks();
    }
    state.metrics.inc_configs_generated(resolved.as_str());
    state.logger.log_config_generated(
        &request.preset,
        resolved.as_str(),
        &request.region,
        request.features.consolidation(),
    );

    Ok(Json(config))
}

async fn cluster_cost(State(state): SharedState) -> Result<impl IntoResponse, ApiError> {
    let nodes = state.read_nodes().await?;
    let analysis = state.estimator.estimate(&nodes);

    state.metrics.inc_cost_analyses();
    state.logger.log_cost_analysis(
        nodes.on_demand_nodes,
        nodes.spot_nodes,
        analysis.savings.percentage,
    );

    Ok(Json(analysis))
}

async fn cluster_nodes(State(state): SharedState) -> Result<Json<NodeInventory>, ApiError> {
    Ok(Json(state.read_nodes().await?))
}

async fn cluster_pods(State(state): SharedState) -> Result<Json<PodInventory>, ApiError> {
    Ok(Json(state.read_pods().await?))
}

async fn pricing(
    State(state): SharedState,
    Path((region, instance_type)): Path<(String, String)>,
) -> Json<PriceQuote> {
    Json(state.pricing.quote(&region, &instance_type))
}

async fn rebalancing_recommendations(
    State(state): SharedState,
) -> Result<impl IntoResponse, ApiError> {
    let nodes = state.read_nodes().await?;
    let pods = state.read_pods().await?;
    Ok(Json(rebalancing::advise(&nodes, &pods)))
}

async fn simulate_rebalancing() -> Json<rebalancing::RebalancingSimulation> {
    Json(rebalancing::simulate())
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let v1 = Router::new()
        .route("/presets", get(list_presets))
        .route("/generate-config", post(generate_config))
        .route("/cluster/cost", get(cluster_cost))
        .route("/cluster/nodes", get(cluster_nodes))
        .route("/cluster/pods", get(cluster_pods))
        .route("/pricing/:region/:instance_type", get(pricing))
        .route("/recommendations/rebalancing", get(rebalancing_recommendations))
        .route("/simulate/rebalancing", post(simulate_rebalancing));

    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .nest("/api/v1", v1)
        .with_state(state)
}

/// CORS policy for the configured browser origins
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// Start the API server and run until `shutdown` resolves
pub async fn serve(
    port: u16,
    allowed_origins: &[String],
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state).layer(cors_layer(allowed_origins));

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
