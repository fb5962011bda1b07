//! API client for the wizard service

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;
use wizard_lib::{
    CostAnalysis, NodeInventory, PodInventory, PriceQuote, RebalancingRecommendations,
    RebalancingSimulation,
};

/// Error body returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API client for the wizard service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            anyhow::bail!("API error ({}): {}", status, message);
        }

        response.json().await.context("Failed to parse response")
    }

    pub async fn cluster_cost(&self) -> Result<CostAnalysis> {
        self.get("api/v1/cluster/cost").await
    }

    pub async fn cluster_nodes(&self) -> Result<NodeInventory> {
        self.get("api/v1/cluster/nodes").await
    }

    pub async fn cluster_pods(&self) -> Result<PodInventory> {
        self.get("api/v1/cluster/pods").await
    }

    pub async fn pricing(&self, region: &str, instance_type: &str) -> Result<PriceQuote> {
        self.get(&format!("api/v1/pricing/{}/{}", region, instance_type))
            .await
    }

    pub async fn rebalancing(&self) -> Result<RebalancingRecommendations> {
        self.get("api/v1/recommendations/rebalancing").await
    }

    pub async fn simulate_rebalancing(&self) -> Result<RebalancingSimulation> {
        self.post("api/v1/simulate/rebalancing", &serde_json::json!({}))
            .await
    }
}
