//! Server configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use wizard_lib::cost::{
    CostModel, DEFAULT_ON_DEMAND_NODE_COST, DEFAULT_SPOT_ADOPTION_RATIO, DEFAULT_SPOT_NODE_SAVINGS,
};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CONFIG_FILE: &str = "karp-wizard";
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WizardConfig {
    /// HTTP listen port
    pub port: u16,

    /// Origins allowed to call the API from a browser
    pub allowed_origins: Vec<String>,

    /// Placeholder hourly cost of one on-demand node
    pub on_demand_node_cost: f64,

    /// Placeholder saving per spot node
    pub spot_node_savings: f64,

    /// Share of capacity assumed to move to spot
    pub spot_adoption_ratio: f64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            on_demand_node_cost: DEFAULT_ON_DEMAND_NODE_COST,
            spot_node_savings: DEFAULT_SPOT_NODE_SAVINGS,
            spot_adoption_ratio: DEFAULT_SPOT_ADOPTION_RATIO,
        }
    }
}

impl WizardConfig {
    /// Load configuration from defaults, an optional config file, and
    /// `WIZARD_`-prefixed environment variables, in increasing precedence.
    /// A bare `PORT` variable overrides the default port.
    pub fn load() -> Result<Self> {
        let file =
            std::env::var("WIZARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let port = match std::env::var("PORT") {
            Ok(port) => port.parse::<u16>().context("PORT must be a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };

        let config = config::Config::builder()
            .set_default("port", i64::from(port))?
            .set_default("allowed_origins", DEFAULT_ALLOWED_ORIGINS.to_vec())?
            .set_default("on_demand_node_cost", DEFAULT_ON_DEMAND_NODE_COST)?
            .set_default("spot_node_savings", DEFAULT_SPOT_NODE_SAVINGS)?
            .set_default("spot_adoption_ratio", DEFAULT_SPOT_ADOPTION_RATIO)?
            .add_source(config::File::with_name(&file).required(false))
            .add_source(
                config::Environment::with_prefix("WIZARD")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins"),
            )
            .build()
            .context("Failed to load configuration")?;

        let config: WizardConfig = config
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.spot_adoption_ratio) {
            anyhow::bail!(
                "spot_adoption_ratio must be between 0 and 1, got {}",
                self.spot_adoption_ratio
            );
        }
        if self.on_demand_node_cost < 0.0 || self.spot_node_savings < 0.0 {
            anyhow::bail!("node costs must not be negative");
        }
        Ok(())
    }

    pub fn cost_model(&self) -> CostModel {
        CostModel {
            on_demand_node_cost: self.on_demand_node_cost,
            spot_node_savings: self.spot_node_savings,
            spot_adoption_ratio: self.spot_adoption_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WizardConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(config.cost_model(), CostModel::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ratio_out_of_range_rejected() {
        let config = WizardConfig {
            spot_adoption_ratio: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
