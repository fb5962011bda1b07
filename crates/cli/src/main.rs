//! Karpenter configuration wizard CLI
//!
//! Lists presets and generates NodePool / EC2NodeClass manifests offline,
//! and queries a running wizard service for cost, inventory and
//! rebalancing views.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{cluster, costs, generate, presets, rebalance};
use std::path::PathBuf;

/// Karpenter configuration wizard CLI
#[derive(Parser)]
#[command(name = "kwiz")]
#[command(author, version, about = "CLI for the Karpenter configuration wizard", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via KWIZ_API_URL env var)
    #[arg(long, env = "KWIZ_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available presets, regions and features
    Presets,

    /// Generate provisioning manifests from a preset
    Generate(GenerateArgs),

    /// View cluster cost analysis and instance pricing
    #[command(subcommand)]
    Costs(CostsCommands),

    /// View cluster inventory
    #[command(subcommand)]
    Cluster(ClusterCommands),

    /// View rebalancing guidance
    #[command(subcommand)]
    Rebalance(RebalanceCommands),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Preset identifier (cost-optimized, performance, balanced)
    #[arg(long, short)]
    pub preset: Option<String>,

    /// Target region
    #[arg(long, short)]
    pub region: Option<String>,

    /// Restrict provisioning to one availability zone
    #[arg(long, short)]
    pub zone: Option<String>,

    /// Enable node consolidation
    #[arg(long)]
    pub consolidation: bool,

    /// Seconds before an empty node is removed
    #[arg(long, value_name = "SECONDS")]
    pub ttl_after_empty: Option<u64>,

    /// Seconds before a node is replaced
    #[arg(long, value_name = "SECONDS")]
    pub ttl_until_expired: Option<u64>,

    /// Write provisioner.yaml and node-template.yaml into this directory
    #[arg(long, short, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl From<GenerateArgs> for generate::GenerateOptions {
    fn from(args: GenerateArgs) -> Self {
        Self {
            preset: args.preset,
            region: args.region,
            zone: args.zone,
            consolidation: args.consolidation,
            ttl_after_empty: args.ttl_after_empty,
            ttl_until_expired: args.ttl_until_expired,
            output_dir: args.output_dir,
        }
    }
}

#[derive(Subcommand)]
pub enum CostsCommands {
    /// Show cluster cost analysis
    Show,

    /// Show on-demand and spot pricing for an instance type
    Pricing {
        /// Region, e.g. us-east-1
        region: String,

        /// Instance type, e.g. m5.large
        instance_type: String,
    },
}

#[derive(Subcommand)]
pub enum ClusterCommands {
    /// List nodes
    Nodes,

    /// List pods
    Pods,
}

#[derive(Subcommand)]
pub enum RebalanceCommands {
    /// Show rebalancing recommendations
    Recommendations,

    /// Preview a rebalancing pass
    Simulate,
}

fn api_client(config: &config::Config, api_url: Option<String>) -> Result<client::ApiClient> {
    client::ApiClient::new(&config.resolve_api_url(api_url))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load()?;

    match cli.command {
        Commands::Presets => presets::list_presets(cli.format)?,
        Commands::Generate(args) => generate::generate(&args.into(), &config, cli.format)?,
        Commands::Costs(costs_cmd) => {
            let client = api_client(&config, cli.api_url)?;
            match costs_cmd {
                CostsCommands::Show => costs::show_costs(&client, cli.format).await?,
                CostsCommands::Pricing {
                    region,
                    instance_type,
                } => costs::show_pricing(&client, &region, &instance_type, cli.format).await?,
            }
        }
        Commands::Cluster(cluster_cmd) => {
            let client = api_client(&config, cli.api_url)?;
            match cluster_cmd {
                ClusterCommands::Nodes => cluster::show_nodes(&client, cli.format).await?,
                ClusterCommands::Pods => cluster::show_pods(&client, cli.format).await?,
            }
        }
        Commands::Rebalance(rebalance_cmd) => {
            let client = api_client(&config, cli.api_url)?;
            match rebalance_cmd {
                RebalanceCommands::Recommendations => {
                    rebalance::show_recommendations(&client, cli.format).await?
                }
                RebalanceCommands::Simulate => rebalance::simulate(&client, cli.format).await?,
            }
        }
    }

    Ok(())
}
