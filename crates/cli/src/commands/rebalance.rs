//! Rebalancing guidance

use anyhow::Result;
use colored::Colorize;

use crate::client::ApiClient;
use crate::output::{format_currency, print_heading, print_json, OutputFormat};

fn print_section(title: &str, items: &[String]) {
    println!("{}", title.bold());
    for item in items {
        println!("  • {}", item);
    }
    println!();
}

pub async fn show_recommendations(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let recs = client.rebalancing().await?;

    if format == OutputFormat::Json {
        return print_json(&recs);
    }

    print_heading("Rebalancing Recommendations");
    print_section("Instance types", &recs.instance_type_optimization);
    print_section("Spot strategy", &recs.spot_instance_strategy);
    print_section("Consolidation", &recs.consolidation);

    let savings = &recs.estimated_savings;
    println!(
        "{} {}/month ({:.1}%)",
        "Estimated Savings:".bold(),
        format_currency(savings.monthly, &savings.currency).green().bold(),
        savings.percentage
    );

    Ok(())
}

/// Preview a rebalancing pass. Nothing in the cluster changes.
pub async fn simulate(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let simulation = client.simulate_rebalancing().await?;

    if format == OutputFormat::Json {
        return print_json(&simulation);
    }

    print_heading("Rebalancing Simulation");
    print_section("Planned actions", &simulation.actions);
    println!(
        "{} {} ({:.1}%)",
        "Projected Savings:".bold(),
        format_currency(simulation.savings.amount, &simulation.savings.currency)
            .green()
            .bold(),
        simulation.savings.percentage
    );
    println!("Estimated time:         {}", simulation.estimated_time);

    Ok(())
}
