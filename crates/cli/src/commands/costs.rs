//! Cost-related CLI commands

use anyhow::Result;
use colored::Colorize;

use crate::client::ApiClient;
use crate::output::{
    format_currency, format_units, print_heading, print_json, OutputFormat,
};

/// Show the cluster cost analysis
pub async fn show_costs(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let result = client.cluster_cost().await?;

    if format == OutputFormat::Json {
        return print_json(&result);
    }

    print_heading("Cost Analysis");
    println!("{}", "Estimates in placeholder per-node-hour units, not prices".dimmed());
    println!();
    println!("{}", "Current".bold());
    println!("{}", "-".repeat(50));
    println!("Total:                  {}", format_units(result.current.total));
    println!("On-demand:              {}", format_units(result.current.on_demand));
    println!("Spot:                   {}", format_units(result.current.spot));
    println!();

    println!("{}", "Potential".bold());
    println!("{}", "-".repeat(50));
    println!(
        "Total:                  {}",
        format_units(result.potential.total).green()
    );
    println!("On-demand:              {}", format_units(result.potential.on_demand));
    println!("Spot:                   {}", format_units(result.potential.spot));
    println!();

    println!(
        "{} {} ({:.1}%)",
        "Potential Savings:".bold(),
        format_units(result.savings.amount).green().bold(),
        result.savings.percentage
    );

    if !result.recommendations.is_empty() {
        println!();
        println!("{}", "Recommendations".bold());
        for recommendation in &result.recommendations {
            println!("  • {}", recommendation);
        }
    }

    Ok(())
}

/// Show the price quote for one instance type
pub async fn show_pricing(
    client: &ApiClient,
    region: &str,
    instance_type: &str,
    format: OutputFormat,
) -> Result<()> {
    let quote = client.pricing(region, instance_type).await?;

    if format == OutputFormat::Json {
        return print_json(&quote);
    }

    print_heading(&format!("Pricing: {} in {}", quote.instance_type, quote.region));
    println!(
        "On-demand:              {} {}",
        format_currency(quote.on_demand.price, &quote.on_demand.currency),
        quote.on_demand.unit.dimmed()
    );
    println!(
        "Spot:                   {} {} ({} off, {} interruption risk)",
        format_currency(quote.spot.price, &quote.spot.currency).green(),
        quote.spot.unit.dimmed(),
        quote.spot.discount,
        quote.spot.interruption_risk
    );
    println!();

    println!("{}", "Monthly".bold());
    println!("{}", "-".repeat(50));
    println!(
        "On-demand:              {}",
        format_currency(quote.monthly.on_demand, &quote.on_demand.currency)
    );
    println!(
        "Spot:                   {}",
        format_currency(quote.monthly.spot, &quote.spot.currency)
    );
    println!(
        "{}               {}",
        "Savings:".bold(),
        format_currency(quote.monthly.savings, &quote.spot.currency)
            .green()
            .bold()
    );

    if quote.on_demand.price == 0.0 {
        println!();
        println!("{}", "No price is known for this region and instance type".yellow());
    }

    Ok(())
}
