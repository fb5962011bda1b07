//! Preset listing

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;
use wizard_lib::preset;

use crate::output::{print_heading, print_json, print_table, OutputFormat};

#[derive(Tabled)]
struct PresetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Spot %")]
    spot_ratio: String,
    #[tabled(rename = "Families")]
    families: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// List presets, regions and feature toggles. Needs no server.
pub fn list_presets(format: OutputFormat) -> Result<()> {
    let catalog = preset::catalog();

    if format == OutputFormat::Json {
        return print_json(&catalog);
    }

    let rows = catalog
        .presets
        .iter()
        .map(|(id, summary)| PresetRow {
            id: id.clone(),
            name: summary.name.clone(),
            spot_ratio: format!("{}%", summary.spot_ratio),
            families: summary.instance_families.join(", "),
            description: summary.description.clone(),
        })
        .collect();

    print_heading("Presets");
    print_table(rows);
    println!();

    println!("{}", "Regions".bold());
    println!("  {}", catalog.regions.join(", "));
    println!();

    println!("{}", "Features".bold());
    for (name, feature) in &catalog.features {
        let default = if feature.default { "on" } else { "off" };
        let name = format!("{:<26}", name);
        println!("  {} {} (default {})", name.cyan(), feature.description, default);
    }

    Ok(())
}
