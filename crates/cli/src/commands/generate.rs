//! Offline manifest generation

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use wizard_lib::{
    preset::features, synthesize, synthesizer::Customizations, ConfigRequest, Manifests, Preset,
};

use crate::config::Config;
use crate::output::{print_info, print_json, print_success, print_warning, OutputFormat};

/// Options for `kwiz generate`
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub preset: Option<String>,
    pub region: Option<String>,
    pub zone: Option<String>,
    pub consolidation: bool,
    pub ttl_after_empty: Option<u64>,
    pub ttl_until_expired: Option<u64>,
    pub output_dir: Option<PathBuf>,
}

/// Build a request from flags, falling back to configured defaults
pub fn build_request(options: &GenerateOptions, config: &Config) -> Result<ConfigRequest> {
    let preset = options
        .preset
        .clone()
        .or_else(|| config.default_preset.clone())
        .context("--preset is required (or set default_preset in the config file)")?;
    let region = options
        .region
        .clone()
        .or_else(|| config.default_region.clone())
        .context("--region is required (or set default_region in the config file)")?;

    let mut request = ConfigRequest::new(preset, region);
    if let Some(zone) = &options.zone {
        request = request.with_zone(zone.clone());
    }
    if options.consolidation {
        request = request.with_feature(features::CONSOLIDATION, true);
    }

    let mut customizations = Customizations::default();
    customizations.ttl_seconds_after_empty = options.ttl_after_empty;
    customizations.ttl_seconds_until_expired = options.ttl_until_expired;
    request.customizations = customizations;

    Ok(request)
}

/// Write both manifests into `dir`, returning the written paths
pub fn write_manifests(dir: &Path, manifests: &Manifests) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let files = [
        (Manifests::PROVISIONER_FILE, &manifests.provisioner),
        (Manifests::NODE_TEMPLATE_FILE, &manifests.node_template),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

pub fn generate(options: &GenerateOptions, config: &Config, format: OutputFormat) -> Result<()> {
    let request = build_request(options, config)?;
    let generated = synthesize(&request)?;

    if Preset::parse(&request.preset).is_none() {
        print_warning(&format!(
            "Unknown preset '{}', using {}",
            request.preset.trim(),
            generated.summary.resolved_preset
        ));
    }

    if format == OutputFormat::Json {
        return print_json(&generated);
    }

    let manifests = generated.to_manifests()?;

    match &options.output_dir {
        Some(dir) => {
            for path in write_manifests(dir, &manifests)? {
                print_success(&format!("Wrote {}", path.display()));
            }
            println!();
            for step in &generated.summary.instructions {
                print_info(step);
            }
        }
        None => {
            print!("{}", manifests.provisioner);
            println!("---");
            print!("{}", manifests.node_template);
        }
    }

    Ok(())
}
