/// Configuration resolution module
///
/// This module handles:
/// - Reading the optional TOML settings file
/// - Merging file settings with CLI flags (flags win)
/// - Producing the immutable `RenderOptions` used for the whole report
use crate::cli::CliArgs;
use crate::render::RenderOptions;
use crate::units::{ByteBase, UnitConfig};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings accepted in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub verbose: Option<bool>,
    pub host_ports: Option<bool>,
    pub byte_units: Option<ByteBase>,
}

/// Parse config file contents
pub fn parse_config(text: &str) -> Result<ConfigFile, String> {
    toml::from_str(text).map_err(|e| format!("Invalid config: {}", e))
}

/// Read and parse a config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_config(&text).map_err(|e| format!("{} ({})", e, path.display()))
}

/// Build the render options from CLI arguments and the optional config file
pub fn build_render_options(args: &CliArgs) -> Result<RenderOptions, String> {
    let file = match args.config {
        Some(ref path) => {
            debug!("Loading config from {:?}", path);
            load_config_file(path)?
        }
        None => ConfigFile::default(),
    };

    let opts = resolve(args, &file);
    debug!("Render options: {:?}", opts);
    Ok(opts)
}

fn resolve(args: &CliArgs, file: &ConfigFile) -> RenderOptions {
    let byte_base = args.byte_units.or(file.byte_units).unwrap_or_default();

    RenderOptions::default()
        .with_verbose(args.verbose || file.verbose.unwrap_or(false))
        .with_host_ports(args.host_ports || file.host_ports.unwrap_or(false))
        .with_units(UnitConfig { byte_base })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
