//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use shelf_core::{Config, Flavor};

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "flavor": config.flavor.as_str(),
                    "notice_timeout_ms": config.notice_timeout_ms,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:          {}", config.data_dir.display());
            println!("  flavor:            {}", config.flavor);
            println!(
                "  notice_timeout_ms: {}",
                config
                    .notice_timeout_ms
                    .map(|ms| ms.to_string())
                    .unwrap_or_else(|| format!(
                        "(default: {})",
                        config.flavor.default_notice_timeout_ms()
                    ))
            );
            println!(
                "  log_file:          {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Set `key` on `config` from its string form
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "flavor" => {
            config.flavor = value
                .parse::<Flavor>()
                .map_err(|e| anyhow::anyhow!(e))
                .context("Invalid value for flavor. Use 'tracker' or 'library'.")?;
        }
        "notice_timeout_ms" => {
            config.notice_timeout_ms = if value.is_empty() || value == "none" {
                None
            } else {
                Some(
                    value
                        .parse()
                        .context("Invalid value for notice_timeout_ms. Use milliseconds.")?,
                )
            };
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, flavor, notice_timeout_ms, log_file",
                key
            );
        }
    }
    Ok(())
}
