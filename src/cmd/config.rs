//! Configuration commands: `a11y-verify config`.

use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;

use a11y_verify::config::{CONFIG_FILE, VerifyToml, default_config_dir};

use super::resolve_config;
use crate::{Cli, ConfigCommands};

pub fn cmd_config(cli: &Cli, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(cli),
        ConfigCommands::Init { base_url } => init(cli, base_url.as_deref()),
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| default_config_dir().join(CONFIG_FILE))
}

fn show(cli: &Cli) -> Result<()> {
    let path = config_path(cli);
    let config = resolve_config(cli)?;

    if path.exists() {
        println!("{} {}", style("Config file:").bold(), path.display());
    } else {
        println!("{} none (defaults)", style("Config file:").bold());
    }
    println!(
        "{} {}",
        style("Remote:").bold(),
        config.base_url.as_deref().unwrap_or("none")
    );
    println!("{} {}s", style("Timeout:").bold(), config.timeout.as_secs());
    println!("{} {}", style("Offline:").bold(), config.is_offline());
    println!("{} {}", style("Reviewer:").bold(), config.reviewer);
    println!(
        "{} {}",
        style("Token:").bold(),
        if config.api_token.is_some() { "set" } else { "not set" }
    );
    Ok(())
}

fn init(cli: &Cli, base_url: Option<&str>) -> Result<()> {
    let path = config_path(cli);
    if path.exists() {
        println!("{} already exists at {}", CONFIG_FILE, path.display());
        println!("Delete it first if you want to recreate it.");
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut toml = VerifyToml::default();
    toml.remote.base_url = base_url.map(str::to_string);
    toml.reviewer.name = cli.reviewer.clone();
    toml.save(&path)?;

    println!("Created {} at {}", CONFIG_FILE, path.display());
    Ok(())
}
