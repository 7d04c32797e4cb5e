//! Config command handlers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use eventdesk_core::config;

fn config_path() -> Result<PathBuf> {
    config::paths::config_path().context("No home directory available for the config file")
}

pub fn path() -> Result<()> {
    println!("{}", config_path()?.display());
    Ok(())
}

pub fn init() -> Result<()> {
    let config_path = config_path()?;
    config::Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    let config_path = config_path()?;
    config::Config::save_api_url_to(&config_path, url)
        .with_context(|| format!("update config at {}", config_path.display()))?;
    println!("Set api_url to {} in {}", url.trim(), config_path.display());
    Ok(())
}
