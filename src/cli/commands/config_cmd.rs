//! config command - Show the resolved configuration or persist the API URL

use anyhow::{Context as _, Result};

use super::Context;
use crate::core::config::{schema, Config};
use crate::ui::output;

/// Print the resolved configuration.
pub fn show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let source = config
        .global_config_loaded_from()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());

    println!("config_file = {}", source);
    println!("api_base_url = {}", config.api_base_url());
    println!("refresh_timeout_secs = {}", config.refresh_timeout().as_secs());
    println!("request_timeout_secs = {}", config.request_timeout().as_secs());
    println!("user_agent = {}", config.user_agent());
    println!("secrets.provider = {}", config.secrets_provider());
    Ok(())
}

/// Persist the backend base URL to the canonical config file.
///
/// Other values already in the file are kept.
pub fn set_api_url(ctx: &Context, url: &str) -> Result<()> {
    schema::validate_base_url(url)?;

    let path = Config::global_config_path()?;
    let mut global = if path.exists() {
        Config::read_global_config(&path)?
    } else {
        Default::default()
    };
    global.api_base_url = Some(url.trim_end_matches('/').to_string());
    global.validate()?;

    let written = Config::write_global(&global).context("Failed to write config")?;
    output::success(
        format!("api_base_url set in {}.", written.display()),
        ctx.verbosity,
    );
    Ok(())
}
