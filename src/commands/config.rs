//! `config` subcommands

use std::env;

use vaultkeeper_core::config::{set_env_value, ConfigFile};
use vaultkeeper_core::error::{Result, VaultError};
use vaultkeeper_core::OutputFormat;

use super::CommandContext;

pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = ctx.load_config()?;
    let config_file = ConfigFile::default_path()?;

    match ctx.format() {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "vault_path": config.vault_path.display().to_string(),
                "api_key": config.masked_api_key(),
                "model": config.model,
                "max_rounds": config.max_rounds,
                "latitude": config.latitude,
                "longitude": config.longitude,
                "daily_notes_folder": config.layout.daily_notes_folder,
                "journal_folder": config.layout.journal_folder,
                "folder_rules": config.folder_rules.rules(),
                "config_file": config_file.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            let location = match config.location() {
                Some((lat, lon)) => format!("{}, {}", lat, lon),
                None => "(not set)".to_string(),
            };
            println!("Vault path:    {}", config.vault_path.display());
            println!("API key:       {}", config.masked_api_key());
            println!("Model:         {}", config.model);
            println!("Max rounds:    {}", config.max_rounds);
            println!("Location:      {}", location);
            println!("Daily notes:   {}", config.layout.daily_notes_folder);
            println!("Journal:       {}", config.layout.journal_folder);
            println!("Config file:   {}", config_file.display());
        }
    }
    Ok(())
}

pub fn execute_set(ctx: &CommandContext, key: &str, value: &str) -> Result<()> {
    let env_path = env::current_dir()
        .map_err(|e| VaultError::io_operation("resolve", "current directory", e))?
        .join(".env");
    set_env_value(&env_path, key, value)?;

    match ctx.format() {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "key": key, "path": env_path.display().to_string() })
        ),
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!("Set {} in .env", key);
            }
        }
    }
    Ok(())
}
