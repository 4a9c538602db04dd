//! Command dispatch for vaultkeeper

mod config;
mod journal;
mod organize;
mod plan;
mod terminal;

use std::time::{Duration, Instant};

use tracing::debug;

use crate::cli::{Cli, Commands, ConfigCommands, OrganizeCommands, OutputFormat};
use vaultkeeper_core::error::Result;
use vaultkeeper_core::oracle::AnthropicOracle;
use vaultkeeper_core::{Config, Vault};

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, start: Instant) -> Self {
        Self { cli, start }
    }

    pub fn format(&self) -> OutputFormat {
        self.cli.format
    }

    /// Progress and hints go to stderr in human mode unless `--quiet`
    pub fn chatty(&self) -> bool {
        self.cli.format == OutputFormat::Human && !self.cli.quiet
    }

    pub fn load_config(&self) -> Result<Config> {
        let config = Config::load()?;
        debug!(elapsed = ?self.start.elapsed(), vault = %config.vault_path.display(), "load_config");
        Ok(config)
    }
}

/// Open the configured vault with its folder layout
pub fn open_vault(config: &Config) -> Result<Vault> {
    Ok(Vault::open(&config.vault_path)?.with_layout(config.layout.clone()))
}

/// Language model client; fails with a configuration error when no key is set
pub fn build_oracle(config: &Config) -> Result<AnthropicOracle> {
    let api_key = config.require_api_key()?;
    let oracle = AnthropicOracle::new(
        api_key,
        &config.model,
        Duration::from_secs(config.request_timeout_secs),
    );
    debug!(model = oracle.model(), "oracle ready");
    Ok(oracle)
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("vaultkeeper {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Journal capture, day planning and upkeep for markdown note vaults.");
        println!();
        println!("Run `vaultkeeper --help` for usage information.");
        Ok(())
    }
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Journal { reflection_type } => journal::execute(ctx, *reflection_type),
            Commands::Plan { yes } => plan::execute(ctx, *yes),
            Commands::Organize { command } => match command {
                OrganizeCommands::Links { apply, deep } => {
                    organize::execute_links(ctx, *apply, *deep)
                }
                OrganizeCommands::Frontmatter { apply } => {
                    organize::execute_frontmatter(ctx, *apply)
                }
                OrganizeCommands::Structure { apply, deep } => {
                    organize::execute_structure(ctx, *apply, *deep)
                }
            },
            Commands::Config { command } => match command {
                ConfigCommands::Show => config::execute_show(ctx),
                ConfigCommands::Set { key, value } => config::execute_set(ctx, key, value),
            },
        }
    }
}

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let ctx = CommandContext::new(cli, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
