//! CLI argument parsing for vaultkeeper
//!
//! Global flags: --format, --quiet, --verbose, --log-level, --log-json

pub mod parse;

use clap::{Parser, Subcommand};

use parse::{parse_format, parse_reflection_type};
pub use vaultkeeper_core::format::OutputFormat;
use vaultkeeper_core::note::ReflectionType;

/// Vaultkeeper - journal capture, day planning and vault upkeep for markdown vaults
#[derive(Parser, Debug)]
#[command(name = "vaultkeeper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human or json)
    #[arg(long, global = true, default_value = "human", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug logging and phase timings on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (e.g. debug, vaultkeeper_core=trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a guided journal reflection
    Journal {
        /// Reflection type (end-of-day, end-of-project, podcast, meeting, reading, free-form)
        #[arg(long = "type", short = 't', value_parser = parse_reflection_type)]
        reflection_type: Option<ReflectionType>,
    },

    /// Plan today and write it into the daily note
    Plan {
        /// Write the plan without asking for confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Suggest and apply vault maintenance
    Organize {
        #[command(subcommand)]
        command: OrganizeCommands,
    },

    /// View and set configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum OrganizeCommands {
    /// Suggest wikilinks between existing notes
    Links {
        /// Apply changes (default: preview only)
        #[arg(long)]
        apply: bool,

        /// Also ask the language model for semantic links
        #[arg(long)]
        deep: bool,
    },

    /// Standardize YAML frontmatter across notes
    Frontmatter {
        /// Apply changes (default: preview only)
        #[arg(long)]
        apply: bool,
    },

    /// Suggest folders for notes at the vault root
    Structure {
        /// Apply changes (default: preview only)
        #[arg(long)]
        apply: bool,

        /// Classify with the language model instead of keyword rules
        #[arg(long)]
        deep: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show,

    /// Set a value in ./.env
    Set {
        /// Setting name (e.g. OBSIDIAN_VAULT_PATH)
        key: String,

        /// Value to store
        value: String,
    },
}
