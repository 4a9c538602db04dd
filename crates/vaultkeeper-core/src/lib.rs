//! Vaultkeeper Core Library
//!
//! Domain logic for the vaultkeeper vault assistant: the note model and vault
//! store, the scan-and-reconcile engine, and the conversational journal and
//! planning flows built on a language model oracle.

pub mod config;
pub mod dialogue;
pub mod error;
pub mod format;
pub mod journal;
pub mod logging;
pub mod note;
pub mod oracle;
pub mod plan;
pub mod reconcile;
pub mod store;
pub mod text;
pub mod weather;

pub use config::Config;
pub use error::{ExitCode, Result, VaultError};
pub use format::OutputFormat;
pub use note::{Frontmatter, Note};
pub use store::Vault;
