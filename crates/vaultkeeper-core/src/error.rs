//! Error types and exit codes for vaultkeeper
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (filesystem, oracle, apply failures)
//! - 2: Usage error (bad flags/args/values)
//! - 3: Configuration error (missing vault, missing credentials, bad config file)

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Configuration error - missing vault path or credentials (3)
    Config = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during vaultkeeper operations
#[derive(Error, Debug)]
pub enum VaultError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Configuration errors (exit code 3)
    #[error("{key} not set in environment, .env, or config file")]
    MissingSetting { key: String },

    #[error("vault path does not exist: {path:?}")]
    VaultNotFound { path: PathBuf },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Generic failures (exit code 1)
    #[error("invalid frontmatter in {path:?}: {reason}")]
    InvalidFrontmatter { path: PathBuf, reason: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    #[error("{context} already exists: {value}")]
    AlreadyExists { context: String, value: String },

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("oracle request failed: {0}")]
    Oracle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl VaultError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        VaultError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        VaultError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that already exists
    pub fn already_exists(context: &str, value: impl std::fmt::Display) -> Self {
        VaultError::AlreadyExists {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        VaultError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed oracle round trip
    pub fn oracle(reason: impl std::fmt::Display) -> Self {
        VaultError::Oracle(reason.to_string())
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            VaultError::UnknownFormat(_)
            | VaultError::UsageError(_)
            | VaultError::InvalidValue { .. } => ExitCode::Usage,

            VaultError::MissingSetting { .. }
            | VaultError::VaultNotFound { .. }
            | VaultError::InvalidConfig { .. }
            | VaultError::Toml(_) => ExitCode::Config,

            VaultError::InvalidFrontmatter { .. }
            | VaultError::NotFound { .. }
            | VaultError::AlreadyExists { .. }
            | VaultError::FailedOperationWithTarget { .. }
            | VaultError::Oracle(_)
            | VaultError::Io(_)
            | VaultError::Yaml(_)
            | VaultError::Json(_)
            | VaultError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            VaultError::UnknownFormat(_) => "unknown_format",
            VaultError::UsageError(_) => "usage_error",
            VaultError::InvalidValue { .. } => "invalid_value",
            VaultError::MissingSetting { .. } => "missing_setting",
            VaultError::VaultNotFound { .. } => "vault_not_found",
            VaultError::InvalidConfig { .. } => "invalid_config",
            VaultError::InvalidFrontmatter { .. } => "invalid_frontmatter",
            VaultError::NotFound { .. } => "not_found",
            VaultError::AlreadyExists { .. } => "already_exists",
            VaultError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            VaultError::Oracle(_) => "oracle_error",
            VaultError::Io(_) => "io_error",
            VaultError::Yaml(_) => "yaml_error",
            VaultError::Json(_) => "json_error",
            VaultError::Toml(_) => "toml_error",
            VaultError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for vaultkeeper operations
pub type Result<T> = std::result::Result<T, VaultError>;
