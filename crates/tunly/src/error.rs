//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tunly_config::ConfigError;
use tunly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INVALID_LINK: i32 = 3;
    pub const CONFIG: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Links ────────────────────────────────────────────────────────
    #[error("Not a valid vless:// link: {reason}")]
    #[diagnostic(
        code(tunly::invalid_link),
        help(
            "Expected vless://<uuid>@<address>:<port>?<params>#<name>.\n\
             Quote the link so the shell leaves '&' and '#' alone."
        )
    )]
    InvalidLink { reason: String },

    #[error("No links found in {source_name}")]
    #[diagnostic(
        code(tunly::empty_subscription),
        help("The body must contain vless:// lines, either as plain text or base64.")
    )]
    NoLinks { source_name: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tunly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists")]
    #[diagnostic(
        code(tunly::config_exists),
        help(
            "Found: {path}\n\
             Re-run with --force to overwrite it."
        )
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(tunly::config),
        help("Check the config file (tunly config path) and TUNLY_* environment variables.")
    )]
    Config(#[from] ConfigError),

    // ── Core ─────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(tunly::core))]
    Core(CoreError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(tunly::serialize))]
    Serialize(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidLink { .. } | Self::NoLinks { .. } => exit_code::INVALID_LINK,
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            Self::Config(_) => exit_code::CONFIG,
            Self::Core(_) | Self::Io(_) | Self::Serialize(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidLink { reason } => Self::InvalidLink { reason },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            other => Self::Core(other),
        }
    }
}
