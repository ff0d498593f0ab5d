//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod config_cmd;
pub mod link;
pub mod sub;

use std::path::PathBuf;

use clap::ValueEnum;
use tunly_config::Config;

use crate::cli::{ColorMode, Command, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Resolved presentation settings shared by every handler.
#[derive(Debug, Clone)]
pub struct Context {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub config_path: PathBuf,
}

impl Context {
    /// Merge global flags over the config file's `[defaults]`.
    pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Self, CliError> {
        let format = match global.output {
            Some(format) => format,
            None => parse_default::<OutputFormat>("defaults.output", &cfg.defaults.output)?,
        };
        let color = match global.color {
            Some(mode) => mode,
            None => parse_default::<ColorMode>("defaults.color", &cfg.defaults.color)?,
        };

        Ok(Self {
            format,
            color: crate::output::should_color(color),
            quiet: global.quiet,
            config_path: config_path(global),
        })
    }
}

fn parse_default<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

/// The config file in effect: `--config` / `TUNLY_CONFIG`, else the platform path.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(tunly_config::config_path)
}

/// Dispatch a command to the appropriate handler.
pub fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Link(args) => link::handle(args, ctx),
        Command::Sub(args) => sub::handle(args, ctx),
        Command::Config(args) => config_cmd::handle(args, ctx),
        // Completions are handled before dispatch
        Command::Completions(_) => Ok(()),
    }
}
