//! Clap derive structures for the `tunly` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tunly -- proxy link and subscription tooling
#[derive(Debug, Parser)]
#[command(
    name = "tunly",
    version,
    about = "Inspect, build, and extract vless:// proxy links",
    long_about = "Command-line companion to the tunly proxy client.\n\n\
        Decodes and encodes vless:// links, pulls links out of subscription\n\
        bodies, and manages the shared tunly configuration file.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "TUNLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (overrides `defaults.output` from the config file)
    #[arg(long, short = 'o', env = "TUNLY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode, encode, and name vless:// links
    #[command(alias = "l")]
    Link(LinkArgs),

    /// Work with subscription bodies
    #[command(alias = "subscription")]
    Sub(SubArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Link ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LinkArgs {
    #[command(subcommand)]
    pub command: LinkCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinkCommand {
    /// Decode a link into its fields
    Parse {
        /// The vless:// link
        link: String,
    },

    /// Encode fields into a link
    Build(BuildArgs),

    /// Print the name a new profile would get for this link
    Name {
        /// The vless:// link
        link: String,
    },
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// User id
    #[arg(long)]
    pub uuid: String,

    /// Server host or IP
    #[arg(long)]
    pub address: String,

    /// Server port
    #[arg(long)]
    pub port: u16,

    /// Display name (link fragment)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Security layer: none, tls, reality, or any other value
    #[arg(long, default_value = "none")]
    pub security: String,

    /// Transport: tcp, ws, grpc, http, or any other value
    #[arg(long = "type", default_value = "tcp")]
    pub transport: String,

    #[arg(long)]
    pub flow: Option<String>,

    /// Server name indication
    #[arg(long)]
    pub sni: Option<String>,

    /// Reality public key
    #[arg(long)]
    pub pbk: Option<String>,

    /// Reality short id
    #[arg(long)]
    pub sid: Option<String>,

    /// TLS fingerprint
    #[arg(long)]
    pub fp: Option<String>,

    /// WebSocket / HTTP path
    #[arg(long)]
    pub path: Option<String>,

    /// Host header
    #[arg(long)]
    pub host: Option<String>,
}

// ── Subscription ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SubArgs {
    #[command(subcommand)]
    pub command: SubCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubCommand {
    /// List the links contained in a subscription body (plain or base64)
    Extract {
        /// File holding the body; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display the resolved configuration (file + environment)
    Show,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
