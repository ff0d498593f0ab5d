//! Config subcommand handlers.

use tunly_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&ctx.config_path.display().to_string(), ctx.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = tunly_config::load_config_from(&ctx.config_path)?;
            // Reject values the core can't run with, not just malformed TOML.
            cfg.to_core_config()?;

            let out = output::render_single(ctx.format, &cfg, render_toml, render_toml)?;
            output::print_output(out.trim_end(), ctx.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = &ctx.config_path;
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            tunly_config::save_config_to(&Config::default(), path)?;
            tracing::info!(path = %path.display(), "wrote default config");
            if !ctx.quiet {
                eprintln!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}

fn render_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}
