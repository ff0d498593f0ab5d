mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Completions(args) = &cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "tunly", &mut std::io::stdout());
        return Ok(());
    }

    // Output defaults tolerate a broken file; `config show` loads strictly.
    let path = commands::config_path(&cli.global);
    let cfg = tunly_config::load_config_from(&path).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable config");
        tunly_config::Config::default()
    });
    let ctx = Context::resolve(&cli.global, &cfg)?;

    tracing::debug!(command = ?cli.command, format = ?ctx.format, "dispatching command");
    commands::dispatch(cli.command, &ctx)
}
