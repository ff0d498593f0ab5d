//! Link subcommand handlers.

use serde::Serialize;
use tunly_core::{CoreError, Security, Transport, VlessConfig, link};

use crate::cli::{BuildArgs, LinkArgs, LinkCommand};
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct BuiltLink {
    link: String,
}

#[derive(Debug, Serialize)]
struct LinkName {
    name: String,
}

pub fn handle(args: LinkArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        LinkCommand::Parse { link: raw } => {
            let config = decode(&raw)?;
            tracing::debug!(address = %config.address, port = %config.port, "decoded link");
            let out = output::render_single(
                ctx.format,
                &config,
                |c| detail(c, ctx.color),
                link::build,
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        LinkCommand::Build(build) => {
            let config = from_args(build);
            let built = BuiltLink {
                link: link::build(&config),
            };
            let out = output::render_single(
                ctx.format,
                &built,
                |b| b.link.clone(),
                |b| b.link.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        LinkCommand::Name { link: raw } => {
            decode(&raw)?;
            let name = link::default_profile_name(raw.trim()).ok_or_else(|| {
                CoreError::InvalidLink {
                    reason: "link has neither a name nor an address".into(),
                }
            })?;
            let named = LinkName { name };
            let out = output::render_single(
                ctx.format,
                &named,
                |n| n.name.clone(),
                |n| n.name.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}

fn decode(raw: &str) -> Result<VlessConfig, CoreError> {
    let raw = raw.trim();
    if !raw.starts_with(link::SCHEME_PREFIX) {
        return Err(not_a_link());
    }
    link::parse(raw).ok_or_else(|| CoreError::InvalidLink {
        reason: "malformed URI".into(),
    })
}

fn not_a_link() -> CoreError {
    CoreError::InvalidLink {
        reason: format!("expected a link starting with {}", link::SCHEME_PREFIX),
    }
}

fn from_args(args: BuildArgs) -> VlessConfig {
    VlessConfig {
        uuid: args.uuid,
        address: args.address,
        port: args.port.to_string(),
        name: args.name.unwrap_or_default(),
        security: Security::from_param(&args.security),
        transport: Transport::from_param(&args.transport),
        flow: args.flow.unwrap_or_default(),
        sni: args.sni.unwrap_or_default(),
        pbk: args.pbk.unwrap_or_default(),
        sid: args.sid.unwrap_or_default(),
        fp: args.fp.unwrap_or_default(),
        path: args.path.unwrap_or_default(),
        host: args.host.unwrap_or_default(),
    }
}

/// Detail view: positional parts first, then only the parameters that are set.
fn detail(config: &VlessConfig, color: bool) -> String {
    let mut rows = vec![
        ("name", display_or_dash(&config.name)),
        ("uuid", config.uuid.clone()),
        ("address", config.address.clone()),
        ("port", config.port.clone()),
    ];
    rows.extend(
        config
            .query_params()
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key, value.to_owned())),
    );
    output::render_detail(&rows, color)
}

fn display_or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".into()
    } else {
        value.to_owned()
    }
}
