//! Subscription subcommand handlers.

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tabled::Tabled;
use tunly_core::{VlessConfig, link};

use crate::cli::{SubArgs, SubCommand};
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

/// One link pulled from a subscription body.
#[derive(Debug, Serialize)]
struct ExtractedLink {
    #[serde(skip)]
    position: usize,
    link: String,
    name: Option<String>,
    /// `None` for a line that carries the scheme but doesn't decode.
    config: Option<VlessConfig>,
}

#[derive(Tabled)]
struct ExtractedRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "Type")]
    transport: String,
}

pub fn handle(args: SubArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        SubCommand::Extract { file } => {
            let (body, source_name) = read_body(file.as_deref())?;
            let links: Vec<ExtractedLink> = link::extract_links(&body)
                .into_iter()
                .enumerate()
                .map(|(i, raw)| ExtractedLink {
                    position: i + 1,
                    name: link::default_profile_name(&raw),
                    config: link::parse(&raw),
                    link: raw,
                })
                .collect();

            if links.is_empty() {
                return Err(CliError::NoLinks { source_name });
            }
            tracing::info!(count = links.len(), source = %source_name, "extracted links");

            let out = output::render_list(ctx.format, &links, to_row, |l| l.link.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}

fn to_row(extracted: &ExtractedLink) -> ExtractedRow {
    let dash = || "-".to_owned();
    let config = extracted.config.as_ref();
    ExtractedRow {
        index: extracted.position,
        name: extracted.name.clone().unwrap_or_else(dash),
        address: config.map_or_else(dash, |c| c.address.clone()),
        port: config.map_or_else(dash, |c| c.port.clone()),
        security: config.map_or_else(dash, |c| c.security.to_string()),
        transport: config.map_or_else(dash, |c| c.transport.to_string()),
    }
}

/// Read the body from a file, or stdin for `None` / `-`.
fn read_body(file: Option<&Path>) -> Result<(String, String), CliError> {
    match file {
        Some(path) if path != Path::new("-") => {
            let body = std::fs::read_to_string(path)?;
            Ok((body, path.display().to_string()))
        }
        _ => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok((body, "stdin".into()))
        }
    }
}
