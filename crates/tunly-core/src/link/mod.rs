// ── Proxy link codec ──
//
// Converts between the `vless://` wire format and `VlessConfig`.
// Decoding never fails loudly: anything that isn't a well-formed link
// yields `None` and the caller falls back to raw editing.

mod subscription;

use url::Url;
use url::form_urlencoded;

use crate::model::{Security, Transport, VlessConfig};

pub use subscription::{default_profile_name, extract_links};

/// Scheme prefix every supported link starts with.
pub const SCHEME_PREFIX: &str = "vless://";

/// Decode a proxy link.
///
/// Returns `None` when `link` doesn't start with [`SCHEME_PREFIX`] or is
/// not a syntactically valid URI. Query values are taken from the first
/// occurrence of each key; an empty `security=` / `type=` counts as absent.
/// The port is kept as written, so `:0443` stays `"0443"`.
pub fn parse(link: &str) -> Option<VlessConfig> {
    if !link.starts_with(SCHEME_PREFIX) {
        return None;
    }
    let url = Url::parse(link).ok()?;

    let param = |key: &str| -> String {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default()
    };

    Some(VlessConfig {
        uuid: percent_decode(url.username()),
        address: url.host_str().unwrap_or_default().to_owned(),
        port: url.port().and_then(|_| raw_port(link)).unwrap_or_default().to_owned(),
        name: url.fragment().map(percent_decode).unwrap_or_default(),
        security: Security::from_param(&param("security")),
        transport: Transport::from_param(&param("type")),
        flow: param("flow"),
        sni: param("sni"),
        pbk: param("pbk"),
        sid: param("sid"),
        fp: param("fp"),
        path: param("path"),
        host: param("host"),
    })
}

/// The port exactly as it appears in the authority of an already validated
/// link, before `Url` normalizes it to a number.
fn raw_port(link: &str) -> Option<&str> {
    let rest = link.strip_prefix(SCHEME_PREFIX)?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    // Skip past a bracketed IPv6 host so its colons aren't mistaken for the port.
    let after_host = host_port
        .rfind(']')
        .map_or(host_port, |end| &host_port[end + 1..]);
    after_host.rsplit_once(':').map(|(_, port)| port)
}

/// Encode a config back into a link.
///
/// Parameters are emitted in a fixed order and only when non-empty. Security
/// and transport always have a wire value, so the query is never empty. The
/// fragment only appears for a non-empty name.
pub fn build(config: &VlessConfig) -> String {
    let mut link = format!(
        "{SCHEME_PREFIX}{}@{}:{}",
        urlencoding::encode(&config.uuid),
        config.address,
        config.port
    );

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in config.query_params() {
        if !value.is_empty() {
            serializer.append_pair(key, value);
        }
    }
    link.push('?');
    link.push_str(&serializer.finish());

    if !config.name.is_empty() {
        link.push('#');
        link.push_str(&urlencoding::encode(&config.name));
    }
    link
}

/// Percent-decode, keeping the raw text when the result isn't UTF-8.
fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), |s| s.into_owned())
}
