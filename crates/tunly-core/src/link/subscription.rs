// ── Subscription body helpers ──
//
// Providers serve either a plain newline-separated link list or the same
// list wrapped in base64 (standard or URL-safe, padding optional).

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use super::{SCHEME_PREFIX, parse};

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Pull every proxy link out of a subscription response body.
///
/// Lines are trimmed; anything not starting with the link scheme is
/// skipped. Order is preserved and duplicates are kept.
pub fn extract_links(body: &str) -> Vec<String> {
    let content = decode_body(body).unwrap_or_else(|| body.to_owned());
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(SCHEME_PREFIX))
        .map(str::to_owned)
        .collect()
}

/// Display name for a freshly imported link: the decoded fragment, or the
/// host when the link has no name. `None` if the link doesn't decode.
pub fn default_profile_name(link: &str) -> Option<String> {
    let config = parse(link)?;
    if config.name.is_empty() {
        (!config.address.is_empty()).then_some(config.address)
    } else {
        Some(config.name)
    }
}

/// Try the whole body as base64. Line breaks inside the payload are
/// ignored; the decoded bytes must be UTF-8.
fn decode_body(body: &str) -> Option<String> {
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let bytes = STANDARD_LENIENT
        .decode(&compact)
        .or_else(|_| URL_SAFE_LENIENT.decode(&compact))
        .ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::engine::general_purpose;
    use pretty_assertions::assert_eq;

    const LIST: &str = "vless://a@one.example:443#One\n\
                        \n\
                        trojan://ignored@x:1\n  vless://b@two.example:8443?security=tls  \r\n";

    #[test]
    fn plain_body_keeps_only_vless_lines() {
        assert_eq!(
            extract_links(LIST),
            vec![
                "vless://a@one.example:443#One".to_owned(),
                "vless://b@two.example:8443?security=tls".to_owned(),
            ]
        );
    }

    #[test]
    fn standard_base64_body_is_decoded() {
        let body = general_purpose::STANDARD.encode(LIST);
        assert_eq!(extract_links(&body).len(), 2);
    }

    #[test]
    fn url_safe_unpadded_body_with_line_wrap_is_decoded() {
        let encoded = general_purpose::URL_SAFE_NO_PAD.encode(LIST);
        let (head, tail) = encoded.split_at(encoded.len() / 2);
        let body = format!("{head}\n{tail}\n");
        assert_eq!(extract_links(&body), extract_links(LIST));
    }

    #[test]
    fn empty_body_yields_nothing() {
        assert!(extract_links("").is_empty());
        assert!(extract_links("   \n").is_empty());
    }

    #[test]
    fn default_name_prefers_fragment_then_host() {
        assert_eq!(
            default_profile_name("vless://a@one.example:443#My%20Node").as_deref(),
            Some("My Node")
        );
        assert_eq!(
            default_profile_name("vless://a@two.example:443").as_deref(),
            Some("two.example")
        );
        assert_eq!(default_profile_name("garbage"), None);
    }
}
