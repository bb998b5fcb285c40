use brochure_common::{BrochureError, Result};
use url::Url;

/// Accept only absolute http(s) URLs.
pub fn validate_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| BrochureError::Validation(format!("invalid website URL {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(BrochureError::Validation(
            "Only http(s) URLs are supported.".into(),
        )),
    }
}

/// `host[:port]` of an absolute URL. Default ports are omitted.
pub fn network_location(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// True when both URLs parse and share a network location.
pub fn same_domain(a: &str, b: &str) -> bool {
    match (network_location(a), network_location(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// First `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
