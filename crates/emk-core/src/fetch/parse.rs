//! Parse HTTP response header lines into ResponseHeaders.

/// The few response headers the downloader records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// `Content-Type`, without parameters (e.g. `image/png`).
    pub content_type: Option<String>,
    /// `Content-Length`, if present and numeric.
    pub content_length: Option<u64>,
    /// `ETag` with surrounding quotes removed.
    pub etag: Option<String>,
}

/// Parse collected header lines into ResponseHeaders.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                let mime = value.split(';').next().unwrap_or(value).trim();
                out.content_type = Some(mime.to_ascii_lowercase());
            } else if name.eq_ignore_ascii_case("content-length") {
                out.content_length = value.parse::<u64>().ok();
            } else if name.eq_ignore_ascii_case("etag") {
                out.etag = Some(value.trim_matches('"').to_string());
            }
        }
    }

    out
}
