//! HTTP GET client for images and the metadata catalog.
//!
//! Uses the curl crate (libcurl). One request per call, redirects followed,
//! body collected in memory: combination PNGs are small, and the catalog is
//! read once per session. Runs in the current thread; async callers go
//! through [`fetch_bytes_async`], which hops onto the blocking pool.

mod parse;

use std::str;
use std::time::Duration;

pub use parse::ResponseHeaders;

/// Identifies the client to the wrapper API and CDN.
pub const USER_AGENT: &str = concat!("emk/", env!("CARGO_PKG_VERSION"));

/// Error from a single GET, kept typed so the retry policy can classify it.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {status} for {url}")]
    Http { status: u32, url: String },
    /// The blocking task running the request panicked or was cancelled.
    #[error("request task failed: {0}")]
    Join(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Successful response.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u32,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

/// Performs a GET and returns the full body. Non-2xx statuses become
/// [`FetchError::Http`]; the body of an error response is discarded.
pub fn fetch_bytes(url: &str, timeout: Duration) -> Result<Fetched, FetchError> {
    let mut body: Vec<u8> = Vec::new();
    let mut header_lines: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.useragent(USER_AGENT)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(timeout.min(Duration::from_secs(15)))?;
    easy.timeout(timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                // Headers of an earlier redirect hop are dropped at each status line.
                if s.starts_with("HTTP/") {
                    header_lines.clear();
                }
                header_lines.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    if !(200..300).contains(&status) {
        return Err(FetchError::Http {
            status,
            url: url.to_string(),
        });
    }

    Ok(Fetched {
        status,
        headers: parse::parse_headers(&header_lines),
        body,
    })
}

/// [`fetch_bytes`] on tokio's blocking pool.
pub async fn fetch_bytes_async(url: String, timeout: Duration) -> Result<Fetched, FetchError> {
    tokio::task::spawn_blocking(move || fetch_bytes(&url, timeout))
        .await
        .map_err(|e| FetchError::Join(e.to_string()))?
}
