//! URL modeling for the two image sources and filename sanitization.
//!
//! The wrapper API renders a pair from the emoji in the URL path:
//! `{base}/s/{left}_{right}?size={size}`. The Google static CDN serves
//! pre-rendered PNGs under a date-versioned path keyed by code points.

mod gstatic;
mod sanitize;

pub use gstatic::{gstatic_url, GSTATIC_BASE_URL};
pub use sanitize::sanitize_component;

use anyhow::{Context, Result};
use std::fmt;

use crate::emoji::EmojiPair;

/// Smallest and largest image edge the wrapper API is asked for.
pub const MIN_SIZE: u32 = 16;
pub const MAX_SIZE: u32 = 1024;

/// Validated square image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize(u32);

impl ImageSize {
    pub fn new(px: u32) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&px) {
            anyhow::bail!("image size {} out of range {}..={}", px, MIN_SIZE, MAX_SIZE);
        }
        Ok(Self(px))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self(512)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds the wrapper API URL for a pair. The emoji are percent-encoded as a
/// single path segment; any path already on `base` is preserved.
pub fn api_url(base: &str, pair: &EmojiPair, size: ImageSize) -> Result<String> {
    let mut url = url::Url::parse(base).with_context(|| format!("invalid API base URL: {}", base))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API base URL cannot carry a path: {}", base))?;
        segments.pop_if_empty();
        segments.push("s");
        segments.push(&format!("{}_{}", pair.left, pair.right));
    }
    url.query_pairs_mut()
        .clear()
        .append_pair("size", &size.get().to_string());
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_size_bounds() {
        assert!(ImageSize::new(15).is_err());
        assert!(ImageSize::new(1025).is_err());
        assert_eq!(ImageSize::new(16).unwrap().get(), 16);
        assert_eq!(ImageSize::new(1024).unwrap().get(), 1024);
        assert_eq!(ImageSize::default().get(), 512);
    }

    #[test]
    fn api_url_encodes_emoji_segment() {
        let pair = EmojiPair::new("😀", "🐶");
        let url = api_url("https://emojik.vercel.app", &pair, ImageSize::new(128).unwrap()).unwrap();
        assert_eq!(
            url,
            "https://emojik.vercel.app/s/%F0%9F%98%80_%F0%9F%90%B6?size=128"
        );
    }

    #[test]
    fn api_url_keeps_base_path() {
        let pair = EmojiPair::new("😀", "😀");
        let url = api_url("http://127.0.0.1:8080/proxy/", &pair, ImageSize::default()).unwrap();
        assert!(url.starts_with("http://127.0.0.1:8080/proxy/s/"));
        assert!(url.ends_with("?size=512"));
    }

    #[test]
    fn api_url_rejects_garbage_base() {
        let pair = EmojiPair::new("😀", "😀");
        assert!(api_url("not a url", &pair, ImageSize::default()).is_err());
        assert!(api_url("mailto:someone@example.com", &pair, ImageSize::default()).is_err());
    }
}
