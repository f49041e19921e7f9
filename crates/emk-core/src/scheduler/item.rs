//! Work items, options, and per-item outcomes.

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::EmkConfig;
use crate::emoji::EmojiPair;
use crate::metadata::Combination;
use crate::retry::{ErrorKind, RetryPolicy};
use crate::url_model::{api_url, ImageSize};

/// One combination to fetch: the pair (which decides the file path) and the
/// URL it is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    pub pair: EmojiPair,
    pub url: String,
}

impl DownloadItem {
    /// Item served by the wrapper API.
    pub fn from_api(base: &str, pair: EmojiPair, size: ImageSize) -> Result<Self> {
        let url = api_url(base, &pair, size)?;
        Ok(Self { pair, url })
    }

    /// Item served by the Google static CDN, as listed in the catalog.
    pub fn from_combination(combo: Combination) -> Self {
        Self {
            pair: combo.pair,
            url: combo.url,
        }
    }
}

/// Knobs for one batch.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Maximum downloads in flight.
    pub max_concurrent: usize,
    /// Minimum spacing between request starts.
    pub delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Skip pairs already on disk without touching the network.
    pub skip_existing: bool,
    pub retry: RetryPolicy,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self::from_config(&EmkConfig::default())
    }
}

impl DownloadOptions {
    pub fn from_config(cfg: &EmkConfig) -> Self {
        Self {
            max_concurrent: cfg.max_concurrent.max(1),
            delay: cfg.delay(),
            timeout: cfg.timeout(),
            skip_existing: cfg.skip_existing,
            retry: cfg.retry_policy(),
        }
    }
}

/// Why an item failed. Not-found is not a failure; see [`PairOutcome::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request failed after retries (or was not retryable).
    Network(ErrorKind),
    /// The image arrived but could not be written.
    Storage,
}

impl FailureKind {
    pub fn label(self) -> &'static str {
        match self {
            FailureKind::Network(kind) => kind.label(),
            FailureKind::Storage => "IOError",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    Downloaded {
        path: PathBuf,
        bytes: u64,
        status: u32,
        sha256: String,
        content_type: Option<String>,
    },
    Skipped {
        path: PathBuf,
    },
    NotFound {
        status: u32,
    },
    Failed {
        kind: FailureKind,
        message: String,
        status: Option<u32>,
    },
}

impl PairOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, PairOutcome::Failed { .. })
    }
}

/// Outcome of one item plus timing.
#[derive(Debug, Clone)]
pub struct PairResult {
    pub item: DownloadItem,
    pub outcome: PairOutcome,
    /// HTTP attempts made (0 when skipped).
    pub attempts: u32,
    pub duration: Duration,
}
