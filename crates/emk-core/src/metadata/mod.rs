//! Cached copy of the Emoji Kitchen combination catalog.
//!
//! The catalog is a large static JSON document; it is downloaded once into
//! `~/.cache/emk/metadata.json` and parsed on demand. `ensure` prefers the
//! cached copy and only goes to the network when none exists.

mod catalog;

pub use catalog::{Catalog, Combination, CombinationEntry, EmojiEntry};

use anyhow::{Context, Result};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::fetch;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::storage::write_atomic;

/// The catalog is tens of megabytes; give it longer than an image request.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(120);

const CACHE_FILE: &str = "metadata.json";

/// State of the on-disk cache.
#[derive(Debug, Clone)]
pub struct CacheInfo {
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub modified: Option<SystemTime>,
}

impl CacheInfo {
    pub fn size_mib(&self) -> Option<f64> {
        self.size_bytes.map(|b| b as f64 / 1_048_576.0)
    }
}

#[derive(Debug, Clone)]
pub struct MetadataStore {
    cache_dir: PathBuf,
}

impl MetadataStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Store under `~/.cache/emk`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::config::cache_dir()?))
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE)
    }

    pub fn cache_info(&self) -> CacheInfo {
        let path = self.cache_path();
        let meta = std::fs::metadata(&path).ok().filter(|m| m.is_file());
        CacheInfo {
            exists: meta.is_some(),
            size_bytes: meta.as_ref().map(|m| m.len()),
            modified: meta.and_then(|m| m.modified().ok()),
            path,
        }
    }

    /// Downloads the catalog, checks that it parses, and replaces the cache
    /// atomically. A failed or malformed download leaves the old cache intact.
    pub async fn download(&self, url: &str, policy: &RetryPolicy) -> Result<Catalog> {
        tracing::info!(url, "downloading metadata catalog");
        let outcome = run_with_retry(policy, |_| {
            fetch::fetch_bytes_async(url.to_string(), METADATA_TIMEOUT)
        })
        .await;
        let fetched = outcome
            .result
            .with_context(|| format!("download metadata from {}", url))?;

        let catalog = Catalog::from_json_slice(&fetched.body).context("parse downloaded metadata")?;
        self.write_cache(&fetched.body)?;
        tracing::info!(
            bytes = fetched.body.len(),
            emoji = catalog.len(),
            "metadata cached at {}",
            self.cache_path().display()
        );
        Ok(catalog)
    }

    fn write_cache(&self, body: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.cache_dir)
            .with_context(|| format!("create cache dir: {}", self.cache_dir.display()))?;
        write_atomic(&self.cache_path(), body)
    }

    /// Loads the cached catalog. `Ok(None)` if there is no cache file.
    pub fn load(&self) -> Result<Option<Catalog>> {
        load_path(&self.cache_path())
    }

    /// Cached catalog if present, otherwise downloads it.
    pub async fn ensure(&self, url: &str, policy: &RetryPolicy) -> Result<Catalog> {
        if let Some(catalog) = self.load()? {
            return Ok(catalog);
        }
        self.download(url, policy).await
    }
}

fn load_path(path: &Path) -> Result<Option<Catalog>> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("open metadata: {}", path.display())),
    };
    let raw: catalog::RawCatalog = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse metadata: {}", path.display()))?;
    Ok(Some(Catalog::from_raw(raw)))
}
