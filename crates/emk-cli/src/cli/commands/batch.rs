//! `emk batch` – download the pairs listed in a file.

use anyhow::{Context, Result};
use emk_core::config::EmkConfig;
use emk_core::emoji::read_pair_file;
use emk_core::scheduler::DownloadItem;
use emk_core::url_model::ImageSize;
use std::path::Path;

use super::download::run_items;

pub async fn run_batch(cfg: &EmkConfig, file: &Path, quiet: bool) -> Result<bool> {
    let pairs = read_pair_file(file)?;
    if pairs.is_empty() {
        println!("No pairs in {}", file.display());
        return Ok(true);
    }
    let size = ImageSize::new(cfg.size)?;
    let items = pairs
        .into_iter()
        .map(|pair| DownloadItem::from_api(&cfg.api_base_url, pair, size))
        .collect::<Result<Vec<_>>>()
        .context("build download URLs")?;
    tracing::info!(file = %file.display(), pairs = items.len(), "batch from file");
    run_items(cfg, items, quiet).await
}
