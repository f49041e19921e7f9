//! `emk all` – every catalogued combination of one emoji, from the static CDN.

use anyhow::Result;
use emk_core::config::EmkConfig;
use emk_core::emoji::normalize_token;
use emk_core::metadata::MetadataStore;
use emk_core::scheduler::DownloadItem;

use super::download::run_items;

pub async fn run_all(cfg: &EmkConfig, emoji: &str, limit: Option<usize>, quiet: bool) -> Result<bool> {
    let emoji = normalize_token(emoji)?;
    let store = MetadataStore::open_default()?;
    let catalog = store.ensure(&cfg.metadata_url, &cfg.retry_policy()).await?;

    let mut combos = catalog.find_combinations(&emoji);
    if combos.is_empty() {
        println!("No combinations found for {}", emoji);
        return Ok(true);
    }
    let available = combos.len();
    if let Some(n) = limit {
        combos.truncate(n);
    }
    if !quiet {
        println!("{} has {} combination(s); downloading {}", emoji, available, combos.len());
    }
    let items = combos.into_iter().map(DownloadItem::from_combination).collect();
    run_items(cfg, items, quiet).await
}
