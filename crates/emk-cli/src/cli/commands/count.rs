//! `emk count` – number of downloaded images.

use anyhow::Result;
use emk_core::config::EmkConfig;
use emk_core::emoji::normalize_token;
use emk_core::storage::StorageManager;

pub fn run_count(cfg: &EmkConfig, emoji: Option<&str>) -> Result<()> {
    let storage = StorageManager::new(cfg.output_dir(), cfg.filename_format)?;
    match emoji {
        Some(token) => {
            let emoji = normalize_token(token)?;
            let n = storage.count_files(Some(&emoji))?;
            println!("{} image(s) for {} in {}", n, emoji, storage.emoji_dir(&emoji).display());
        }
        None => {
            let n = storage.count_files(None)?;
            println!("{} image(s) in {}", n, storage.base_dir().display());
        }
    }
    Ok(())
}
