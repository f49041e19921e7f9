//! `emk bulk` – download every pair of a set of emoji.

use anyhow::Result;
use emk_core::config::EmkConfig;
use emk_core::emoji::{all_pairs, normalize_token, top_emojis};
use emk_core::scheduler::DownloadItem;
use emk_core::url_model::ImageSize;

use super::download::run_items;

/// Emoji set for bulk mode: the given tokens, or the built-in top 100.
pub(super) fn emoji_set(tokens: &[String]) -> Result<Vec<String>> {
    if tokens.is_empty() {
        return Ok(top_emojis());
    }
    let mut set: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let emoji = normalize_token(token)?;
        if !set.contains(&emoji) {
            set.push(emoji);
        }
    }
    Ok(set)
}

pub async fn run_bulk(cfg: &EmkConfig, tokens: &[String], quiet: bool) -> Result<bool> {
    let set = emoji_set(tokens)?;
    let size = ImageSize::new(cfg.size)?;
    let items = all_pairs(&set)
        .into_iter()
        .map(|pair| DownloadItem::from_api(&cfg.api_base_url, pair, size))
        .collect::<Result<Vec<_>>>()?;
    if !quiet {
        println!("{} emoji → {} pairs", set.len(), items.len());
    }
    run_items(cfg, items, quiet).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_top_emojis() {
        assert_eq!(emoji_set(&[]).unwrap().len(), 100);
    }

    #[test]
    fn given_set_is_normalized_and_deduped() {
        let tokens = vec!["😀".to_string(), "1f600".to_string(), "🐶".to_string()];
        assert_eq!(emoji_set(&tokens).unwrap(), vec!["😀", "🐶"]);
        assert!(emoji_set(&["dog".to_string()]).is_err());
    }
}
