//! `emk get` – download one combination.

use anyhow::Result;
use emk_core::config::EmkConfig;
use emk_core::emoji::EmojiPair;
use emk_core::scheduler::{self, DownloadItem, PairOutcome};
use emk_core::session_log::SessionLog;
use emk_core::url_model::ImageSize;

use super::download::orchestrator;

pub async fn run_get(cfg: &EmkConfig, left: &str, right: &str, quiet: bool) -> Result<bool> {
    let pair = EmojiPair::parse(left, right)?;
    let size = ImageSize::new(cfg.size)?;
    let item = DownloadItem::from_api(&cfg.api_base_url, pair, size)?;
    let orchestrator = orchestrator(cfg)?;

    let result = orchestrator.download_pair(item).await;
    if !matches!(result.outcome, PairOutcome::Skipped { .. }) {
        let mut log = SessionLog::create(&cfg.log_dir()?)?;
        log.record(scheduler::record_for(&result))?;
        log.close()?;
    }

    let pair = &result.item.pair;
    match &result.outcome {
        PairOutcome::Downloaded { path, bytes, .. } => {
            if !quiet {
                println!("Saved {} ({} bytes) to {}", pair, bytes, path.display());
            }
            Ok(true)
        }
        PairOutcome::Skipped { path } => {
            if !quiet {
                println!("Already downloaded: {}", path.display());
            }
            Ok(true)
        }
        PairOutcome::NotFound { .. } => {
            println!("No combination exists for {}", pair);
            Ok(true)
        }
        PairOutcome::Failed { kind, message, .. } => {
            eprintln!(
                "Failed to download {} after {} attempt(s): {}: {}",
                pair,
                result.attempts,
                kind.label(),
                message
            );
            Ok(false)
        }
    }
}
