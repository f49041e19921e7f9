//! Shared batch runner: builds the orchestrator, prints progress, writes the
//! session ledger, and prints the summary.

use anyhow::Result;
use emk_core::config::EmkConfig;
use emk_core::scheduler::{DownloadItem, DownloadOptions, Orchestrator, ProgressStats};
use emk_core::session_log::SessionLog;
use emk_core::storage::StorageManager;
use std::time::Instant;

use super::report;

const PROGRESS_INTERVAL_MS: u64 = 500;

pub(super) fn orchestrator(cfg: &EmkConfig) -> Result<Orchestrator> {
    let storage = StorageManager::new(cfg.output_dir(), cfg.filename_format)?;
    Ok(Orchestrator::new(storage, DownloadOptions::from_config(cfg)))
}

/// Runs `items` as one session. Returns false if any item failed.
pub(super) async fn run_items(cfg: &EmkConfig, items: Vec<DownloadItem>, quiet: bool) -> Result<bool> {
    let orchestrator = orchestrator(cfg)?;
    let mut log = SessionLog::create(&cfg.log_dir()?)?;
    if !quiet {
        println!(
            "Downloading {} combination(s) to {} ({} in flight, {}ms between requests)",
            items.len(),
            orchestrator.storage().base_dir().display(),
            cfg.max_concurrent,
            cfg.delay_ms
        );
    }

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<ProgressStats>(16);
    let progress_handle = tokio::spawn(async move {
        let mut last_print = Instant::now();
        let mut printed = false;
        while let Some(stats) = progress_rx.recv().await {
            if quiet {
                continue;
            }
            let now = Instant::now();
            if now.duration_since(last_print).as_millis() as u64 >= PROGRESS_INTERVAL_MS
                || stats.is_complete()
            {
                let eta = stats
                    .eta_secs()
                    .map(|s| format!("{:.0}s", s))
                    .unwrap_or_else(|| "?".to_string());
                println!(
                    "  {} / {} ({:.1}%)  ok {}  skipped {}  not found {}  failed {}  {:.1}/s  ETA {}",
                    stats.done,
                    stats.total,
                    stats.fraction() * 100.0,
                    stats.successes,
                    stats.skipped,
                    stats.not_found,
                    stats.failures,
                    stats.items_per_sec(),
                    eta
                );
                last_print = now;
                printed = true;
            }
        }
        if printed {
            println!();
        }
    });

    let result = orchestrator
        .download_batch(items, Some(&mut log), Some(progress_tx))
        .await;
    let _ = progress_handle.await;
    let batch = result?;

    let summary_path = log.close()?;
    report::print_summary(&batch, quiet);
    if !quiet {
        println!("Session log: {}", summary_path.display());
    }
    Ok(batch.stats.failures == 0)
}
