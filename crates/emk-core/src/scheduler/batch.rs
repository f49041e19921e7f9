//! Bounded worker pool over a list of items.
//!
//! Keeps up to `max_concurrent` downloads in flight; when one finishes, the
//! next item is started until the list is exhausted. Items are independent:
//! a failed item is recorded and the batch carries on. The completed
//! progress snapshot is always delivered, even to a slow receiver.

use anyhow::Result;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::session_log::{DownloadRecord, SessionLog};

use super::item::{DownloadItem, PairOutcome, PairResult};
use super::progress::ProgressStats;
use super::Orchestrator;

/// Final counts for a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    pub total: usize,
    pub successes: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub failures: usize,
    pub duration: Duration,
}

impl BatchStats {
    fn add(&mut self, outcome: &PairOutcome) {
        match outcome {
            PairOutcome::Downloaded { .. } => self.successes += 1,
            PairOutcome::Skipped { .. } => self.skipped += 1,
            PairOutcome::NotFound { .. } => self.not_found += 1,
            PairOutcome::Failed { .. } => self.failures += 1,
        }
    }

    pub fn processed(&self) -> usize {
        self.successes + self.skipped + self.not_found + self.failures
    }

    /// Percentage of `total` for a count, 0 for an empty batch.
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        count as f64 / self.total as f64 * 100.0
    }

    pub fn success_rate(&self) -> f64 {
        self.percent(self.successes)
    }

    pub fn items_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.processed() as f64 / secs
    }

    fn snapshot(&self, elapsed: Duration) -> ProgressStats {
        ProgressStats {
            done: self.processed(),
            total: self.total,
            successes: self.successes,
            skipped: self.skipped,
            not_found: self.not_found,
            failures: self.failures,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }
}

/// A failed item, for the end-of-run table.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedItem {
    pub item: DownloadItem,
    pub error_type: String,
    pub message: String,
    pub status: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub stats: BatchStats,
    /// Failed items in completion order.
    pub failures: Vec<FailedItem>,
}

/// Drops repeated pairs, keeping the first occurrence. Two workers writing
/// the same `.part` file would race.
fn dedupe(items: Vec<DownloadItem>) -> Vec<DownloadItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.pair.clone()))
        .collect()
}

pub(crate) fn to_record(result: &PairResult) -> DownloadRecord {
    let (left, right) = (&result.item.pair.left, &result.item.pair.right);
    let mut record = match &result.outcome {
        PairOutcome::Downloaded {
            path,
            status,
            sha256,
            content_type,
            ..
        } => {
            let mut r = DownloadRecord::success(left, right);
            r.file_path = Some(path.display().to_string());
            r.status_code = Some(*status);
            r.sha256 = Some(sha256.clone());
            r.content_type = content_type.clone();
            r
        }
        PairOutcome::NotFound { status } => {
            let mut r = DownloadRecord::failure(left, right, "NotFound", "combination does not exist");
            r.status_code = Some(*status);
            r
        }
        PairOutcome::Failed {
            kind,
            message,
            status,
        } => {
            let mut r = DownloadRecord::failure(left, right, kind.label(), message.clone());
            r.status_code = *status;
            r
        }
        PairOutcome::Skipped { path } => {
            let mut r = DownloadRecord::success(left, right);
            r.file_path = Some(path.display().to_string());
            r
        }
    };
    record.url = Some(result.item.url.clone());
    record.duration_ms = Some(result.duration.as_secs_f64() * 1000.0);
    record
}

pub(super) async fn run_batch(
    orchestrator: &Orchestrator,
    items: Vec<DownloadItem>,
    mut log: Option<&mut SessionLog>,
    progress_tx: Option<tokio::sync::mpsc::Sender<ProgressStats>>,
) -> Result<BatchReport> {
    let items = dedupe(items);
    let max_concurrent = orchestrator.options().max_concurrent.max(1);
    let start = Instant::now();
    let mut report = BatchReport {
        stats: BatchStats {
            total: items.len(),
            ..Default::default()
        },
        failures: Vec::new(),
    };
    tracing::info!(
        total = items.len(),
        max_concurrent,
        delay_ms = orchestrator.options().delay.as_millis() as u64,
        "starting batch"
    );

    let mut pending = items.into_iter();
    let mut join_set = tokio::task::JoinSet::new();

    loop {
        while join_set.len() < max_concurrent {
            let Some(item) = pending.next() else {
                break;
            };
            let worker = orchestrator.clone();
            join_set.spawn(async move { worker.download_pair(item).await });
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        let result = res.map_err(|e| anyhow::anyhow!("download task join: {}", e))?;

        report.stats.add(&result.outcome);
        if let PairOutcome::Failed {
            kind,
            message,
            status,
        } = &result.outcome
        {
            report.failures.push(FailedItem {
                item: result.item.clone(),
                error_type: kind.label().to_string(),
                message: message.clone(),
                status: *status,
            });
        }
        // Skips are only counted; the ledger lists attempts.
        if let Some(log) = log.as_deref_mut() {
            if !matches!(result.outcome, PairOutcome::Skipped { .. }) {
                log.record(to_record(&result))?;
            }
        }
        // Intermediate snapshots may be dropped when the receiver lags.
        if report.stats.processed() < report.stats.total {
            if let Some(tx) = &progress_tx {
                let _ = tx.try_send(report.stats.snapshot(start.elapsed()));
            }
        }
    }

    report.stats.duration = start.elapsed();
    if let Some(tx) = progress_tx {
        let _ = tx.send(report.stats.snapshot(report.stats.duration)).await;
    }
    if let Some(log) = log {
        log.flush()?;
    }
    tracing::info!(
        successes = report.stats.successes,
        skipped = report.stats.skipped,
        not_found = report.stats.not_found,
        failures = report.stats.failures,
        secs = report.stats.duration.as_secs_f64(),
        "batch finished"
    );
    Ok(report)
}
