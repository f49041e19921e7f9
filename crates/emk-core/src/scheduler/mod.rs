//! Download orchestration.
//!
//! Pipeline per item: skip check → paced GET with retry → storage. Batches
//! run through a bounded worker pool; outcomes feed the session ledger and
//! progress channel.

mod batch;
mod item;
mod pacer;
mod pair;
mod progress;

pub use batch::{BatchReport, BatchStats, FailedItem};
pub use item::{DownloadItem, DownloadOptions, FailureKind, PairOutcome, PairResult};
pub use pacer::RequestPacer;
pub use progress::ProgressStats;

use anyhow::Result;
use std::sync::Arc;

use crate::session_log::{DownloadRecord, SessionLog};
use crate::storage::StorageManager;

/// Shared handle to storage, options, and the request pacer. Cheap to clone;
/// every clone paces against the same clock.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    storage: Arc<StorageManager>,
    opts: Arc<DownloadOptions>,
    pacer: Arc<RequestPacer>,
}

impl Orchestrator {
    pub fn new(storage: StorageManager, opts: DownloadOptions) -> Self {
        let pacer = Arc::new(RequestPacer::new(opts.delay));
        Self {
            storage: Arc::new(storage),
            opts: Arc::new(opts),
            pacer,
        }
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.opts
    }

    /// Downloads one item. Never errors: every failure is an outcome.
    pub async fn download_pair(&self, item: DownloadItem) -> PairResult {
        pair::download_pair(
            item,
            Arc::clone(&self.storage),
            Arc::clone(&self.pacer),
            Arc::clone(&self.opts),
        )
        .await
    }

    /// Downloads all items with bounded concurrency. Per-item failures are
    /// reported in the result; only ledger write errors and worker panics
    /// abort the batch.
    pub async fn download_batch(
        &self,
        items: Vec<DownloadItem>,
        log: Option<&mut SessionLog>,
        progress_tx: Option<tokio::sync::mpsc::Sender<ProgressStats>>,
    ) -> Result<BatchReport> {
        batch::run_batch(self, items, log, progress_tx).await
    }
}

/// Ledger record for a finished item (skips are recorded as successes with a path).
pub fn record_for(result: &PairResult) -> DownloadRecord {
    batch::to_record(result)
}
