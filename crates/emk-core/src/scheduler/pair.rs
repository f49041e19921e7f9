//! Download of a single combination: skip check, paced GET with retry, save.

use std::sync::Arc;
use std::time::Instant;

use crate::checksum::sha256_bytes;
use crate::fetch::{self, FetchError, Fetched};
use crate::retry::{classify, run_with_retry, ErrorKind};
use crate::storage::StorageManager;

use super::item::{DownloadItem, DownloadOptions, FailureKind, PairOutcome, PairResult};
use super::pacer::RequestPacer;

pub(super) async fn download_pair(
    item: DownloadItem,
    storage: Arc<StorageManager>,
    pacer: Arc<RequestPacer>,
    opts: Arc<DownloadOptions>,
) -> PairResult {
    let start = Instant::now();
    let (left, right) = (item.pair.left.as_str(), item.pair.right.as_str());

    if opts.skip_existing && storage.file_exists(left, right) {
        tracing::debug!(left, right, "skipped: already on disk");
        let path = storage.file_path(left, right);
        return PairResult {
            item,
            outcome: PairOutcome::Skipped { path },
            attempts: 0,
            duration: start.elapsed(),
        };
    }

    let attempted = run_with_retry(&opts.retry, |attempt| {
        let pacer = Arc::clone(&pacer);
        let url = item.url.clone();
        let timeout = opts.timeout;
        async move {
            pacer.wait().await;
            tracing::debug!(attempt, url = %url, "GET");
            fetch::fetch_bytes_async(url, timeout).await
        }
    })
    .await;

    let outcome = match attempted.result {
        Ok(fetched) => save(&storage, &item, fetched).await,
        Err(e) => failure_outcome(&e),
    };

    match &outcome {
        PairOutcome::Downloaded { path, bytes, .. } => {
            tracing::info!(left, right, bytes, "saved {}", path.display())
        }
        PairOutcome::NotFound { status } => {
            tracing::debug!(left, right, status, "no such combination")
        }
        PairOutcome::Failed { kind, message, status } => tracing::warn!(
            left,
            right,
            status = status.unwrap_or(0),
            attempts = attempted.attempts,
            "{}: {}",
            kind.label(),
            message
        ),
        PairOutcome::Skipped { .. } => {}
    }

    PairResult {
        item,
        outcome,
        attempts: attempted.attempts,
        duration: start.elapsed(),
    }
}

/// True when the server labelled the body as something other than an image.
/// A missing `Content-Type` is not flagged.
fn unexpected_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| !ct.trim().to_ascii_lowercase().starts_with("image/"))
}

async fn save(storage: &Arc<StorageManager>, item: &DownloadItem, fetched: Fetched) -> PairOutcome {
    let Fetched {
        status,
        headers,
        body,
    } = fetched;
    let content_type = headers.content_type;
    if unexpected_content_type(content_type.as_deref()) {
        tracing::warn!(
            left = %item.pair.left,
            right = %item.pair.right,
            content_type = content_type.as_deref().unwrap_or(""),
            "saving non-image response"
        );
    }
    let storage = Arc::clone(storage);
    let pair = item.pair.clone();
    let written = tokio::task::spawn_blocking(move || {
        let sha256 = sha256_bytes(&body);
        storage
            .save(&pair.left, &pair.right, &body)
            .map(|path| (path, body.len() as u64, sha256))
    })
    .await;

    match written {
        Ok(Ok((path, bytes, sha256))) => PairOutcome::Downloaded {
            path,
            bytes,
            status,
            sha256,
            content_type,
        },
        Ok(Err(e)) => PairOutcome::Failed {
            kind: FailureKind::Storage,
            message: format!("failed to save file: {:#}", e),
            status: Some(status),
        },
        Err(e) => PairOutcome::Failed {
            kind: FailureKind::Storage,
            message: format!("save task failed: {}", e),
            status: Some(status),
        },
    }
}

fn failure_outcome(e: &FetchError) -> PairOutcome {
    match classify(e) {
        ErrorKind::NotFound => PairOutcome::NotFound {
            status: e.status().unwrap_or(404),
        },
        kind => PairOutcome::Failed {
            kind: FailureKind::Network(kind),
            message: e.to_string(),
            status: e.status(),
        },
    }
}
