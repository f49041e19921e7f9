//! Per-session JSON ledger of download successes and failures.
//!
//! Each session writes three files into the log directory:
//! `successes_<id>.json` and `failures_<id>.json` (JSON arrays of
//! [`DownloadRecord`]) and, on close, `summary_<id>.json`. The arrays are
//! rewritten atomically every [`FLUSH_EVERY`] records so an interrupted run
//! still leaves a readable ledger.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::storage::write_atomic;

pub const FLUSH_EVERY: usize = 25;

/// Record of a single download attempt (after retries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub left: String,
    pub right: String,
    /// RFC 3339 local time.
    pub timestamp: String,
    pub success: bool,
    pub file_path: Option<String>,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
    pub status_code: Option<u32>,
    pub duration_ms: Option<f64>,
    pub url: Option<String>,
    pub sha256: Option<String>,
    /// `Content-Type` of the saved response.
    #[serde(default)]
    pub content_type: Option<String>,
}

impl DownloadRecord {
    pub fn success(left: &str, right: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
            timestamp: now_rfc3339(),
            success: true,
            file_path: None,
            error_type: None,
            error_message: None,
            status_code: None,
            duration_ms: None,
            url: None,
            sha256: None,
            content_type: None,
        }
    }

    pub fn failure(left: &str, right: &str, error_type: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_type: Some(error_type.to_string()),
            error_message: Some(message.into()),
            ..Self::success(left, right)
        }
    }
}

fn now_rfc3339() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Session totals written to `summary_<id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub total_attempts: usize,
    pub successes: usize,
    pub failures: usize,
    pub success_rate: String,
    pub error_breakdown: BTreeMap<String, usize>,
    pub success_file: PathBuf,
    pub failure_file: PathBuf,
}

pub struct SessionLog {
    dir: PathBuf,
    session_id: String,
    success_file: PathBuf,
    failure_file: PathBuf,
    successes: Vec<DownloadRecord>,
    failures: Vec<DownloadRecord>,
    unflushed: usize,
}

impl SessionLog {
    /// Starts a session named after the current local time.
    pub fn create(dir: &Path) -> Result<Self> {
        let id = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::create_with_id(dir, &id)
    }

    /// Starts a session with an explicit id. If files for that id already
    /// exist, `_2`, `_3`, … is appended rather than overwriting them.
    pub fn create_with_id(dir: &Path, id: &str) -> Result<Self> {
        std::fs::create_dir_all(dir).with_context(|| format!("create log dir: {}", dir.display()))?;
        let mut session_id = id.to_string();
        let mut n = 2;
        while dir.join(format!("successes_{}.json", session_id)).exists() {
            session_id = format!("{}_{}", id, n);
            n += 1;
        }
        let log = Self {
            dir: dir.to_path_buf(),
            success_file: dir.join(format!("successes_{}.json", session_id)),
            failure_file: dir.join(format!("failures_{}.json", session_id)),
            session_id,
            successes: Vec::new(),
            failures: Vec::new(),
            unflushed: 0,
        };
        log.flush()?;
        tracing::debug!(session = %log.session_id, "session ledger at {}", dir.display());
        Ok(log)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn success_file(&self) -> &Path {
        &self.success_file
    }

    pub fn failure_file(&self) -> &Path {
        &self.failure_file
    }

    pub fn successes(&self) -> &[DownloadRecord] {
        &self.successes
    }

    pub fn failures(&self) -> &[DownloadRecord] {
        &self.failures
    }

    pub fn record(&mut self, record: DownloadRecord) -> Result<()> {
        if record.success {
            self.successes.push(record);
        } else {
            self.failures.push(record);
        }
        self.unflushed += 1;
        if self.unflushed >= FLUSH_EVERY {
            self.flush()?;
            self.unflushed = 0;
        }
        Ok(())
    }

    /// Rewrites both ledger files from memory.
    pub fn flush(&self) -> Result<()> {
        write_json(&self.success_file, &self.successes)?;
        write_json(&self.failure_file, &self.failures)?;
        Ok(())
    }

    pub fn summary(&self) -> SessionSummary {
        let total = self.successes.len() + self.failures.len();
        let rate = if total > 0 {
            self.successes.len() as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        let mut error_breakdown = BTreeMap::new();
        for f in &self.failures {
            let key = f.error_type.clone().unwrap_or_else(|| "Unknown".to_string());
            *error_breakdown.entry(key).or_insert(0) += 1;
        }
        SessionSummary {
            session_id: self.session_id.clone(),
            total_attempts: total,
            successes: self.successes.len(),
            failures: self.failures.len(),
            success_rate: format!("{:.1}%", rate),
            error_breakdown,
            success_file: self.success_file.clone(),
            failure_file: self.failure_file.clone(),
        }
    }

    /// Final flush plus `summary_<id>.json`. Returns the summary path.
    pub fn close(mut self) -> Result<PathBuf> {
        self.unflushed = 0;
        self.flush()?;
        let path = self.dir.join(format!("summary_{}.json", self.session_id));
        write_json(&path, &self.summary())?;
        tracing::info!(session = %self.session_id, "session summary saved to {}", path.display());
        Ok(path)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).context("serialize ledger")?;
    write_atomic(path, &json)
}
