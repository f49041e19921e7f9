//! Retry and backoff policy.
//!
//! This module encapsulates error classification (not found, timeouts,
//! throttling, connection failures) and exponential backoff decisions so
//! the scheduler and the metadata download share one consistent policy.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, Attempted};
