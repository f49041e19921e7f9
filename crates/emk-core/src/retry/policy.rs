use std::time::Duration;

/// Why a GET failed, as far as retrying is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The combination does not exist (404/410). Terminal.
    NotFound,
    /// Connect or transfer timeout.
    Timeout,
    /// 429 or 503: the wrapper API is shedding load.
    Throttled,
    /// DNS, refused or reset connection, truncated body.
    Connection,
    /// Any other 5xx.
    Http5xx(u16),
    /// Everything else, e.g. 403. Not retried.
    Other,
}

impl ErrorKind {
    /// Label written to session ledgers and failure tables.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Throttled => "Throttled",
            ErrorKind::Connection => "NetworkError",
            ErrorKind::Http5xx(_) => "ServerError",
            ErrorKind::Other => "HttpError",
        }
    }

    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorKind::NotFound | ErrorKind::Other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Bounded exponential backoff shared by image and catalog downloads.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts per URL, first one included.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// What to do after failed attempt number `attempt` (1-based).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts || !kind.is_transient() {
            return RetryDecision::NoRetry;
        }
        // base * 2^(attempt-1), capped.
        let exp = 1u32 << attempt.saturating_sub(1).min(8);
        let raw = self.base_delay.saturating_mul(exp);
        RetryDecision::RetryAfter(raw.min(self.max_delay))
    }
}
