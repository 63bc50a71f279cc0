//! Typed failures for single fetches and whole probes.

use thiserror::Error;

use super::attempt::Scheme;

/// Failure of one fetch (one try of one probe attempt).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connect or total timeout expired.
    #[error("timed out: {0}")]
    Timeout(String),
    /// DNS, refused connection, reset, TLS handshake and similar.
    #[error("connection failed: {0}")]
    Connection(String),
    /// Final response had an unusable status (4xx, 5xx).
    #[error("HTTP {0}")]
    Http(u32),
    /// Final effective URL had no host to canonicalize.
    #[error("no host in effective URL {0:?}")]
    MissingHost(String),
    #[error("{0}")]
    Other(String),
}

/// One failed entry of the probe matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub scheme: Scheme,
    /// Name of the header profile used.
    pub profile: String,
    pub error: FetchError,
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}: {}", self.scheme, self.profile, self.error)
    }
}

/// Every attempt of a domain's probe matrix failed. The caller keeps the
/// domain as-is; this never aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{domain}: {} probe attempt(s) failed", .attempts.len())]
pub struct ProbeFailure {
    pub domain: String,
    /// Failures in matrix order.
    pub attempts: Vec<AttemptFailure>,
}

impl ProbeFailure {
    /// The error of the last attempt tried, if any attempt ran.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.attempts.last().map(|a| &a.error)
    }

    /// True if every attempt ran out of time.
    pub fn all_timed_out(&self) -> bool {
        !self.attempts.is_empty()
            && self
                .attempts
                .iter()
                .all(|a| matches!(a.error, FetchError::Timeout(_)))
    }
}
