//! Retry and backoff policy for probe attempts.
//!
//! Classifies attempt failures (timeouts, connection errors, HTTP status) and
//! decides whether a single attempt earns the courtesy retry. Only transient
//! server errors are retried; everything else moves the probe on to the next
//! attempt in its matrix.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
