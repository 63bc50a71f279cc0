use std::time::Duration;

/// High-level classification of an attempt failure for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect or total).
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (DNS, refused, reset, TLS handshake).
    Connection,
    /// Other 5xx status.
    Http5xx(u16),
    /// Any other error (4xx, missing host, malformed URL).
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy with caps.
///
/// The probe uses it with `max_attempts = 2` (one courtesy retry) when
/// `retry_on_5xx` is set and `max_attempts = 1` otherwise.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of tries per attempt (including the first).
    pub max_attempts: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
    /// Upper bound on backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(1000),
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

    /// Courtesy retry for transient server errors, or no retry at all.
    pub fn courtesy(retry_on_5xx: bool, delay: Duration) -> Self {
        Self {
            max_attempts: if retry_on_5xx { 2 } else { 1 },
            base_delay: delay,
            max_delay: delay.max(Duration::from_secs(10)),
        }
    }

    /// Compute the next backoff delay for a given try and error kind.
    ///
    /// `attempt` is 1-based (1 = first try). Timeouts and connection errors
    /// are never retried: the next entry in the probe matrix is the fallback.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Timeout | ErrorKind::Connection | ErrorKind::Other => {
                RetryDecision::NoRetry
            }
            ErrorKind::Throttled | ErrorKind::Http5xx(_) => {
                // base * 2^(attempt-1), capped.
                let exp = 1u32 << attempt.saturating_sub(1).min(8);
                let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
                RetryDecision::RetryAfter(delay)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_retry_for_transport_failures() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Timeout), RetryDecision::NoRetry);
        assert_eq!(p.decide(1, ErrorKind::Connection), RetryDecision::NoRetry);
        assert_eq!(p.decide(1, ErrorKind::Other), RetryDecision::NoRetry);
    }

    #[test]
    fn server_errors_get_one_courtesy_retry() {
        let p = RetryPolicy::courtesy(true, Duration::from_millis(500));
        assert_eq!(
            p.decide(1, ErrorKind::Throttled),
            RetryDecision::RetryAfter(Duration::from_millis(500))
        );
        assert!(matches!(
            p.decide(1, ErrorKind::Http5xx(502)),
            RetryDecision::RetryAfter(_)
        ));
        assert_eq!(p.decide(2, ErrorKind::Throttled), RetryDecision::NoRetry);
    }

    #[test]
    fn courtesy_disabled_never_retries() {
        let p = RetryPolicy::courtesy(false, Duration::from_millis(500));
        assert_eq!(p.decide(1, ErrorKind::Throttled), RetryDecision::NoRetry);
        assert_eq!(RetryPolicy::none().max_attempts, 1);
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let p = RetryPolicy {
            max_attempts: 20,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        };
        let delay = |n| match p.decide(n, ErrorKind::Http5xx(500)) {
            RetryDecision::RetryAfter(d) => d,
            RetryDecision::NoRetry => panic!("expected retry"),
        };
        assert!(delay(2) >= delay(1));
        assert_eq!(delay(10), p.max_delay);
    }
}
