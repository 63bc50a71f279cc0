//! Redirect probing.
//!
//! For one domain, walks an ordered matrix of (scheme × header profile)
//! attempts and reports the canonical host of the first final response. Each
//! attempt is a single GET with redirects followed and TLS verification off;
//! a transient server error earns one courtesy retry. When the whole matrix
//! fails the probe returns a [`ProbeFailure`] and the caller keeps the domain
//! unchanged.
//!
//! Probes block the calling thread; call from `spawn_blocking` if used from
//! async code (see [`crate::resolve`]).

mod attempt;
mod error;
mod libcurl;
mod transport;

pub use attempt::{attempt_matrix, HeaderProfile, ProbeAttempt, Scheme};
pub use error::{AttemptFailure, FetchError, ProbeFailure};
pub use libcurl::CurlTransport;
pub use transport::{FetchRequest, FetchResponse, Transport};

use std::time::Duration;

use crate::canonical::{canonicalize, host_of_url, CanonicalDomain};
use crate::retry::{run_with_retry, RetryPolicy};

/// Outcome of probing one domain: `Ok` is resolved, `Err` is unresolved.
pub type ProbeResult = Result<CanonicalDomain, ProbeFailure>;

/// Everything a probe needs, passed in at construction.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Scheme preference order.
    pub schemes: Vec<Scheme>,
    /// Header profile order, tried within each scheme.
    pub header_profiles: Vec<HeaderProfile>,
    /// Total time allowed for one fetch (connect + redirects + headers).
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_redirects: u32,
    pub retry: RetryPolicy,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            schemes: vec![Scheme::Https, Scheme::Http],
            header_profiles: HeaderProfile::defaults(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            max_redirects: 10,
            retry: RetryPolicy::default(),
        }
    }
}

/// Probes domains through a [`Transport`]. Holds no per-domain state, so one
/// instance can be shared by every worker.
#[derive(Debug)]
pub struct Prober<T = CurlTransport> {
    transport: T,
    settings: ProbeSettings,
}

impl Prober<CurlTransport> {
    pub fn with_curl(settings: ProbeSettings) -> Self {
        Self::new(CurlTransport, settings)
    }
}

impl<T: Transport> Prober<T> {
    pub fn new(transport: T, settings: ProbeSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The attempt matrix in trial order.
    pub fn attempts(&self) -> Vec<ProbeAttempt<'_>> {
        attempt_matrix(&self.settings.schemes, &self.settings.header_profiles)
    }

    /// Tries each attempt in order until one yields a response.
    pub fn probe(&self, domain: &str) -> ProbeResult {
        let mut failures = Vec::new();

        for attempt in self.attempts() {
            match self.run_attempt(domain, &attempt) {
                Ok(target) => {
                    tracing::debug!(
                        domain,
                        scheme = %attempt.scheme,
                        profile = %attempt.profile.name,
                        target = %target,
                        "probe resolved"
                    );
                    return Ok(target);
                }
                Err(error) => {
                    tracing::debug!(
                        domain,
                        scheme = %attempt.scheme,
                        profile = %attempt.profile.name,
                        error = %error,
                        "probe attempt failed"
                    );
                    failures.push(AttemptFailure {
                        scheme: attempt.scheme,
                        profile: attempt.profile.name.clone(),
                        error,
                    });
                }
            }
        }

        Err(ProbeFailure {
            domain: domain.to_string(),
            attempts: failures,
        })
    }

    /// Probe result, falling back to the canonical input on failure.
    pub fn probe_or_identity(&self, domain: &str) -> CanonicalDomain {
        self.probe(domain).unwrap_or_else(|_| canonicalize(domain))
    }

    fn run_attempt(
        &self,
        domain: &str,
        attempt: &ProbeAttempt<'_>,
    ) -> Result<CanonicalDomain, FetchError> {
        let url = attempt.url(domain);
        let req = FetchRequest {
            url: &url,
            headers: &attempt.profile.headers,
            timeout: self.settings.timeout,
            connect_timeout: self.settings.connect_timeout,
            max_redirects: self.settings.max_redirects,
        };

        let response = run_with_retry(&self.settings.retry, || {
            let response = self.transport.fetch(&req)?;
            if response.is_usable() {
                Ok(response)
            } else {
                Err(FetchError::Http(response.status))
            }
        })?;

        let host = host_of_url(&response.effective_url)
            .ok_or_else(|| FetchError::MissingHost(response.effective_url.clone()))?;
        Ok(canonicalize(&host))
    }
}
