//! Resolution scheduler.
//!
//! Runs the redirect probe over a set of domains with a bounded number of
//! probes in flight. Probes are blocking, so each one runs on tokio's blocking
//! pool; a `JoinSet` keeps at most `concurrency_limit` of them alive. Results
//! are folded into the mapping by this loop alone, so workers never share
//! mutable state, and a panicking probe only costs its own domain.

mod progress;

pub use progress::ResolveProgress;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::mapping::DomainMapping;
use crate::probe::{Prober, Transport};

/// Knobs for one [`resolve_all`] run.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Maximum probes in flight; 0 is treated as 1.
    pub concurrency_limit: usize,
    /// When set, no further probes are dispatched; in-flight probes finish.
    pub abort: Option<Arc<AtomicBool>>,
    /// Receives a snapshot after every finished probe.
    pub progress_tx: Option<mpsc::Sender<ResolveProgress>>,
}

impl ResolveOptions {
    pub fn new(concurrency_limit: usize) -> Self {
        Self {
            concurrency_limit,
            abort: None,
            progress_tx: None,
        }
    }

    fn aborted(&self) -> bool {
        self.abort
            .as_ref()
            .is_some_and(|token| token.load(Ordering::Relaxed))
    }
}

/// Result of a resolution run.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Domains whose canonical target changed.
    pub mapping: DomainMapping,
    /// Domains where every probe attempt failed (kept as-is).
    pub unresolved: BTreeSet<String>,
    /// Domains never dispatched because the run was aborted.
    pub skipped: BTreeSet<String>,
    /// Number of probes that finished.
    pub probed: usize,
    pub cancelled: bool,
}

/// Probes every distinct domain once and returns the mapping of those whose
/// canonical target changed. Never fails: a domain whose probe fails, or
/// panics, is reported in [`Resolution::unresolved`] and left out of the mapping.
pub async fn resolve_all<T, I, S>(
    prober: Arc<Prober<T>>,
    domains: I,
    options: ResolveOptions,
) -> Resolution
where
    T: Transport + 'static,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let queue: BTreeSet<String> = domains
        .into_iter()
        .map(|d| d.as_ref().to_string())
        .collect();
    let limit = options.concurrency_limit.max(1);
    let mut progress = ResolveProgress {
        total: queue.len(),
        ..ResolveProgress::default()
    };
    let mut resolution = Resolution::default();
    let mut pending = queue.into_iter();
    let mut join_set = JoinSet::new();

    tracing::info!(domains = progress.total, limit, "resolving domains");

    loop {
        while join_set.len() < limit && !options.aborted() {
            let Some(domain) = pending.next() else {
                break;
            };
            let prober = Arc::clone(&prober);
            join_set.spawn(async move {
                let probe = tokio::task::spawn_blocking({
                    let domain = domain.clone();
                    move || prober.probe(&domain)
                });
                (domain, probe.await)
            });
        }

        if join_set.is_empty() {
            break;
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        let (domain, outcome) = match joined {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("probe task join: {}", e);
                continue;
            }
        };

        resolution.probed += 1;
        progress.done += 1;
        match outcome {
            Ok(Ok(target)) => {
                progress.resolved += 1;
                if resolution.mapping.record(&domain, target.clone()) {
                    progress.redirected += 1;
                    tracing::info!(from = %domain, to = %target, "redirect discovered");
                }
            }
            Ok(Err(failure)) => {
                progress.failed += 1;
                tracing::warn!(
                    domain = %domain,
                    attempts = failure.attempts.len(),
                    last_error = ?failure.last_error(),
                    "domain unresolved, keeping as-is"
                );
                resolution.unresolved.insert(domain);
            }
            Err(e) => {
                progress.failed += 1;
                tracing::warn!(domain = %domain, "probe panicked, keeping as-is: {}", e);
                resolution.unresolved.insert(domain);
            }
        }

        if let Some(tx) = &options.progress_tx {
            let _ = tx.send(progress.clone()).await;
        }
    }

    if options.aborted() {
        resolution.skipped = pending.collect();
        resolution.cancelled = true;
        tracing::warn!(
            skipped = resolution.skipped.len(),
            "resolution aborted before all domains were probed"
        );
    }

    tracing::info!(
        probed = resolution.probed,
        redirected = resolution.mapping.len(),
        unresolved = resolution.unresolved.len(),
        "resolution finished"
    );
    resolution
}

/// Mapping-only convenience over [`resolve_all`].
pub async fn resolve_mapping<T, I, S>(
    prober: Arc<Prober<T>>,
    domains: I,
    concurrency_limit: usize,
) -> DomainMapping
where
    T: Transport + 'static,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    resolve_all(prober, domains, ResolveOptions::new(concurrency_limit))
        .await
        .mapping
}
