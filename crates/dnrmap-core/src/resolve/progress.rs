//! Progress reporting for a resolution run.

/// Snapshot of resolution progress (CLI-friendly).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveProgress {
    /// Probes finished so far.
    pub done: usize,
    /// Distinct domains to probe.
    pub total: usize,
    /// Probes that got a response (redirected or not).
    pub resolved: usize,
    /// Resolved probes whose canonical target differs from the input.
    pub redirected: usize,
    /// Probes where every attempt failed.
    pub failed: usize,
}

impl ResolveProgress {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.done as f64 / self.total as f64).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}
