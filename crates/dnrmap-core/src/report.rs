//! Machine-readable summary of a resolve run.
//!
//! Written next to (not inside) the rule file when `--report` is given, so the
//! rule output stays a plain rule array.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::mapping::DomainMapping;
use crate::resolve::Resolution;
use crate::rules::{PruneStats, RewriteStats};

/// Result of one `resolve` run: what was discovered and what was changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionReport {
    /// Distinct domains collected from the input.
    pub domains_total: usize,
    pub domains_probed: usize,
    pub mapping: DomainMapping,
    pub unresolved: BTreeSet<String>,
    /// Domains never probed because the run was cancelled.
    pub skipped: BTreeSet<String>,
    pub cancelled: bool,
    pub rules_total: usize,
    pub rewrite: RewriteStats,
    /// Present only when pruning was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prune: Option<PruneStats>,
    /// Whether the rule file was written (false for dry and cancelled runs).
    pub written: bool,
}

impl ResolutionReport {
    pub fn new(domains_total: usize, rules_total: usize, resolution: &Resolution) -> Self {
        Self {
            domains_total,
            domains_probed: resolution.probed,
            mapping: resolution.mapping.clone(),
            unresolved: resolution.unresolved.clone(),
            skipped: resolution.skipped.clone(),
            cancelled: resolution.cancelled,
            rules_total,
            ..Self::default()
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize resolution report")
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json)
            .with_context(|| format!("write report {}", path.display()))?;
        tracing::info!(path = %path.display(), "resolution report written");
        Ok(())
    }
}
