//! CLI command handlers, one per file.

mod completions;
mod domains;
mod probe;
mod resolve;

pub use completions::run_completions;
pub use domains::run_domains;
pub use probe::run_probe;
pub use resolve::{run_resolve, ResolveArgs};
#[cfg(test)]
pub(crate) use resolve::default_output_path;

use dnrmap_core::config::DnrmapConfig;
use dnrmap_core::probe::Scheme;

/// Applies the flags shared by `resolve` and `probe` on top of the config.
pub(crate) fn apply_overrides(cfg: &DnrmapConfig, timeout: Option<u64>, https_only: bool) -> DnrmapConfig {
    let mut cfg = cfg.clone();
    if let Some(secs) = timeout {
        cfg.probe_timeout_secs = secs.max(1);
    }
    if https_only {
        cfg.schemes_to_try.retain(|s| *s == Scheme::Https);
        if cfg.schemes_to_try.is_empty() {
            cfg.schemes_to_try.push(Scheme::Https);
        }
    }
    cfg
}
