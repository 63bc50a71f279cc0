//! `dnrmap probe <domain>...`: probe domains without touching any rule file.

use anyhow::{Context, Result};
use dnrmap_core::canonical::canonicalize;
use dnrmap_core::config::DnrmapConfig;
use dnrmap_core::probe::{ProbeResult, Prober};
use std::sync::Arc;

use super::apply_overrides;

fn print_result(domain: &str, result: &ProbeResult) {
    let canonical = canonicalize(domain);
    match result {
        Ok(target) if *target == canonical => println!("{}  ok ({})", domain, target),
        Ok(target) => println!("{}  -> {}", domain, target),
        Err(failure) => {
            println!("{}  unresolved", domain);
            for attempt in &failure.attempts {
                println!("    {}", attempt);
            }
        }
    }
}

pub async fn run_probe(
    cfg: &DnrmapConfig,
    domains: &[String],
    timeout: Option<u64>,
    https_only: bool,
) -> Result<()> {
    let cfg = apply_overrides(cfg, timeout, https_only);
    let prober = Arc::new(Prober::with_curl(cfg.probe_settings()));

    for domain in domains {
        let result = tokio::task::spawn_blocking({
            let prober = Arc::clone(&prober);
            let domain = domain.clone();
            move || prober.probe(&domain)
        })
        .await
        .context("probe task join")?;
        print_result(domain, &result);
    }
    Ok(())
}
