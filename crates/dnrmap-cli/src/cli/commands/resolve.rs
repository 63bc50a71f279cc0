//! `dnrmap resolve <input>`: collect, probe, rewrite, write.

use anyhow::{Context, Result};
use clap::Args;
use dnrmap_core::config::DnrmapConfig;
use dnrmap_core::mapping::DomainMapping;
use dnrmap_core::probe::Prober;
use dnrmap_core::report::ResolutionReport;
use dnrmap_core::resolve::{self, ResolveOptions, ResolveProgress};
use dnrmap_core::rules;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::apply_overrides;

#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Path to the JSON rule file.
    pub input: PathBuf,

    /// Where to write the rewritten rules (default: updated-<input name> next to the input).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Maximum probes in flight (overrides config).
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds (overrides config).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Only try https.
    #[arg(long)]
    pub https_only: bool,

    /// Disable the courtesy retry on 5xx/429.
    #[arg(long)]
    pub no_retry: bool,

    /// Probe and print the mapping, but do not write the rule file.
    #[arg(long)]
    pub dry_run: bool,

    /// Also write a JSON report of the run to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Drop initiator domains that could not be reached at all.
    #[arg(long)]
    pub prune_unreachable: bool,
}

impl ResolveArgs {
    fn effective_config(&self, cfg: &DnrmapConfig) -> DnrmapConfig {
        let mut cfg = apply_overrides(cfg, self.timeout, self.https_only);
        if let Some(n) = self.concurrency {
            cfg.concurrency_limit = n.max(1);
        }
        if self.no_retry {
            cfg.retry_on_5xx = false;
        }
        cfg
    }

    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(p) => p.clone(),
            None => default_output_path(&self.input),
        }
    }
}

/// `updated-<name>` in the input's directory.
pub(crate) fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rules.json".to_string());
    input.with_file_name(format!("updated-{}", name))
}

fn print_mapping(mapping: &DomainMapping) {
    if mapping.is_empty() {
        println!("No redirects found.");
        return;
    }
    println!("Redirects ({}):", mapping.len());
    for (from, to) in mapping.iter() {
        println!("  {} -> {}", from, to);
    }
}

const PROGRESS_INTERVAL_MS: u128 = 500;

fn spawn_progress_printer(
    mut progress_rx: tokio::sync::mpsc::Receiver<ResolveProgress>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_print = Instant::now();
        let mut printed = false;
        while let Some(p) = progress_rx.recv().await {
            if last_print.elapsed().as_millis() >= PROGRESS_INTERVAL_MS || p.is_complete() {
                eprint!(
                    "\r  {}/{} probed ({:.0}%)  {} redirected  {} unresolved  ",
                    p.done,
                    p.total,
                    p.fraction() * 100.0,
                    p.redirected,
                    p.failed
                );
                last_print = Instant::now();
                printed = true;
            }
        }
        if printed {
            eprintln!();
        }
    })
}

/// Sets the abort token on the first Ctrl-C.
fn spawn_interrupt_watch(abort: Arc<AtomicBool>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ninterrupted: finishing in-flight probes, nothing will be written");
            abort.store(true, Ordering::Relaxed);
        }
    })
}

pub async fn run_resolve(cfg: &DnrmapConfig, args: &ResolveArgs) -> Result<()> {
    let cfg = args.effective_config(cfg);
    cfg.validate()?;

    let input_rules = rules::load_rules(&args.input)?;
    let domains = rules::collect_domains(&input_rules);
    println!(
        "{} rules, {} distinct initiator domains",
        input_rules.len(),
        domains.len()
    );

    let abort = Arc::new(AtomicBool::new(false));
    let interrupt = spawn_interrupt_watch(Arc::clone(&abort));
    let (progress_tx, progress_rx) = tokio::sync::mpsc::channel::<ResolveProgress>(16);
    let printer = spawn_progress_printer(progress_rx);

    let prober = Arc::new(Prober::with_curl(cfg.probe_settings()));
    let options = ResolveOptions {
        concurrency_limit: cfg.concurrency_limit,
        abort: Some(Arc::clone(&abort)),
        progress_tx: Some(progress_tx),
    };
    let resolution = resolve::resolve_all(prober, &domains, options).await;
    interrupt.abort();
    let _ = printer.await;

    if resolution.cancelled {
        anyhow::bail!(
            "cancelled after {} of {} domains; no files written",
            resolution.probed,
            domains.len()
        );
    }

    for (from, to) in resolution.mapping.iter() {
        tracing::info!(from, to = %to, "mapping entry");
    }
    print_mapping(&resolution.mapping);
    if !resolution.unresolved.is_empty() {
        println!("Unresolved, kept as-is: {}", resolution.unresolved.len());
    }

    let mut report = ResolutionReport::new(domains.len(), input_rules.len(), &resolution);
    let (mut updated, rewrite) = rules::apply_mapping_counted(&input_rules, &resolution.mapping);
    report.rewrite = rewrite;
    if args.prune_unreachable {
        let (pruned, prune) = rules::prune_unresolved(&updated, &resolution.unresolved);
        updated = pruned;
        report.prune = Some(prune);
        println!(
            "Pruned {} unreachable initiator entries ({} lists left intact)",
            prune.entries_removed, prune.lists_kept
        );
    }

    if args.dry_run {
        println!("Dry run: {} rules would change.", rewrite.rules_changed);
    } else {
        let output = args.output_path();
        rules::save_rules(&output, &updated)
            .with_context(|| format!("write rules to {}", output.display()))?;
        report.written = true;
        println!(
            "Updated {} of {} rules -> {}",
            rewrite.rules_changed,
            updated.len(),
            output.display()
        );
    }

    if let Some(path) = &args.report {
        report.write_to(path)?;
    }
    Ok(())
}
