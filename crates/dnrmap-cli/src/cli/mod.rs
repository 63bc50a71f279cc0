//! CLI for dnrmap.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dnrmap_core::config::{self, DnrmapConfig};
use std::path::{Path, PathBuf};

use commands::{run_completions, run_domains, run_probe, run_resolve, ResolveArgs};

/// Top-level CLI for dnrmap.
#[derive(Debug, Parser)]
#[command(name = "dnrmap")]
#[command(
    about = "dnrmap: follow redirects of the domains in a declarativeNetRequest rule set and rewrite the rules",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of ~/.config/dnrmap/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Probe every initiator domain in a rule file and write the rewritten rules.
    Resolve(ResolveArgs),

    /// List the initiator domains found in a rule file.
    Domains {
        /// Path to the JSON rule file.
        input: PathBuf,
    },

    /// Probe domains directly and print where they end up.
    Probe {
        /// Domains to probe.
        #[arg(required = true)]
        domains: Vec<String>,
        /// Per-request timeout in seconds (overrides config).
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Only try https.
        #[arg(long)]
        https_only: bool,
    },

    /// Print a shell completion script to stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn load_config(path: Option<&Path>) -> Result<DnrmapConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Completions need no config on disk.
        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(());
        }

        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve(args) => run_resolve(&cfg, &args).await?,
            CliCommand::Domains { input } => run_domains(&input)?,
            CliCommand::Probe {
                domains,
                timeout,
                https_only,
            } => run_probe(&cfg, &domains, timeout, https_only).await?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
