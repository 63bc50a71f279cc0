use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::probe::{HeaderProfile, ProbeSettings, Scheme};
use crate::retry::RetryPolicy;

/// Global configuration loaded from `~/.config/dnrmap/config.toml`.
///
/// Every field has a default, so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnrmapConfig {
    /// Maximum number of domains probed at once.
    pub concurrency_limit: usize,
    /// Schemes to try, in preference order.
    pub schemes_to_try: Vec<Scheme>,
    /// Total time allowed for one probe request, in seconds.
    pub probe_timeout_secs: u64,
    /// Connection establishment timeout, in seconds.
    pub connect_timeout_secs: u64,
    /// Maximum redirects followed per request.
    pub max_redirects: u32,
    /// Retry once on 5xx / 429 before moving to the next attempt.
    pub retry_on_5xx: bool,
    /// Delay before the courtesy retry, in milliseconds.
    pub retry_delay_ms: u64,
    /// Header profiles to try within each scheme, in order. A profile with no
    /// headers sends none.
    pub header_profiles: Vec<HeaderProfile>,
}

impl Default for DnrmapConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 20,
            schemes_to_try: vec![Scheme::Https, Scheme::Http],
            probe_timeout_secs: 10,
            connect_timeout_secs: 5,
            max_redirects: 10,
            retry_on_5xx: true,
            retry_delay_ms: 1000,
            header_profiles: HeaderProfile::defaults(),
        }
    }
}

impl DnrmapConfig {
    /// Rejects values that would make every probe fail or the pool unbounded.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency_limit == 0 {
            anyhow::bail!("concurrency_limit must be at least 1");
        }
        if self.schemes_to_try.is_empty() {
            anyhow::bail!("schemes_to_try must name at least one scheme");
        }
        if self.header_profiles.is_empty() {
            anyhow::bail!("header_profiles must contain at least one profile");
        }
        if self.probe_timeout_secs == 0 {
            anyhow::bail!("probe_timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::courtesy(
            self.retry_on_5xx,
            Duration::from_millis(self.retry_delay_ms),
        )
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            schemes: self.schemes_to_try.clone(),
            header_profiles: self.header_profiles.clone(),
            timeout: Duration::from_secs(self.probe_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_redirects: self.max_redirects,
            retry: self.retry_policy(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dnrmap")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DnrmapConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DnrmapConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<DnrmapConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: DnrmapConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
