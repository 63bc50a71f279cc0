//! Reading and writing the rule file.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleStoreError {
    #[error("read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path}: top-level value is not an array of rules")]
    NotAnArray { path: PathBuf },
    #[error("serialize rules: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Reads a JSON array of rules. Individual rules are not validated.
pub fn load_rules(path: &Path) -> Result<Vec<Value>, RuleStoreError> {
    let data = fs::read_to_string(path).map_err(|source| RuleStoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&data).map_err(|source| RuleStoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Array(rules) => Ok(rules),
        _ => Err(RuleStoreError::NotAnArray {
            path: path.to_path_buf(),
        }),
    }
}

/// Renders rules as a JSON array with 4-space indentation; non-ASCII text is
/// written as-is.
pub fn render_rules(rules: &[Value]) -> Result<Vec<u8>, RuleStoreError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    rules
        .serialize(&mut ser)
        .map_err(RuleStoreError::Serialize)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Writes rules to `path` atomically: a temp file in the same directory is
/// filled, synced and renamed over the destination.
pub fn save_rules(path: &Path, rules: &[Value]) -> Result<(), RuleStoreError> {
    let bytes = render_rules(rules)?;
    let write_err = |source: io::Error| RuleStoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::info!(path = %path.display(), rules = rules.len(), "rules written");
    Ok(())
}
