//! Domain canonicalization.
//!
//! Reduces a domain or host to a comparable form: lowercase, no literal
//! `www.` prefix, last two dot-separated labels. This is a coarse stand-in for
//! the registrable domain; multi-part public suffixes such as `co.uk` collapse
//! to the suffix itself (`foo.co.uk` -> `co.uk`).

use serde::{Deserialize, Serialize};
use std::fmt;

const WWW_PREFIX: &str = "www.";

/// Canonical, comparable form of a domain. Only built by [`canonicalize`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalDomain(String);

impl CanonicalDomain {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// True if `domain` canonicalizes to this value.
    pub fn is_same_site(&self, domain: &str) -> bool {
        canonicalize(domain) == *self
    }
}

impl fmt::Display for CanonicalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes a domain or host string. Total: every input yields a value.
///
/// - `www.Example.com` -> `example.com`
/// - `shop.example.com` -> `example.com`
/// - `localhost` -> `localhost`
pub fn canonicalize(input: &str) -> CanonicalDomain {
    let lowered = input.to_lowercase();
    let stripped = strip_www(&lowered);

    let labels: Vec<&str> = stripped.split('.').collect();
    let reduced = if labels.len() >= 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        stripped.to_string()
    };

    // `x.www.com` reduces to `www.com`; strip again so the result is a fixed point.
    CanonicalDomain(strip_www(&reduced).to_string())
}

/// Literal prefix check; `wwwexample.com` and `w.example.com` are left alone.
fn strip_www(s: &str) -> &str {
    s.strip_prefix(WWW_PREFIX).unwrap_or(s)
}

/// Host of an absolute URL (e.g. the effective URL after redirects).
pub fn host_of_url(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_string())
}
