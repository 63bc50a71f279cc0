//! Probe attempt matrix: schemes × header profiles, tried in order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// URL scheme to probe with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named set of request headers. An empty set sends no extra headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderProfile {
    pub name: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl HeaderProfile {
    /// Full browser-like header set.
    pub fn browser() -> Self {
        let headers = [
            ("User-Agent", BROWSER_USER_AGENT),
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
            ("Accept-Language", "en-US,en;q=0.9"),
            ("Upgrade-Insecure-Requests", "1"),
        ];
        Self {
            name: "browser".to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// User-Agent only.
    pub fn minimal() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), BROWSER_USER_AGENT.to_string());
        Self {
            name: "minimal".to_string(),
            headers,
        }
    }

    /// No headers at all.
    pub fn none() -> Self {
        Self {
            name: "none".to_string(),
            headers: BTreeMap::new(),
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![Self::browser(), Self::minimal(), Self::none()]
    }
}

/// One (scheme, header profile) entry of the matrix.
#[derive(Debug, Clone, Copy)]
pub struct ProbeAttempt<'a> {
    pub scheme: Scheme,
    pub profile: &'a HeaderProfile,
}

impl ProbeAttempt<'_> {
    pub fn url(&self, domain: &str) -> String {
        format!("{}://{}", self.scheme, domain)
    }
}

/// Builds the ordered matrix: schemes outer, profiles inner.
pub fn attempt_matrix<'a>(schemes: &[Scheme], profiles: &'a [HeaderProfile]) -> Vec<ProbeAttempt<'a>> {
    schemes
        .iter()
        .flat_map(|&scheme| profiles.iter().map(move |profile| ProbeAttempt { scheme, profile }))
        .collect()
}
