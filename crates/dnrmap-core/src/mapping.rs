//! Old -> new domain mapping produced by resolution and consumed by the rule rewrite.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::canonical::{canonicalize, CanonicalDomain};

/// Mapping from an original domain (as written in the rules) to its canonical
/// redirect target. Holds only entries where the canonical form changed.
///
/// Backed by a `BTreeMap` so iteration order, and therefore which entry wins a
/// `urlFilter` host match, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DomainMapping {
    entries: BTreeMap<String, CanonicalDomain>,
}

impl DomainMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `original -> target` unless the target is the canonical form of
    /// `original` (a www/case/subdomain-only difference). Returns whether an
    /// entry was added.
    pub fn record(&mut self, original: &str, target: CanonicalDomain) -> bool {
        if canonicalize(original) == target {
            return false;
        }
        self.entries.insert(original.to_string(), target);
        true
    }

    pub fn get(&self, original: &str) -> Option<&CanonicalDomain> {
        self.entries.get(original)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalDomain)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_targets_are_not_recorded() {
        let mut m = DomainMapping::new();
        assert!(!m.record("www.Example.com", canonicalize("example.com")));
        assert!(!m.record("shop.example.com", canonicalize("example.com")));
        assert!(m.is_empty());
    }

    #[test]
    fn changed_targets_are_recorded() {
        let mut m = DomainMapping::new();
        assert!(m.record("old-site.org", canonicalize("www.new-site.org")));
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("old-site.org").map(|c| c.as_str()), Some("new-site.org"));
    }

    #[test]
    fn iteration_is_sorted_by_original() {
        let mut m = DomainMapping::new();
        m.record("zeta.org", canonicalize("a.org"));
        m.record("alpha.org", canonicalize("b.org"));
        let keys: Vec<&str> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha.org", "zeta.org"]);
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut m = DomainMapping::new();
        m.record("old-site.org", canonicalize("new-site.org"));
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"old-site.org":"new-site.org"}"#);
    }
}
