//! Apply a domain mapping to a rule collection.

use serde::Serialize;
use serde_json::Value;

use super::url_filter::rewrite_url_filter;
use super::{initiator_domains_mut, url_filter_mut};
use crate::mapping::DomainMapping;

/// What a rewrite pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    /// Rules with at least one changed field.
    pub rules_changed: usize,
    /// Individual `initiatorDomains` entries replaced.
    pub initiator_entries_replaced: usize,
    /// `urlFilter` values rewritten.
    pub url_filters_rewritten: usize,
}

/// Returns a copy of `rules` with the mapping applied. Rule count and order
/// are preserved; only `initiatorDomains` entries and the host of a URL-shaped
/// `urlFilter` can change.
pub fn apply_mapping(rules: &[Value], mapping: &DomainMapping) -> Vec<Value> {
    apply_mapping_counted(rules, mapping).0
}

/// Like [`apply_mapping`], also reporting what changed.
pub fn apply_mapping_counted(rules: &[Value], mapping: &DomainMapping) -> (Vec<Value>, RewriteStats) {
    let mut stats = RewriteStats::default();
    let mut out = rules.to_vec();
    if mapping.is_empty() {
        return (out, stats);
    }

    for rule in &mut out {
        let mut changed = false;

        if let Some(domains) = initiator_domains_mut(rule) {
            // Positional substitution: order and duplicates stay as they are.
            for entry in domains.iter_mut() {
                let Some(target) = entry.as_str().and_then(|d| mapping.get(d)) else {
                    continue;
                };
                *entry = Value::String(target.to_string());
                stats.initiator_entries_replaced += 1;
                changed = true;
            }
        }

        if let Some(filter) = url_filter_mut(rule) {
            let rewritten = filter.as_str().and_then(|f| rewrite_url_filter(f, mapping));
            if let Some(rewritten) = rewritten {
                *filter = Value::String(rewritten);
                stats.url_filters_rewritten += 1;
                changed = true;
            }
        }

        if changed {
            stats.rules_changed += 1;
        }
    }

    (out, stats)
}
