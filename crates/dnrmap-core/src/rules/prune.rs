//! Optional removal of unreachable initiator domains.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

use super::initiator_domains_mut;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PruneStats {
    /// `initiatorDomains` entries removed.
    pub entries_removed: usize,
    /// Rules left untouched because pruning would have emptied their list.
    pub lists_kept: usize,
}

/// Drops `initiatorDomains` entries that appear in `unresolved`.
///
/// An initiator list that would become empty is left as it was: an empty or
/// missing list widens the rule to every initiator.
pub fn prune_unresolved(rules: &[Value], unresolved: &BTreeSet<String>) -> (Vec<Value>, PruneStats) {
    let mut stats = PruneStats::default();
    let mut out = rules.to_vec();
    if unresolved.is_empty() {
        return (out, stats);
    }

    for (index, rule) in out.iter_mut().enumerate() {
        let Some(domains) = initiator_domains_mut(rule) else {
            continue;
        };
        let is_dead = |v: &Value| v.as_str().is_some_and(|d| unresolved.contains(d));
        let dead = domains.iter().filter(|v| is_dead(v)).count();
        if dead == 0 {
            continue;
        }
        if dead == domains.len() {
            tracing::warn!(
                rule = index,
                "every initiator domain is unreachable; keeping list unchanged"
            );
            stats.lists_kept += 1;
            continue;
        }
        domains.retain(|v| !is_dead(v));
        stats.entries_removed += dead;
    }

    (out, stats)
}
