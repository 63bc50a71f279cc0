//! Rule mapper and rule store.
//!
//! Rules are kept as raw JSON values: only `condition.initiatorDomains` and
//! `condition.urlFilter` are ever read or replaced, everything else (including
//! key order, thanks to serde_json's `preserve_order`) round-trips untouched.
//! Rules that do not have the expected shape are passed through, never rejected.

mod collect;
mod prune;
mod rewrite;
pub mod store;
mod url_filter;

pub use collect::collect_domains;
pub use prune::{prune_unresolved, PruneStats};
pub use rewrite::{apply_mapping, apply_mapping_counted, RewriteStats};
pub use store::{load_rules, render_rules, save_rules, RuleStoreError};
pub use url_filter::{rewrite_url_filter, url_filter_host};

use serde_json::Value;

/// One rule: an opaque JSON value.
pub type Rule = Value;

pub(crate) const CONDITION: &str = "condition";
pub(crate) const INITIATOR_DOMAINS: &str = "initiatorDomains";
pub(crate) const URL_FILTER: &str = "urlFilter";

/// `rule.condition.initiatorDomains`, if the rule has that shape.
pub(crate) fn initiator_domains(rule: &Value) -> Option<&Vec<Value>> {
    rule.get(CONDITION)?.get(INITIATOR_DOMAINS)?.as_array()
}

pub(crate) fn initiator_domains_mut(rule: &mut Value) -> Option<&mut Vec<Value>> {
    rule.get_mut(CONDITION)?
        .get_mut(INITIATOR_DOMAINS)?
        .as_array_mut()
}

pub(crate) fn url_filter_mut(rule: &mut Value) -> Option<&mut Value> {
    rule.get_mut(CONDITION)?.get_mut(URL_FILTER)
}
