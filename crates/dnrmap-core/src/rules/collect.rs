//! Domain extraction from a rule collection.

use serde_json::Value;
use std::collections::BTreeSet;

use super::initiator_domains;

/// Union of every string in `condition.initiatorDomains` across all rules.
/// `urlFilter` is not inspected; non-string entries are ignored.
pub fn collect_domains(rules: &[Value]) -> BTreeSet<String> {
    rules
        .iter()
        .filter_map(initiator_domains)
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unions_initiator_domains() {
        let rules = vec![
            json!({"id": 1, "condition": {"initiatorDomains": ["b.org", "a.org"]}}),
            json!({"id": 2, "condition": {"initiatorDomains": ["a.org", "c.org"]}}),
        ];
        let domains: Vec<String> = collect_domains(&rules).into_iter().collect();
        assert_eq!(domains, vec!["a.org", "b.org", "c.org"]);
    }

    #[test]
    fn ignores_url_filter_and_malformed_rules() {
        let rules = vec![
            json!({"condition": {"urlFilter": "https://only-in-filter.org/*"}}),
            json!({"condition": {"initiatorDomains": "not-a-list.org"}}),
            json!({"condition": {"initiatorDomains": [42, null, "ok.org"]}}),
            json!({"action": {"type": "block"}}),
            json!("not even an object"),
        ];
        let domains: Vec<String> = collect_domains(&rules).into_iter().collect();
        assert_eq!(domains, vec!["ok.org"]);
    }

    #[test]
    fn empty_collection() {
        assert!(collect_domains(&[]).is_empty());
    }
}
