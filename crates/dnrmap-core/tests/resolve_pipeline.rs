//! Integration test: rule file in, probes against local servers, rule file out.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::probe_server::{self, Behavior};
use dnrmap_core::probe::{ProbeSettings, Prober, Scheme};
use dnrmap_core::resolve::{resolve_all, ResolveOptions};
use dnrmap_core::retry::RetryPolicy;
use dnrmap_core::rules::{apply_mapping_counted, collect_domains, load_rules, save_rules};
use serde_json::json;
use tempfile::tempdir;

#[tokio::test]
async fn rules_are_rewritten_from_live_redirects() {
    let moved = probe_server::start(Behavior::RedirectToLocalhost);
    let dead = format!("127.0.0.1:{}", probe_server::closed_port());

    let dir = tempdir().unwrap();
    let input = dir.path().join("rules.json");
    let rules = json!([
        {"id": 1, "priority": 1, "action": {"type": "block"},
         "condition": {"initiatorDomains": [moved.domain(), dead], "resourceTypes": ["script"]}},
        {"id": 2, "condition": {"urlFilter": "||ads.example^"}}
    ]);
    std::fs::write(&input, serde_json::to_string(&rules).unwrap()).unwrap();

    let rules = load_rules(&input).unwrap();
    let domains = collect_domains(&rules);
    assert_eq!(domains.len(), 2);

    let prober = Arc::new(Prober::with_curl(ProbeSettings {
        schemes: vec![Scheme::Http],
        timeout: Duration::from_secs(2),
        connect_timeout: Duration::from_secs(1),
        retry: RetryPolicy::none(),
        ..ProbeSettings::default()
    }));
    let resolution = resolve_all(prober, &domains, ResolveOptions::new(4)).await;
    assert_eq!(resolution.probed, 2);
    assert_eq!(resolution.mapping.len(), 1);
    assert!(resolution.unresolved.contains(&dead));

    let (updated, stats) = apply_mapping_counted(&rules, &resolution.mapping);
    assert_eq!(stats.initiator_entries_replaced, 1);

    let output = dir.path().join("updated-rules.json");
    save_rules(&output, &updated).unwrap();
    let written = load_rules(&output).unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(
        written[0]["condition"]["initiatorDomains"],
        json!(["localhost", dead])
    );
    assert_eq!(written[0]["condition"]["resourceTypes"], json!(["script"]));
    assert_eq!(written[1], rules[1]);
}
