//! `dnrmap domains <input>`: list collected initiator domains.

use anyhow::Result;
use dnrmap_core::rules;
use std::path::Path;

pub fn run_domains(input: &Path) -> Result<()> {
    let rules = rules::load_rules(input)?;
    let domains = rules::collect_domains(&rules);
    for domain in &domains {
        println!("{}", domain);
    }
    tracing::info!(rules = rules.len(), domains = domains.len(), "domains listed");
    Ok(())
}
