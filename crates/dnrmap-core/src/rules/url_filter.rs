//! Host rewriting inside URL-shaped `urlFilter` strings.
//!
//! Filters are edited in place at the host's byte span, so scheme, port, path,
//! query and wildcard characters come out exactly as they went in. Filters
//! without a `scheme://` prefix (e.g. `||example.com^`) are not URL-shaped and
//! are left alone.

use std::ops::Range;

use crate::mapping::DomainMapping;

/// Byte span of the host component, if `filter` is URL-shaped.
fn host_span(filter: &str) -> Option<Range<usize>> {
    let scheme_end = filter.find("://")?;
    let scheme = filter[..scheme_end].trim_start_matches('|');
    let scheme_ok = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '*'));
    if !scheme_ok {
        return None;
    }

    let authority_start = scheme_end + 3;
    let rest = &filter[authority_start..];
    let authority_len = rest
        .find(|c| matches!(c, '/' | '?' | '#' | '^' | '|'))
        .unwrap_or(rest.len());
    let authority = &rest[..authority_len];

    let host_offset = authority.rfind('@').map_or(0, |i| i + 1);
    let host_and_port = &authority[host_offset..];
    let host_len = if host_and_port.starts_with('[') {
        host_and_port.find(']').map_or(host_and_port.len(), |i| i + 1)
    } else {
        host_and_port.find(':').unwrap_or(host_and_port.len())
    };
    if host_len == 0 {
        return None;
    }

    let start = authority_start + host_offset;
    Some(start..start + host_len)
}

/// Host component of a URL-shaped filter, wildcards included.
pub fn url_filter_host(filter: &str) -> Option<&str> {
    host_span(filter).map(|span| &filter[span])
}

/// Applies the first matching mapping entry to the filter's host. An entry
/// equal to the host wins; otherwise the first entry (in mapping order) that
/// is a substring of the host. Returns `None` when nothing changes.
pub fn rewrite_url_filter(filter: &str, mapping: &DomainMapping) -> Option<String> {
    let span = host_span(filter)?;
    let host = &filter[span.clone()];

    let (old, new) = mapping
        .iter()
        .find(|(old, _)| *old == host)
        .or_else(|| {
            mapping
                .iter()
                .find(|(old, _)| !old.is_empty() && host.contains(*old))
        })?;

    let new_host = host.replace(old, new.as_str());
    if new_host == host {
        return None;
    }

    let mut out = String::with_capacity(filter.len() + new_host.len());
    out.push_str(&filter[..span.start]);
    out.push_str(&new_host);
    out.push_str(&filter[span.end..]);
    Some(out)
}
