//! FQDN splitting and subdomain tests
//!
//! A fully qualified name is split into the record's subname and the
//! registrable zone that owns it. Zones are the last two labels, or the
//! last three when the name ends in a known multi-label public suffix.

use crate::{Error, Result};

/// Multi-label public suffixes under which zones take three labels
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    // United Kingdom
    "co.uk", "org.uk", "me.uk", "ltd.uk", "plc.uk", "net.uk", "ac.uk", "gov.uk", "sch.uk",
    // Australia
    "com.au", "net.au", "org.au", "edu.au", "gov.au", "asn.au", "id.au",
    // New Zealand
    "co.nz", "net.nz", "org.nz", "ac.nz", "govt.nz", "school.nz",
    // Japan
    "co.jp", "ne.jp", "or.jp", "ac.jp", "go.jp",
    // Brazil
    "com.br", "net.br", "org.br", "gov.br",
    // South Africa
    "co.za", "org.za", "net.za",
    // India
    "co.in", "net.in", "org.in", "firm.in", "gen.in", "ind.in",
    // Others
    "com.cn", "net.cn", "org.cn", "com.mx", "com.ar", "com.tr", "com.tw", "com.hk", "com.sg",
    "com.my", "co.kr", "or.kr", "co.il", "co.id", "co.th", "com.ua", "com.pl", "co.at", "or.at",
];

/// Split a fully qualified name into `(subname, zone)`
///
/// One trailing dot is ignored. The subname is empty when the name is the
/// zone itself.
///
/// # Errors
///
/// Returns [`Error::InvalidFqdn`] for names with fewer than two labels.
///
/// # Examples
///
/// ```
/// use dnsapi_proxy_core::fqdn::split_fqdn;
///
/// let (name, zone) = split_fqdn("sub.test.example.com").unwrap();
/// assert_eq!(name, "sub.test");
/// assert_eq!(zone, "example.com");
/// ```
pub fn split_fqdn(full_name: &str) -> Result<(String, String)> {
    let trimmed = full_name.strip_suffix('.').unwrap_or(full_name);
    let labels: Vec<&str> = trimmed.split('.').collect();

    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(Error::InvalidFqdn(full_name.to_string()));
    }

    let suffix = labels[labels.len() - 2..].join(".");
    let zone_labels = if labels.len() >= 3 && is_multi_label_suffix(&suffix) {
        3
    } else {
        2
    };

    let split_at = labels.len() - zone_labels;
    let zone = labels[split_at..].join(".");
    let name = labels[..split_at].join(".");

    Ok((name, zone))
}

fn is_multi_label_suffix(suffix: &str) -> bool {
    MULTI_LABEL_SUFFIXES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(suffix))
}

/// Whether `sub` lies strictly below `parent`
///
/// A leading `*.` on `parent` is ignored and a bare `*` covers every name.
pub fn is_subdomain(sub: &str, parent: &str) -> bool {
    if parent == "*" {
        return true;
    }
    let parent = parent.strip_prefix("*.").unwrap_or(parent);
    if parent.is_empty() || sub.len() <= parent.len() {
        return false;
    }

    sub.strip_suffix(parent)
        .is_some_and(|head| head.ends_with('.') && head.len() > 1)
}
