//! Request domain resolution.
//!
//! Dynamic action links are derived from the host the visitor is browsing.
//! Loopback names and IP literals (local development, health probes) have no
//! meaningful subdomain, so they resolve to [`RequestDomain::Unresolvable`]
//! and callers use the static fallback instead.

use axum::http::header::HOST;
use axum::http::HeaderMap;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

pub const X_FORWARDED_HOST: &str = "x-forwarded-host";

static IPV4_REGEX: OnceLock<Regex> = OnceLock::new();

/// Externally visible domain of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestDomain {
    /// Port-stripped, lower-cased host name
    Usable(String),
    Unresolvable,
}

/// Classify a raw `Host` header value.
pub fn resolve_domain(host_header: Option<&str>) -> RequestDomain {
    let Some(raw) = host_header else {
        debug!("No host header, using fallback link");
        return RequestDomain::Unresolvable;
    };

    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        debug!("IPv6 literal host {}, using fallback link", trimmed);
        return RequestDomain::Unresolvable;
    }

    let host = trimmed.split(':').next().unwrap_or_default().to_ascii_lowercase();
    if host.is_empty() || host == "localhost" || host == "0.0.0.0" || is_ipv4_literal(&host) {
        debug!("Host '{}' is not a public domain, using fallback link", trimmed);
        return RequestDomain::Unresolvable;
    }

    RequestDomain::Usable(host)
}

/// Pick the host header to resolve, honoring `X-Forwarded-Host` when the
/// server sits behind a trusted proxy.
pub fn host_from_headers(headers: &HeaderMap, trust_forwarded: bool) -> Option<&str> {
    let forwarded = trust_forwarded
        .then(|| headers.get(X_FORWARDED_HOST))
        .flatten()
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    forwarded.or_else(|| {
        let value = headers.get(HOST)?;
        match value.to_str() {
            Ok(host) => Some(host),
            Err(_) => {
                debug!("Host header is not valid UTF-8");
                None
            }
        }
    })
}

fn is_ipv4_literal(host: &str) -> bool {
    let regex = IPV4_REGEX
        .get_or_init(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap());
    regex.is_match(host)
}
