//! Dynamic action links and href rewriting.
//!
//! Call-to-action destinations are configured once against a reference
//! domain (e.g. `https://user.xrista.net/signup?plan=pro`). At request time
//! the host is swapped for the visitor's action host while the path, query
//! and fragment are kept, so every outbound link stays on the domain family
//! the visitor arrived through.

use crate::domain::RequestDomain;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

pub const DEFAULT_SUBDOMAIN: &str = "user";
pub const DEFAULT_FALLBACK_URL: &str = "https://user.xrista.net";

static SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();
static PORT_REGEX: OnceLock<Regex> = OnceLock::new();

/// Fully qualified action URL for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DynamicLink(String);

impl DynamicLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rewrite a configured destination onto this link's host.
    pub fn resolve(&self, configured: &str) -> String {
        resolve_href(&self.0, configured)
    }
}

impl fmt::Display for DynamicLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DynamicLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Prefix `https://` unless the URL already carries an http(s) scheme.
pub fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Build `https://<subdomain>.<domain>`, or the fallback when the request
/// domain is unusable.
pub fn build_dynamic_link(domain: &RequestDomain, fallback_url: &str, subdomain: &str) -> DynamicLink {
    match domain {
        RequestDomain::Usable(domain) => {
            DynamicLink(ensure_scheme(&format!("{}.{}", subdomain, domain)))
        }
        RequestDomain::Unresolvable => DynamicLink(ensure_scheme(fallback_url)),
    }
}

/// How a configured href is treated by [`resolve_href`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrefKind {
    /// Blank; the dynamic base is used as-is
    Empty,
    /// `/path` or `#anchor`; never rewritten
    Internal,
    /// `mailto:`, `tel:` and other non-web schemes; never rewritten
    NonWeb,
    /// Absolute or scheme-less web URL; host is rewritten
    Web,
}

pub fn classify_href(href: &str) -> HrefKind {
    let href = href.trim();
    if href.is_empty() {
        return HrefKind::Empty;
    }
    if href.starts_with('#') || href.starts_with('/') {
        return HrefKind::Internal;
    }
    if has_non_web_scheme(href) {
        return HrefKind::NonWeb;
    }
    HrefKind::Web
}

/// Rewrite `configured` so its host becomes the host of `dynamic_base`.
///
/// Internal and non-web hrefs are returned unchanged. Blank hrefs and
/// anything that fails to parse yield `dynamic_base`.
pub fn resolve_href(dynamic_base: &str, configured: &str) -> String {
    let trimmed = configured.trim();
    match classify_href(trimmed) {
        HrefKind::Empty => dynamic_base.to_string(),
        HrefKind::Internal | HrefKind::NonWeb => trimmed.to_string(),
        HrefKind::Web => {
            rewrite_host(dynamic_base, trimmed).unwrap_or_else(|| dynamic_base.to_string())
        }
    }
}

/// Parse a configured web href. `https://` is added only when the href has
/// no http(s) scheme in any letter case.
pub fn parse_web_url(href: &str) -> Result<Url, url::ParseError> {
    let href = href.trim();
    if has_web_scheme(href) {
        Url::parse(href)
    } else {
        Url::parse(&ensure_scheme(href))
    }
}

fn has_web_scheme(href: &str) -> bool {
    href.split_once("://").is_some_and(|(scheme, _)| {
        scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
    })
}

fn rewrite_host(dynamic_base: &str, configured: &str) -> Option<String> {
    let base = Url::parse(dynamic_base).ok()?;
    if !matches!(base.scheme(), "http" | "https") {
        return None;
    }
    let target = parse_web_url(configured).ok()?;

    // Nothing to carry over
    if base.path() == "/"
        && target.path() == "/"
        && target.query().is_none()
        && target.fragment().is_none()
    {
        return Some(dynamic_base.to_string());
    }

    let mut resolved = base;
    resolved.set_path(target.path());
    resolved.set_query(target.query());
    resolved.set_fragment(target.fragment());
    Some(resolved.to_string())
}

/// `scheme:rest` where the scheme is not http(s). A `host:port` prefix
/// (`example.com:8080`, `localhost:3000`) is not a scheme.
fn has_non_web_scheme(href: &str) -> bool {
    let scheme_regex = SCHEME_REGEX
        .get_or_init(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):(.*)$").unwrap());
    let port_regex = PORT_REGEX.get_or_init(|| Regex::new(r"^\d+(?:[/?#]|$)").unwrap());

    let Some(captures) = scheme_regex.captures(href) else {
        return false;
    };
    let scheme = captures.get(1).map_or("", |m| m.as_str());
    let rest = captures.get(2).map_or("", |m| m.as_str());

    if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
        return false;
    }

    let looks_like_host = scheme.contains('.') || scheme.eq_ignore_ascii_case("localhost");
    !(looks_like_host && port_regex.is_match(rest))
}
