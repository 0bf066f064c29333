//! Request language negotiation.
//!
//! Every page URL carries its language as the first path segment. Requests
//! without one are redirected to the same path under the negotiated
//! language, chosen from the `locale` cookie, then `Accept-Language`, then
//! the default. The choice is persisted in the cookie so later requests skip
//! header parsing.

use crate::i18n::Language;
use crate::server::AppState;
use axum::extract::{Request, State};
use axum::http::header::{ACCEPT_LANGUAGE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::cmp::Ordering;
use tracing::{debug, warn};

pub const LOCALE_COOKIE: &str = "locale";

/// One year, in seconds.
pub const LOCALE_COOKIE_MAX_AGE: u64 = 365 * 24 * 60 * 60;

/// Paths that never carry a language segment.
const EXEMPT_PREFIXES: &[&str] = &[
    "/api/",
    "/static/",
    "/favicon.ico",
    "/robots.txt",
    "/sitemap.xml",
];

/// Which signal decided the language of a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSignal {
    Cookie,
    AcceptLanguage,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    /// Serve the request unchanged
    PassThrough,
    /// Redirect to `location` and persist `language` in the cookie
    Redirect {
        language: Language,
        location: String,
        signal: LanguageSignal,
    },
}

/// The parts of a request that negotiation looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegotiationRequest<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    /// Value of the `locale` cookie, if sent
    pub locale_cookie: Option<&'a str>,
    pub accept_language: Option<&'a str>,
}

/// Decide whether to redirect, and where.
pub fn negotiate(request: &NegotiationRequest<'_>) -> Negotiation {
    if is_exempt_path(request.path) || language_from_path(request.path).is_some() {
        return Negotiation::PassThrough;
    }

    let (language, signal) = choose_language(request.locale_cookie, request.accept_language);

    let mut location = localized_path(request.path, language);
    if let Some(query) = request.query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(query);
    }

    Negotiation::Redirect {
        language,
        location,
        signal,
    }
}

/// API routes, well-known files and anything with a file extension.
pub fn is_exempt_path(path: &str) -> bool {
    path == "/api" || EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) || path.contains('.')
}

/// Language named by the first path segment (`/zh` or `/zh/...`).
pub fn language_from_path(path: &str) -> Option<Language> {
    let rest = path.strip_prefix('/')?;
    let segment = rest.split('/').next().unwrap_or(rest);
    Language::from_code(segment).ok()
}

/// `path` without its leading language segment; `/` when nothing remains.
pub fn strip_language_prefix(path: &str) -> &str {
    match language_from_path(path) {
        Some(language) => {
            let rest = &path[1 + language.code().len()..];
            if rest.is_empty() {
                "/"
            } else {
                rest
            }
        }
        None => path,
    }
}

/// The same page under `language`: `/about` → `/zh/about`, `/` → `/zh`.
pub fn localized_path(path: &str, language: Language) -> String {
    let rest = strip_language_prefix(path);
    if rest == "/" || rest.is_empty() {
        format!("/{}", language.code())
    } else if rest.starts_with('/') {
        format!("/{}{}", language.code(), rest)
    } else {
        format!("/{}/{}", language.code(), rest)
    }
}

/// Cookie first, then `Accept-Language`, then the default.
pub fn choose_language(
    locale_cookie: Option<&str>,
    accept_language: Option<&str>,
) -> (Language, LanguageSignal) {
    if let Some(language) = locale_cookie.and_then(|v| Language::from_code(v.trim()).ok()) {
        return (language, LanguageSignal::Cookie);
    }
    if let Some(language) = accept_language.and_then(language_from_accept_language) {
        return (language, LanguageSignal::AcceptLanguage);
    }
    (Language::default_language(), LanguageSignal::Default)
}

/// One entry of an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    pub tag: String,
    pub weight: f32,
}

/// Parse `Accept-Language` into ranges ordered by descending weight.
///
/// Entries keep header order on equal weight. Every entry stays a
/// candidate; an unparseable weight ranks as `q=0`.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
    let mut ranges: Vec<LanguageRange> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() {
                return None;
            }

            let mut weight = 1.0_f32;
            for param in pieces {
                let param = param.trim();
                if let Some(q) = param.strip_prefix("q=").or_else(|| param.strip_prefix("Q=")) {
                    weight = q.trim().parse::<f32>().ok().filter(|w| w.is_finite()).unwrap_or(0.0);
                }
            }

            Some(LanguageRange {
                tag: tag.to_ascii_lowercase(),
                weight,
            })
        })
        .collect();

    ranges.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    ranges
}

/// First range whose tag or primary subtag is supported.
pub fn language_from_accept_language(header: &str) -> Option<Language> {
    parse_accept_language(header)
        .iter()
        .find_map(|range| Language::from_tag(&range.tag))
}

/// Find a cookie value across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
}

/// `Set-Cookie` value persisting the negotiated language.
///
/// Readable from scripts so the language switcher can update it.
pub fn locale_cookie(language: Language, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        LOCALE_COOKIE,
        language.code(),
        LOCALE_COOKIE_MAX_AGE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Middleware applying [`negotiate`] to every request.
pub async fn negotiate_locale(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let input = NegotiationRequest {
        path: request.uri().path(),
        query: request.uri().query(),
        locale_cookie: cookie_value(headers, LOCALE_COOKIE),
        accept_language: headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()),
    };

    match negotiate(&input) {
        Negotiation::PassThrough => next.run(request).await,
        Negotiation::Redirect {
            language,
            location,
            signal,
        } => {
            debug!("Redirecting {} to {} ({:?})", request.uri().path(), location, signal);
            let secure = state.config.environment.is_production();
            redirect_with_cookie(&location, language, secure)
        }
    }
}

fn redirect_with_cookie(location: &str, language: Language, secure: bool) -> Response {
    let mut response = Redirect::temporary(location).into_response();
    match HeaderValue::from_str(&locale_cookie(language, secure)) {
        Ok(cookie) => {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
        Err(e) => warn!("Could not encode locale cookie: {}", e),
    }
    response
}
