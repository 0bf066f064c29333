//! Per-request page context.
//!
//! Everything a renderer needs for one page in one language: the overlaid
//! site configuration, translated sections with default-language gaps
//! filled, and every configured link rewritten onto the visitor's action
//! host.

use crate::config::Config;
use crate::domain::resolve_domain;
use crate::i18n::{Language, LocaleCatalog, Section, SiteConfig, Translator};
use crate::links::{build_dynamic_link, DynamicLink};
use crate::negotiate::localized_path;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    About,
    Network,
    Faq,
    Privacy,
    Terms,
    Download,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::About,
        Page::Network,
        Page::Faq,
        Page::Privacy,
        Page::Terms,
        Page::Download,
    ];

    /// URL segment after the language; empty for the home page.
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "",
            Page::About => "about",
            Page::Network => "network",
            Page::Faq => "faq",
            Page::Privacy => "privacy",
            Page::Terms => "terms",
            Page::Download => "download",
        }
    }

    /// Accepts a single trailing slash (`about/`).
    pub fn from_slug(slug: &str) -> Option<Page> {
        let slug = slug.strip_suffix('/').unwrap_or(slug);
        Page::ALL.into_iter().find(|page| page.slug() == slug)
    }

    /// Path relative to the language segment: `""` or `/about`.
    pub fn path(&self) -> String {
        match self {
            Page::Home => String::new(),
            other => format!("/{}", other.slug()),
        }
    }

    /// Translation sections rendered on this page, besides `common`.
    pub fn sections(&self) -> &'static [Section] {
        match self {
            Page::Home => &[
                Section::Hero,
                Section::Stats,
                Section::Features,
                Section::Pricing,
                Section::Cta,
                Section::Footer,
            ],
            Page::About => &[Section::About, Section::Footer],
            Page::Network => &[Section::Network, Section::Footer],
            Page::Faq => &[Section::Faq, Section::Footer],
            Page::Privacy => &[Section::Privacy, Section::Footer],
            Page::Terms => &[Section::Terms, Section::Footer],
            Page::Download => &[Section::Download, Section::Footer],
        }
    }

    /// Section holding the page's `seo.title`/`seo.description`.
    fn seo_section(&self) -> Option<Section> {
        match self {
            Page::Home => None,
            Page::About => Some(Section::About),
            Page::Network => Some(Section::Network),
            Page::Faq => Some(Section::Faq),
            Page::Privacy => Some(Section::Privacy),
            Page::Terms => Some(Section::Terms),
            Page::Download => Some(Section::Download),
        }
    }
}

/// The same page in another language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternate {
    pub language: Language,
    pub native_name: &'static str,
    /// Site-relative path, used by the language switcher
    pub path: String,
    /// Absolute URL, used for `hreflang` links
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub language: Language,
    pub og_locale: &'static str,
    pub page: Page,
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub alternates: Vec<Alternate>,
    pub config: SiteConfig,
    pub dynamic_base: DynamicLink,
    /// Dotted link name → resolved href
    pub links: BTreeMap<String, String>,
    pub translations: BTreeMap<Section, Value>,
}

impl PageContext {
    /// Build the context for `page` in `language`, as seen from `host`.
    pub fn build(
        catalog: &LocaleCatalog,
        config: &Config,
        language: Language,
        page: Page,
        host: Option<&str>,
    ) -> PageContext {
        let bundle = catalog.resolve(language);
        let site_config = config.overrides.apply(&bundle.config);
        let translator = catalog.translator(language);

        let domain = resolve_domain(host);
        let dynamic_base = build_dynamic_link(&domain, &config.fallback_url, &config.link_subdomain);

        let links = site_config
            .all_links()
            .into_iter()
            .map(|(name, href)| (name, dynamic_base.resolve(href)))
            .collect();

        let translations = std::iter::once(Section::Common)
            .chain(page.sections().iter().copied())
            .filter_map(|section| match translator.section(section) {
                Some(value) => Some((section, value)),
                None => {
                    warn!("Translation section {} missing for '{}'", section.as_str(), language);
                    None
                }
            })
            .collect();

        let (title, description) = page_meta(&translator, &site_config, page);

        let alternates = Language::all()
            .into_iter()
            .map(|alternate| Alternate {
                language: alternate,
                native_name: alternate.native_name(),
                path: localized_path(&page.path(), alternate),
                href: page_url(&site_config.site.url, alternate, page),
            })
            .collect();

        PageContext {
            language,
            og_locale: language.og_locale(),
            page,
            title,
            description,
            canonical_url: page_url(&site_config.site.url, language, page),
            alternates,
            config: site_config,
            dynamic_base,
            links,
            translations,
        }
    }
}

fn page_meta(translator: &Translator, config: &SiteConfig, page: Page) -> (String, String) {
    match page.seo_section() {
        Some(section) => (
            format!("{} - {}", translator.t(section, "seo.title"), config.site.name),
            translator.t(section, "seo.description"),
        ),
        None => (config.site.name.clone(), config.site.description.clone()),
    }
}

/// Absolute URL of `page` in `language` under the site URL.
pub fn page_url(site_url: &str, language: Language, page: Page) -> String {
    let path = format!("/{}{}", language.code(), page.path());
    match Url::parse(site_url).and_then(|base| base.join(&path)) {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!("Site URL '{}' is not a valid base: {}", site_url, e);
            format!("{}{}", site_url.trim_end_matches('/'), path)
        }
    }
}
