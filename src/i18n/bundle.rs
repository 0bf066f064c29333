//! Locale bundle data model: site configuration plus translation tree.

use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Immutable `{config, translations}` pair for one language.
#[derive(Debug, Clone)]
pub struct LocaleBundle {
    /// Language the data was actually loaded for. After a fallback
    /// substitution this is the default language, not the requested one.
    pub language: Language,
    pub config: SiteConfig,
    pub translations: TranslationTree,
}

/// On-disk shape of a locale data file.
#[derive(Debug, Deserialize)]
pub(crate) struct LocaleDocument {
    pub config: SiteConfig,
    pub translations: TranslationTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub site: SiteIdentity,
    pub links: SiteLinks,
    pub pricing: PricingConfig,
    #[serde(default)]
    pub navigation: Vec<NavigationItem>,
    pub cta: CtaConfig,
    pub footer: FooterConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteIdentity {
    pub name: String,
    pub url: String,
    pub description: String,
}

/// Fixed set of named external links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLinks {
    pub download: String,
    pub demo: String,
    pub login: String,
    pub signup: String,
    pub pricing: String,
    pub contact: String,
    pub support: String,
    pub blog: String,
    pub privacy: String,
    pub terms: String,
    pub security: String,
}

impl SiteLinks {
    /// Every link with its name, in declaration order.
    pub fn entries(&self) -> [(&'static str, &str); 11] {
        [
            ("download", &self.download),
            ("demo", &self.demo),
            ("login", &self.login),
            ("signup", &self.signup),
            ("pricing", &self.pricing),
            ("contact", &self.contact),
            ("support", &self.support),
            ("blog", &self.blog),
            ("privacy", &self.privacy),
            ("terms", &self.terms),
            ("security", &self.security),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub currency: String,
    pub period: String,
    pub plans: BTreeMap<String, PricingPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    #[serde(default)]
    pub badge: String,
    pub button_text: String,
    pub button_link: String,
    /// Keys into the `pricing.features` translation section
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaConfig {
    pub primary_button: CtaButton,
    pub secondary_button: CtaButton,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtaButton {
    pub text: String,
    pub link: String,
}

/// Footer link groups: section name → link key → href.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterConfig {
    pub sections: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub enabled: bool,
}

impl SiteConfig {
    /// Every configured link as `(dotted name, href)`.
    ///
    /// Covers named links, CTA buttons, plan buttons, navigation and footer
    /// entries; used both for link resolution and for validation.
    pub fn all_links(&self) -> Vec<(String, &str)> {
        let mut links: Vec<(String, &str)> = self
            .links
            .entries()
            .into_iter()
            .map(|(name, href)| (format!("links.{}", name), href))
            .collect();

        links.push(("cta.primary".to_string(), &self.cta.primary_button.link));
        links.push(("cta.secondary".to_string(), &self.cta.secondary_button.link));

        for (id, plan) in &self.pricing.plans {
            links.push((format!("plans.{}", id), &plan.button_link));
        }
        for (index, item) in self.navigation.iter().enumerate() {
            links.push((format!("navigation.{}", index), &item.href));
        }
        for (section, entries) in &self.footer.sections {
            for (key, href) in entries {
                links.push((format!("footer.{}.{}", section, key), href));
            }
        }

        links
    }
}

/// A named translation section; each maps to one page or shared component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Common,
    Hero,
    Features,
    Stats,
    Pricing,
    Cta,
    Footer,
    About,
    Network,
    Privacy,
    Terms,
    Faq,
    Download,
}

impl Section {
    pub const ALL: [Section; 13] = [
        Section::Common,
        Section::Hero,
        Section::Features,
        Section::Stats,
        Section::Pricing,
        Section::Cta,
        Section::Footer,
        Section::About,
        Section::Network,
        Section::Privacy,
        Section::Terms,
        Section::Faq,
        Section::Download,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Common => "common",
            Section::Hero => "hero",
            Section::Features => "features",
            Section::Stats => "stats",
            Section::Pricing => "pricing",
            Section::Cta => "cta",
            Section::Footer => "footer",
            Section::About => "about",
            Section::Network => "network",
            Section::Privacy => "privacy",
            Section::Terms => "terms",
            Section::Faq => "faq",
            Section::Download => "download",
        }
    }
}

/// Nested translation data, addressed by section and dotted key path.
///
/// `common` sits at the top level; every other section lives under `pages`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct TranslationTree(Value);

impl TranslationTree {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Root value of a section, if the section exists.
    pub fn section(&self, section: Section) -> Option<&Value> {
        match section {
            Section::Common => self.0.get("common"),
            other => self.0.get("pages")?.get(other.as_str()),
        }
    }

    /// Look up a string leaf. Numeric path segments index into arrays.
    pub fn lookup(&self, section: Section, key: &str) -> Option<&str> {
        let mut value = self.section(section)?;
        for segment in key.split('.') {
            value = match value {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        value.as_str()
    }

    /// Dotted paths of every string leaf in a section, sorted.
    pub fn declared_keys(&self, section: Section) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(root) = self.section(section) {
            collect_leaf_keys(root, String::new(), &mut keys);
        }
        keys.sort();
        keys
    }
}

fn collect_leaf_keys(value: &Value, prefix: String, keys: &mut Vec<String>) {
    match value {
        Value::String(_) => keys.push(prefix),
        Value::Object(map) => {
            for (segment, child) in map {
                collect_leaf_keys(child, join_key(&prefix, segment), keys);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                collect_leaf_keys(child, join_key(&prefix, &index.to_string()), keys);
            }
        }
        _ => {}
    }
}

fn join_key(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> TranslationTree {
        TranslationTree::new(json!({
            "common": {
                "buttons": { "signIn": "Sign In", "getStarted": "Get Started" }
            },
            "pages": {
                "hero": { "headline": "Secure", "count": 3 },
                "about": {
                    "seo": { "keywords": ["privacy", "speed"] },
                    "mission": { "pillars": [{ "title": "Trust" }] }
                }
            }
        }))
    }

    // ==================== Section Tests ====================

    #[test]
    fn test_section_serializes_as_name() {
        for section in Section::ALL {
            assert_eq!(serde_json::to_value(section).unwrap(), section.as_str());
        }
    }

    #[test]
    fn test_common_lives_at_top_level() {
        let tree = sample_tree();
        assert!(tree.section(Section::Common).is_some());
        assert!(tree.section(Section::Hero).is_some());
        assert!(tree.section(Section::Faq).is_none());
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_lookup_nested_key() {
        let tree = sample_tree();
        assert_eq!(tree.lookup(Section::Common, "buttons.signIn"), Some("Sign In"));
        assert_eq!(tree.lookup(Section::Hero, "headline"), Some("Secure"));
    }

    #[test]
    fn test_lookup_array_index() {
        let tree = sample_tree();
        assert_eq!(tree.lookup(Section::About, "seo.keywords.1"), Some("speed"));
        assert_eq!(tree.lookup(Section::About, "mission.pillars.0.title"), Some("Trust"));
        assert_eq!(tree.lookup(Section::About, "seo.keywords.9"), None);
        assert_eq!(tree.lookup(Section::About, "seo.keywords.first"), None);
    }

    #[test]
    fn test_lookup_non_string_leaf_is_none() {
        let tree = sample_tree();
        assert_eq!(tree.lookup(Section::Hero, "count"), None);
        assert_eq!(tree.lookup(Section::Common, "buttons"), None);
    }

    #[test]
    fn test_lookup_missing_key() {
        let tree = sample_tree();
        assert_eq!(tree.lookup(Section::Common, "buttons.missing"), None);
        assert_eq!(tree.lookup(Section::Faq, "title"), None);
    }

    // ==================== declared_keys Tests ====================

    #[test]
    fn test_declared_keys_lists_string_leaves() {
        let tree = sample_tree();
        assert_eq!(
            tree.declared_keys(Section::Common),
            vec!["buttons.getStarted".to_string(), "buttons.signIn".to_string()]
        );
        assert_eq!(tree.declared_keys(Section::Hero), vec!["headline".to_string()]);
        assert!(tree.declared_keys(Section::Faq).is_empty());
    }

    #[test]
    fn test_declared_keys_resolve() {
        let tree = sample_tree();
        for key in tree.declared_keys(Section::About) {
            assert!(tree.lookup(Section::About, &key).is_some(), "{} did not resolve", key);
        }
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_all_links_covers_every_group() {
        let document: LocaleDocument =
            serde_json::from_str(include_str!("../../locales/en.json")).unwrap();
        let links = document.config.all_links();
        let names: Vec<&str> = links.iter().map(|(name, _)| name.as_str()).collect();

        assert!(names.contains(&"links.signup"));
        assert!(names.contains(&"cta.primary"));
        assert!(names.contains(&"plans.pro"));
        assert!(names.contains(&"navigation.0"));
        assert!(names.contains(&"footer.company.about"));
    }
}
