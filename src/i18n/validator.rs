//! Locale data validation.
//!
//! Checks that every configured link can be rewritten at request time and
//! that a translation bundle covers the keys of the reference (default)
//! bundle. Link problems are errors: the href resolver would silently fall
//! back to the dynamic base for them. Coverage gaps are warnings, since the
//! translator falls back to the default language.

use crate::i18n::{LocaleBundle, Section};
use crate::links::{classify_href, parse_web_url, HrefKind};

/// Validation report containing errors and warnings about a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that change runtime behaviour
    pub errors: Vec<String>,

    /// Non-critical gaps that are covered by a fallback
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for locale bundles.
pub struct LocaleValidator;

impl LocaleValidator {
    /// Validate `bundle`, comparing translation coverage against `reference`.
    ///
    /// Pass `None` as the reference when validating the default bundle.
    pub fn validate(bundle: &LocaleBundle, reference: Option<&LocaleBundle>) -> ValidationReport {
        let mut report = ValidationReport::new();

        let site = &bundle.config.site;
        if site.name.trim().is_empty() {
            report.warnings.push("site.name is empty".to_string());
        }
        if site.url.trim().is_empty() {
            report.warnings.push("site.url is empty".to_string());
        } else if let Err(problem) = Self::check_link(&site.url) {
            report.errors.push(format!("site.url: {}", problem));
        }

        for (name, href) in bundle.config.all_links() {
            if let Err(problem) = Self::check_link(href) {
                report.errors.push(format!("{}: {}", name, problem));
            }
        }

        if let Some(reference) = reference {
            for section in Section::ALL {
                for key in reference.translations.declared_keys(section) {
                    if bundle.translations.lookup(section, &key).is_none() {
                        report.warnings.push(format!(
                            "Translation missing: {}.{}",
                            section.as_str(),
                            key
                        ));
                    }
                }
            }
        }

        report
    }

    /// Check one configured link.
    ///
    /// Accepts internal paths, non-web URIs and web URLs that parse once a
    /// scheme is ensured and carry a host.
    pub fn check_link(href: &str) -> Result<(), String> {
        match classify_href(href) {
            HrefKind::Empty => Err("link is empty".to_string()),
            HrefKind::Internal | HrefKind::NonWeb => Ok(()),
            HrefKind::Web => {
                let url = parse_web_url(href)
                    .map_err(|e| format!("'{}' is not a valid URL ({})", href, e))?;
                match url.host_str() {
                    Some(host) if !host.is_empty() => Ok(()),
                    _ => Err(format!("'{}' has no host", href)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Language, LocaleCatalog, TranslationTree};
    use serde_json::json;

    fn english_bundle() -> LocaleBundle {
        let catalog = LocaleCatalog::embedded().expect("Embedded data should load");
        (*catalog.resolve(Language::ENGLISH)).clone()
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_new_report_is_clean() {
        let report = ValidationReport::default();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_report_with_warning_only() {
        let mut report = ValidationReport::new();
        report.warnings.push("gap".to_string());
        assert!(!report.is_clean());
        assert!(!report.has_errors());
    }

    // ==================== Link Checks ====================

    #[test]
    fn test_check_link_accepts_valid_links() {
        assert!(LocaleValidator::check_link("/about").is_ok());
        assert!(LocaleValidator::check_link("#pricing").is_ok());
        assert!(LocaleValidator::check_link("mailto:hi@example.com").is_ok());
        assert!(LocaleValidator::check_link("https://user.xrista.net/signup?plan=pro").is_ok());
        assert!(LocaleValidator::check_link("user.xrista.net").is_ok());
        assert!(LocaleValidator::check_link("HTTPS://user.xrista.net/login").is_ok());
    }

    #[test]
    fn test_check_link_rejects_malformed_links() {
        assert!(LocaleValidator::check_link("").is_err());
        assert!(LocaleValidator::check_link("https://exa mple.com").is_err());
        assert!(LocaleValidator::check_link("https://[oops/path").is_err());
        assert!(LocaleValidator::check_link("HTTPS://exa mple.com").is_err());
    }

    #[test]
    fn test_malformed_link_is_error() {
        let mut bundle = english_bundle();
        bundle.config.links.contact = "https://bad host/contact".to_string();
        bundle.config.cta.primary_button.link = String::new();

        let report = LocaleValidator::validate(&bundle, None);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().any(|e| e.starts_with("links.contact")));
        assert!(report.errors.iter().any(|e| e.starts_with("cta.primary")));
    }

    #[test]
    fn test_empty_site_name_is_warning() {
        let mut bundle = english_bundle();
        bundle.config.site.name = " ".to_string();

        let report = LocaleValidator::validate(&bundle, None);
        assert!(!report.has_errors());
        assert!(report.warnings.contains(&"site.name is empty".to_string()));
    }

    // ==================== Coverage Checks ====================

    #[test]
    fn test_default_bundle_is_clean() {
        let report = LocaleValidator::validate(&english_bundle(), None);
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_missing_translations_are_warnings() {
        let reference = english_bundle();
        let mut bundle = reference.clone();
        bundle.translations = TranslationTree::new(json!({
            "common": { "buttons": { "signIn": "登录" } },
            "pages": {}
        }));

        let report = LocaleValidator::validate(&bundle, Some(&reference));
        assert!(!report.has_errors());
        assert!(report
            .warnings
            .contains(&"Translation missing: common.buttons.getStarted".to_string()));
        assert!(!report
            .warnings
            .contains(&"Translation missing: common.buttons.signIn".to_string()));
    }

    #[test]
    fn test_chinese_bundle_gaps_are_reported() {
        let catalog = LocaleCatalog::embedded().unwrap();
        let report = LocaleValidator::validate(
            &catalog.resolve(Language::CHINESE),
            Some(&*catalog.default_bundle()),
        );
        assert!(report
            .warnings
            .contains(&"Translation missing: download.hero.version".to_string()));
    }
}
