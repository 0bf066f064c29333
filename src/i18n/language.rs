//! Language type: a validated member of the supported language set.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// A validated language.
///
/// Values can only be obtained from the registry (or the constants below),
/// so holding a `Language` proves the tag is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };

    pub const CHINESE: Language = Language { code: "zh" };

    /// Create a Language from an exact language code.
    ///
    /// # Example
    /// ```ignore
    /// let chinese = Language::from_code("zh")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unsupported language code: '{}'", code),
        }
    }

    /// Match a language tag (or its primary subtag) case-insensitively.
    ///
    /// `zh-CN` and `ZH` both resolve to Chinese; `fr-FR` resolves to nothing.
    pub fn from_tag(tag: &str) -> Option<Language> {
        let registry = LanguageRegistry::get();
        let tag = tag.trim();
        registry
            .find_ignore_case(tag)
            .or_else(|| {
                let primary = tag.split('-').next().unwrap_or(tag);
                registry.find_ignore_case(primary)
            })
            .map(|config| Language { code: config.code })
    }

    /// The default language, used whenever nothing better is known.
    pub fn default_language() -> Language {
        Language {
            code: LanguageRegistry::get().default_language().code,
        }
    }

    /// All supported languages, default first.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .list_all()
            .into_iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Never in practice: a `Language` is only built from registry entries.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn og_locale(&self) -> &'static str {
        self.config().og_locale
    }

    pub fn is_default(&self) -> bool {
        self.config().is_default
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::default_language()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}
