//! Language registry: single source of truth for all supported languages.
//!
//! The registry is a static, closed table. Each entry carries its display
//! metadata and the locale data compiled into the binary, so mapping a
//! language to its data can never hit an unknown key at runtime.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Language tag used in URLs and cookies (e.g., "en", "zh")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Chinese")
    pub name: &'static str,

    /// Native name shown in the language switcher (e.g., "English", "中文")
    pub native_name: &'static str,

    /// OpenGraph locale for page metadata (e.g., "en_US")
    pub og_locale: &'static str,

    /// Whether this is the default language (exactly one must be true)
    pub is_default: bool,

    /// Compiled-in `{config, translations}` document for this language
    pub embedded_data: &'static str,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its exact code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get a language configuration by code, ignoring ASCII case.
    ///
    /// Used for `Accept-Language` tags, which are case-insensitive.
    pub fn find_ignore_case(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(code))
    }

    /// All supported languages, default first.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        let mut all: Vec<_> = self.languages.iter().collect();
        all.sort_by_key(|lang| !lang.is_default);
        all
    }

    /// The default language configuration.
    ///
    /// # Panics
    /// Panics if the static table is empty, which is a build defect.
    pub fn default_language(&self) -> &LanguageConfig {
        self.languages
            .iter()
            .find(|lang| lang.is_default)
            .or_else(|| self.languages.first())
            .expect("language registry is never empty")
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            og_locale: "en_US",
            is_default: true,
            embedded_data: include_str!("../../locales/en.json"),
        },
        LanguageConfig {
            code: "zh",
            name: "Chinese",
            native_name: "中文",
            og_locale: "zh_CN",
            is_default: false,
            embedded_data: include_str!("../../locales/zh.json"),
        },
    ]
}
