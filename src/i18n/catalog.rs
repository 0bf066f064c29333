//! Load-once catalog of locale bundles.
//!
//! Bundles are read from a [`LocaleSource`] the first time a language is
//! requested and cached for the lifetime of the catalog. A language whose
//! data is missing or broken is served from the default language's bundle;
//! only a broken default is an error, and it surfaces at construction.

use crate::config::Config;
use crate::i18n::bundle::LocaleDocument;
use crate::i18n::{CatalogMetrics, Language, LocaleBundle, LocaleValidator, Section};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no locale data for '{language}' at {}", .path.display())]
    Missing { language: Language, path: PathBuf },

    #[error("failed to read locale data for '{language}' from {}: {source}", .path.display())]
    Io {
        language: Language,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locale data for '{language}': {source}")]
    Parse {
        language: Language,
        #[source]
        source: serde_json::Error,
    },

    #[error("default language '{language}' could not be loaded: {source}")]
    DefaultUnavailable {
        language: Language,
        #[source]
        source: Box<CatalogError>,
    },
}

/// Backing store for raw locale documents.
pub trait LocaleSource: Send + Sync {
    /// Read the raw `{config, translations}` JSON for `language`.
    fn read(&self, language: Language) -> Result<Cow<'static, str>, CatalogError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Locale data compiled into the binary via the language registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedSource;

impl LocaleSource for EmbeddedSource {
    fn read(&self, language: Language) -> Result<Cow<'static, str>, CatalogError> {
        Ok(Cow::Borrowed(language.config().embedded_data))
    }

    fn describe(&self) -> String {
        "embedded locale data".to_string()
    }
}

/// Locale data read from `<dir>/<code>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, language: Language) -> PathBuf {
        self.dir.join(format!("{}.json", language.code()))
    }
}

impl LocaleSource for DirectorySource {
    fn read(&self, language: Language) -> Result<Cow<'static, str>, CatalogError> {
        let path = self.path_for(language);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Cow::Owned(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CatalogError::Missing { language, path })
            }
            Err(source) => Err(CatalogError::Io {
                language,
                path,
                source,
            }),
        }
    }

    fn describe(&self) -> String {
        format!("locale directory {}", self.dir.display())
    }
}

/// Parse one bundle from a source.
pub fn load_bundle(source: &dyn LocaleSource, language: Language) -> Result<LocaleBundle, CatalogError> {
    let raw = source.read(language)?;
    let document: LocaleDocument = serde_json::from_str(&raw)
        .map_err(|source| CatalogError::Parse { language, source })?;

    Ok(LocaleBundle {
        language,
        config: document.config,
        translations: document.translations,
    })
}

/// Process-wide cache of locale bundles, keyed by language.
pub struct LocaleCatalog {
    source: Box<dyn LocaleSource>,
    default: Arc<LocaleBundle>,
    slots: HashMap<Language, OnceLock<Arc<LocaleBundle>>>,
    metrics: Arc<CatalogMetrics>,
}

impl LocaleCatalog {
    /// Build a catalog, eagerly loading the default language.
    pub fn new(source: impl LocaleSource + 'static) -> Result<Self, CatalogError> {
        let metrics = Arc::new(CatalogMetrics::new());
        let default_language = Language::default_language();

        let default = load_bundle(&source, default_language).map_err(|e| {
            error!("Default locale data failed to load from {}: {}", source.describe(), e);
            CatalogError::DefaultUnavailable {
                language: default_language,
                source: Box::new(e),
            }
        })?;
        metrics.record_bundle_load();
        log_validation(&default, None);
        let default = Arc::new(default);

        let slots = Language::all()
            .into_iter()
            .map(|language| {
                let slot = OnceLock::new();
                if language == default_language {
                    let _ = slot.set(Arc::clone(&default));
                }
                (language, slot)
            })
            .collect();

        info!("Locale catalog ready ({})", source.describe());

        Ok(Self {
            source: Box::new(source),
            default,
            slots,
            metrics,
        })
    }

    /// Catalog backed by the compiled-in locale data.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::new(EmbeddedSource)
    }

    /// Catalog backed by `<dir>/<code>.json` files.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::new(DirectorySource::new(dir.as_ref()))
    }

    /// Catalog selected by `LOCALES_DIR`.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        match &config.locales_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    /// Resolve a language to its bundle, loading it on first use.
    ///
    /// Never fails: unavailable data resolves to the default bundle.
    pub fn resolve(&self, language: Language) -> Arc<LocaleBundle> {
        match self.slots.get(&language) {
            Some(slot) => Arc::clone(slot.get_or_init(|| self.load_or_fallback(language))),
            None => Arc::clone(&self.default),
        }
    }

    pub fn default_bundle(&self) -> Arc<LocaleBundle> {
        Arc::clone(&self.default)
    }

    /// Translation lookup for `language`, falling back to the default.
    pub fn translator(&self, language: Language) -> Translator {
        Translator {
            language,
            bundle: self.resolve(language),
            fallback: self.default_bundle(),
            metrics: Arc::clone(&self.metrics),
        }
    }

    pub fn metrics(&self) -> &CatalogMetrics {
        &self.metrics
    }

    fn load_or_fallback(&self, language: Language) -> Arc<LocaleBundle> {
        match load_bundle(self.source.as_ref(), language) {
            Ok(bundle) => {
                self.metrics.record_bundle_load();
                log_validation(&bundle, Some(&*self.default));
                info!("Loaded locale data for '{}'", language);
                Arc::new(bundle)
            }
            Err(e) => {
                warn!(
                    "Locale data not available for '{}', falling back to '{}': {}",
                    language, self.default.language, e
                );
                self.metrics.record_fallback();
                Arc::clone(&self.default)
            }
        }
    }
}

fn log_validation(bundle: &LocaleBundle, reference: Option<&LocaleBundle>) {
    let report = LocaleValidator::validate(bundle, reference);
    for problem in &report.errors {
        warn!("Locale '{}' configuration error: {}", bundle.language, problem);
    }
    for problem in &report.warnings {
        debug!("Locale '{}': {}", bundle.language, problem);
    }
}

/// Translation lookup bound to one language.
#[derive(Clone)]
pub struct Translator {
    language: Language,
    bundle: Arc<LocaleBundle>,
    fallback: Arc<LocaleBundle>,
    metrics: Arc<CatalogMetrics>,
}

impl Translator {
    pub fn language(&self) -> Language {
        self.language
    }

    /// Translate `key` within `section`.
    ///
    /// Missing keys fall back to the default language, then to the raw key.
    pub fn t(&self, section: Section, key: &str) -> String {
        if let Some(value) = self.bundle.translations.lookup(section, key) {
            return value.to_string();
        }

        if !Arc::ptr_eq(&self.bundle, &self.fallback) {
            if let Some(value) = self.fallback.translations.lookup(section, key) {
                debug!(
                    "Translation {}.{} missing for '{}', using '{}'",
                    section.as_str(),
                    key,
                    self.language,
                    self.fallback.language
                );
                return value.to_string();
            }
        }

        warn!("Translation missing: {}.{}", section.as_str(), key);
        self.metrics.record_missing_translation();
        key.to_string()
    }

    /// A whole section with default-language entries filling the gaps.
    pub fn section(&self, section: Section) -> Option<Value> {
        let primary = self.bundle.translations.section(section);
        let fallback = if Arc::ptr_eq(&self.bundle, &self.fallback) {
            None
        } else {
            self.fallback.translations.section(section)
        };

        match (fallback, primary) {
            (Some(base), Some(overlay)) => Some(merge_values(base, overlay)),
            (None, Some(value)) | (Some(value), None) => Some(value.clone()),
            (None, None) => None,
        }
    }
}

/// Deep-merge `overlay` onto `base`; objects merge key by key, anything
/// else in `overlay` replaces the base value.
fn merge_values(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let next = match base_map.get(key) {
                    Some(existing) => merge_values(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, other) => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Source that serves embedded data but fails for selected languages.
    struct FlakySource {
        failing: Vec<Language>,
        reads: AtomicUsize,
    }

    impl FlakySource {
        fn failing(failing: Vec<Language>) -> Self {
            Self {
                failing,
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl LocaleSource for FlakySource {
        fn read(&self, language: Language) -> Result<Cow<'static, str>, CatalogError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&language) {
                return Err(CatalogError::Missing {
                    language,
                    path: PathBuf::from(format!("{}.json", language)),
                });
            }
            EmbeddedSource.read(language)
        }

        fn describe(&self) -> String {
            "flaky test source".to_string()
        }
    }

    impl LocaleSource for Arc<FlakySource> {
        fn read(&self, language: Language) -> Result<Cow<'static, str>, CatalogError> {
            self.as_ref().read(language)
        }

        fn describe(&self) -> String {
            self.as_ref().describe()
        }
    }

    // ==================== Embedded Data ====================

    #[test]
    fn test_embedded_catalog_resolves_every_language() {
        let catalog = LocaleCatalog::embedded().expect("Embedded data should load");
        for language in Language::all() {
            let bundle = catalog.resolve(language);
            assert_eq!(bundle.language, language);
        }
    }

    #[test]
    fn test_common_section_complete_in_every_language() {
        let catalog = LocaleCatalog::embedded().unwrap();
        let declared = catalog
            .default_bundle()
            .translations
            .declared_keys(Section::Common);
        assert!(!declared.is_empty());

        for language in Language::all() {
            let bundle = catalog.resolve(language);
            for key in &declared {
                assert!(
                    bundle.translations.lookup(Section::Common, key).is_some(),
                    "{} is missing common.{}",
                    language,
                    key
                );
            }
        }
    }

    #[test]
    fn test_embedded_data_has_no_link_errors() {
        let catalog = LocaleCatalog::embedded().unwrap();
        let default = catalog.default_bundle();
        for language in Language::all() {
            let report = LocaleValidator::validate(&catalog.resolve(language), Some(&*default));
            assert!(!report.has_errors(), "{}: {:?}", language, report.errors);
        }
    }

    // ==================== Memoization ====================

    #[test]
    fn test_resolve_is_memoized() {
        let source = Arc::new(FlakySource::failing(vec![]));
        let catalog = LocaleCatalog::new(Arc::clone(&source)).unwrap();
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);

        let first = catalog.resolve(Language::CHINESE);
        let second = catalog.resolve(Language::CHINESE);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.reads.load(Ordering::SeqCst), 2);
        assert_eq!(catalog.metrics().bundle_loads(), 2);
    }

    #[test]
    fn test_default_is_not_reloaded() {
        let source = Arc::new(FlakySource::failing(vec![]));
        let catalog = LocaleCatalog::new(Arc::clone(&source)).unwrap();

        let bundle = catalog.resolve(Language::ENGLISH);
        assert!(Arc::ptr_eq(&bundle, &catalog.default_bundle()));
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_resolution_loads_once() {
        let source = Arc::new(FlakySource::failing(vec![]));
        let catalog = LocaleCatalog::new(Arc::clone(&source)).unwrap();

        let bundles: Vec<Arc<LocaleBundle>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| catalog.resolve(Language::CHINESE)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for bundle in &bundles {
            assert!(Arc::ptr_eq(bundle, &bundles[0]));
        }
        assert_eq!(source.reads.load(Ordering::SeqCst), 2);
    }

    // ==================== Fallback ====================

    #[test]
    fn test_failing_language_falls_back_to_default() {
        let source = Arc::new(FlakySource::failing(vec![Language::CHINESE]));
        let catalog = LocaleCatalog::new(Arc::clone(&source)).unwrap();

        let bundle = catalog.resolve(Language::CHINESE);
        assert!(Arc::ptr_eq(&bundle, &catalog.default_bundle()));
        assert_eq!(bundle.language, Language::ENGLISH);
        assert_eq!(catalog.metrics().fallback_substitutions(), 1);

        // The substitution is cached as well
        let _ = catalog.resolve(Language::CHINESE);
        assert_eq!(catalog.metrics().fallback_substitutions(), 1);
        assert_eq!(source.reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failing_default_is_fatal() {
        let result = LocaleCatalog::new(FlakySource::failing(vec![Language::ENGLISH]));
        match result {
            Err(CatalogError::DefaultUnavailable { language, source }) => {
                assert_eq!(language, Language::ENGLISH);
                assert!(matches!(*source, CatalogError::Missing { .. }));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("catalog should not build without default data"),
        }
    }

    // ==================== Directory Source ====================

    fn write_locale(dir: &TempDir, code: &str, contents: &str) {
        std::fs::write(dir.path().join(format!("{}.json", code)), contents)
            .expect("Failed to write locale file");
    }

    #[test]
    fn test_directory_source_loads_files() {
        let dir = TempDir::new().unwrap();
        write_locale(&dir, "en", Language::ENGLISH.config().embedded_data);
        write_locale(&dir, "zh", Language::CHINESE.config().embedded_data);

        let catalog = LocaleCatalog::from_dir(dir.path()).unwrap();
        assert_eq!(catalog.resolve(Language::CHINESE).language, Language::CHINESE);
        assert_eq!(catalog.metrics().fallback_substitutions(), 0);
    }

    #[test]
    fn test_directory_source_invalid_json_falls_back() {
        let dir = TempDir::new().unwrap();
        write_locale(&dir, "en", Language::ENGLISH.config().embedded_data);
        write_locale(&dir, "zh", "{ not json");

        let catalog = LocaleCatalog::from_dir(dir.path()).unwrap();
        assert_eq!(catalog.resolve(Language::CHINESE).language, Language::ENGLISH);
        assert_eq!(catalog.metrics().fallback_substitutions(), 1);
    }

    #[test]
    fn test_directory_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = DirectorySource::new(dir.path());

        let err = source.read(Language::CHINESE).unwrap_err();
        assert!(matches!(err, CatalogError::Missing { .. }));
        assert!(err.to_string().contains("zh.json"));
    }

    #[test]
    fn test_directory_without_default_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_locale(&dir, "zh", Language::CHINESE.config().embedded_data);

        let err = LocaleCatalog::from_dir(dir.path()).err().expect("Should fail");
        assert!(err.to_string().contains("default language 'en'"));
    }

    // ==================== Translator ====================

    #[test]
    fn test_translator_returns_language_text() {
        let catalog = LocaleCatalog::embedded().unwrap();
        let en = catalog.translator(Language::ENGLISH);
        let zh = catalog.translator(Language::CHINESE);

        assert_eq!(en.t(Section::Common, "buttons.signIn"), "Sign In");
        assert_eq!(zh.t(Section::Common, "buttons.signIn"), "登录");
        assert_eq!(zh.language(), Language::CHINESE);
    }

    #[test]
    fn test_translator_falls_back_to_default_language() {
        let catalog = LocaleCatalog::embedded().unwrap();
        let zh = catalog.translator(Language::CHINESE);

        // Present only in the English data
        assert_eq!(zh.t(Section::Download, "hero.version"), "Version 2.4.1");
        assert_eq!(catalog.metrics().missing_translations(), 0);
    }

    #[test]
    fn test_translator_missing_key_returns_key() {
        let catalog = LocaleCatalog::embedded().unwrap();
        let en = catalog.translator(Language::ENGLISH);

        assert_eq!(en.t(Section::Hero, "does.not.exist"), "does.not.exist");
        assert_eq!(catalog.metrics().missing_translations(), 1);
    }

    #[test]
    fn test_translator_section_fills_gaps_from_default() {
        let catalog = LocaleCatalog::embedded().unwrap();
        let zh = catalog.translator(Language::CHINESE);

        let download = zh.section(Section::Download).expect("Section should exist");
        assert_eq!(download["hero"]["version"], "Version 2.4.1");
        assert_eq!(download["hero"]["title"], "下载应用");
    }

    // ==================== Merge ====================

    #[test]
    fn test_merge_values_prefers_overlay() {
        let base = json!({"a": "1", "nested": {"x": "base", "y": "base"}, "list": ["a"]});
        let overlay = json!({"nested": {"x": "over"}, "list": ["b", "c"]});

        let merged = merge_values(&base, &overlay);
        assert_eq!(
            merged,
            json!({"a": "1", "nested": {"x": "over", "y": "base"}, "list": ["b", "c"]})
        );
    }
}
