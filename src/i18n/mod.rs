//! Internationalization (i18n) module: languages, locale bundles and lookup.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported languages and their data
//! - `language`: Validated `Language` type; only supported tags can exist
//! - `bundle`: Site configuration and translation tree for one language
//! - `catalog`: Load-once cache of bundles with default-language fallback
//! - `overlay`: Environment overrides applied on top of a bundle's config
//! - `validator`: Link and translation coverage checks for locale data
//! - `metrics`: Catalog counters reported by the health endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use xrista_site::i18n::{Language, LocaleCatalog, Section};
//!
//! let catalog = LocaleCatalog::embedded()?;
//! let t = catalog.translator(Language::CHINESE);
//! assert_eq!(t.t(Section::Common, "buttons.signIn"), "登录");
//! ```

mod bundle;
mod catalog;
mod language;
mod metrics;
mod overlay;
mod registry;
mod validator;

pub use bundle::{
    AnalyticsConfig, CtaButton, CtaConfig, FooterConfig, LocaleBundle, NavigationItem,
    PricingConfig, PricingPlan, Section, SiteConfig, SiteIdentity, SiteLinks, TranslationTree,
};
pub use catalog::{
    load_bundle, CatalogError, DirectorySource, EmbeddedSource, LocaleCatalog, LocaleSource,
    Translator,
};
pub use language::Language;
pub use metrics::{CatalogMetrics, MetricsReport};
pub use overlay::{apply_overrides, ConfigOverrides};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use validator::{LocaleValidator, ValidationReport};
