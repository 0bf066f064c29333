//! Catalog metrics: bundle loads, fallback substitutions and missing keys.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by a catalog and the translators it hands out.
#[derive(Debug)]
pub struct CatalogMetrics {
    /// Number of bundles parsed successfully from their source
    bundle_loads: AtomicUsize,

    /// Number of languages that had to be served from the default bundle
    fallback_substitutions: AtomicUsize,

    /// Number of lookups that ended in the raw-key placeholder
    missing_translations: AtomicUsize,

    started_at: DateTime<Utc>,
}

impl CatalogMetrics {
    pub fn new() -> Self {
        Self {
            bundle_loads: AtomicUsize::new(0),
            fallback_substitutions: AtomicUsize::new(0),
            missing_translations: AtomicUsize::new(0),
            started_at: Utc::now(),
        }
    }

    pub fn record_bundle_load(&self) {
        self.bundle_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallback_substitutions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_missing_translation(&self) {
        self.missing_translations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bundle_loads(&self) -> usize {
        self.bundle_loads.load(Ordering::Relaxed)
    }

    pub fn fallback_substitutions(&self) -> usize {
        self.fallback_substitutions.load(Ordering::Relaxed)
    }

    pub fn missing_translations(&self) -> usize {
        self.missing_translations.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            bundle_loads: self.bundle_loads(),
            fallback_substitutions: self.fallback_substitutions(),
            missing_translations: self.missing_translations(),
            started_at: self.started_at,
        }
    }
}

impl Default for CatalogMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the catalog counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub bundle_loads: usize,
    pub fallback_substitutions: usize,
    pub missing_translations: usize,
    pub started_at: DateTime<Utc>,
}
