use crate::i18n::ConfigOverrides;
use crate::links::{DEFAULT_FALLBACK_URL, DEFAULT_SUBDOMAIN};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Read-only access to environment variables.
///
/// The server reads the real process environment; tests hand in a map.
pub trait EnvProvider {
    /// Fetch the value for `key`, if set.
    fn var(&self, key: &str) -> Option<String>;
}

/// Environment provider backed by the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvProvider for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Deployment environment, controls cookie hardening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn from_value(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    // Locale data
    pub locales_dir: Option<PathBuf>,

    // Dynamic links
    pub fallback_url: String,
    pub link_subdomain: String,
    pub trust_forwarded_host: bool,

    // Site configuration overrides
    pub overrides: ConfigOverrides,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_provider(&SystemEnv).context("Failed to read configuration from environment")
    }

    pub fn from_provider(env: &impl EnvProvider) -> Result<Self> {
        let non_empty = |key: &str| {
            env.var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            // Server
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: non_empty("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            environment: Environment::from_value(env.var("APP_ENV")),

            // Locale data
            locales_dir: non_empty("LOCALES_DIR").map(PathBuf::from),

            // Dynamic links
            fallback_url: non_empty("FALLBACK_URL")
                .unwrap_or_else(|| DEFAULT_FALLBACK_URL.to_string()),
            link_subdomain: non_empty("LINK_SUBDOMAIN")
                .unwrap_or_else(|| DEFAULT_SUBDOMAIN.to_string()),
            trust_forwarded_host: non_empty("TRUST_FORWARDED_HOST")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),

            overrides: ConfigOverrides::from_env(env),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: Environment::Development,
            locales_dir: None,
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
            link_subdomain: DEFAULT_SUBDOMAIN.to_string(),
            trust_forwarded_host: false,
            overrides: ConfigOverrides::default(),
        }
    }
}
