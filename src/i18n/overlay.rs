//! Environment overrides layered onto a bundle's base configuration.

use crate::config::EnvProvider;
use crate::i18n::SiteConfig;
use tracing::debug;

pub const SITE_NAME_ENV: &str = "SITE_NAME";
pub const SITE_URL_ENV: &str = "SITE_URL";
pub const SITE_DESCRIPTION_ENV: &str = "SITE_DESCRIPTION";
pub const DOWNLOAD_URL_ENV: &str = "DOWNLOAD_URL";
pub const DEMO_URL_ENV: &str = "DEMO_URL";
pub const LOGIN_URL_ENV: &str = "LOGIN_URL";
pub const SIGNUP_URL_ENV: &str = "SIGNUP_URL";
pub const ANALYTICS_ENABLED_ENV: &str = "ANALYTICS_ENABLED";

/// Snapshot of the override variables that were present and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub site_name: Option<String>,
    pub site_url: Option<String>,
    pub site_description: Option<String>,
    pub download_url: Option<String>,
    pub demo_url: Option<String>,
    pub login_url: Option<String>,
    pub signup_url: Option<String>,
    pub analytics_enabled: Option<bool>,
}

impl ConfigOverrides {
    pub fn from_env(env: &impl EnvProvider) -> Self {
        let read = |key: &str| {
            env.var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            site_name: read(SITE_NAME_ENV),
            site_url: read(SITE_URL_ENV),
            site_description: read(SITE_DESCRIPTION_ENV),
            download_url: read(DOWNLOAD_URL_ENV),
            demo_url: read(DEMO_URL_ENV),
            login_url: read(LOGIN_URL_ENV),
            signup_url: read(SIGNUP_URL_ENV),
            analytics_enabled: read(ANALYTICS_ENABLED_ENV).and_then(|v| parse_flag(&v)),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produce a new configuration with the overrides applied.
    pub fn apply(&self, base: &SiteConfig) -> SiteConfig {
        let mut config = base.clone();

        let replace = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                target.clone_from(value);
            }
        };

        replace(&mut config.site.name, &self.site_name);
        replace(&mut config.site.url, &self.site_url);
        replace(&mut config.site.description, &self.site_description);
        replace(&mut config.links.download, &self.download_url);
        replace(&mut config.links.demo, &self.demo_url);
        replace(&mut config.links.login, &self.login_url);
        replace(&mut config.links.signup, &self.signup_url);

        if let Some(enabled) = self.analytics_enabled {
            config.analytics.enabled = enabled;
        }

        config
    }
}

/// Read overrides from `env` and apply them to `base` in one step.
pub fn apply_overrides(base: &SiteConfig, env: &impl EnvProvider) -> SiteConfig {
    ConfigOverrides::from_env(env).apply(base)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        other => {
            debug!("Ignoring unrecognised {} value: {}", ANALYTICS_ENABLED_ENV, other);
            None
        }
    }
}
