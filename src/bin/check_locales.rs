//! Locale data lint - validates every language's data and exits non-zero on errors
//!
//! Usage:
//!   cargo run --bin check-locales                 # Check the compiled-in data
//!   cargo run --bin check-locales -- locales/     # Check <dir>/<code>.json files
//!
//! Checks:
//! - Every configured link is internal, non-web or a valid http(s) URL (error)
//! - Every language loads and parses (error)
//! - Translation keys present in the default language but missing elsewhere (warning)

use anyhow::{Context, Result};
use tracing::info;
use xrista_site::i18n::{
    load_bundle, DirectorySource, EmbeddedSource, Language, LocaleBundle, LocaleSource,
    LocaleValidator, ValidationReport,
};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xrista_site=info".parse()?),
        )
        .init();

    let source: Box<dyn LocaleSource> = match std::env::args().nth(1) {
        Some(dir) => Box::new(DirectorySource::new(dir)),
        None => Box::new(EmbeddedSource),
    };
    info!("Checking {}", source.describe());

    let default_language = Language::default_language();
    let default = load_bundle(source.as_ref(), default_language)
        .with_context(|| format!("Default language '{}' failed to load", default_language))?;

    let mut error_count = 0;
    let mut warning_count = 0;

    for language in Language::all() {
        let report = if language == default_language {
            LocaleValidator::validate(&default, None)
        } else {
            check_language(source.as_ref(), language, &default)
        };

        print_report(language, &report);
        error_count += report.errors.len();
        warning_count += report.warnings.len();
    }

    println!();
    println!("{} error(s), {} warning(s)", error_count, warning_count);

    if error_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn check_language(source: &dyn LocaleSource, language: Language, default: &LocaleBundle) -> ValidationReport {
    match load_bundle(source, language) {
        Ok(bundle) => LocaleValidator::validate(&bundle, Some(default)),
        Err(e) => {
            let mut report = ValidationReport::new();
            report.errors.push(e.to_string());
            report
        }
    }
}

fn print_report(language: Language, report: &ValidationReport) {
    let status = if report.is_clean() {
        "ok"
    } else if report.has_errors() {
        "FAILED"
    } else {
        "warnings"
    };
    println!("[{}] {} ({})", language, language.name(), status);

    for error in &report.errors {
        println!("  error: {}", error);
    }
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
}
