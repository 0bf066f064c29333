//! HTTP surface: page contexts, locale listing and health.

use crate::config::Config;
use crate::domain::host_from_headers;
use crate::i18n::{Language, LocaleCatalog, MetricsReport};
use crate::negotiate::negotiate_locale;
use crate::page::{Page, PageContext};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<LocaleCatalog>,
}

impl AppState {
    pub fn new(config: Config, catalog: LocaleCatalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unsupported language '{0}'")]
    UnknownLanguage(String),

    #[error("no page at '{0}'")]
    UnknownPage(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        debug!("{}", self);
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::NOT_FOUND, body).into_response()
    }
}

/// Build the application router with negotiation and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/locales", get(list_locales))
        .route("/:locale", get(render_page))
        .route("/:locale/*page", get(render_page))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), negotiate_locale))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Only reached when negotiation did not redirect first.
async fn root() -> Redirect {
    Redirect::temporary(&format!("/{}", Language::default_language()))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::UnknownPage(uri.path().to_string())
}

async fn render_page(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<PageContext>, AppError> {
    let code = params.get("locale").map(String::as_str).unwrap_or_default();
    let language =
        Language::from_code(code).map_err(|_| AppError::UnknownLanguage(code.to_string()))?;

    let slug = params.get("page").map(String::as_str).unwrap_or_default();
    let page = Page::from_slug(slug).ok_or_else(|| AppError::UnknownPage(slug.to_string()))?;

    let host = host_from_headers(&headers, state.config.trust_forwarded_host);
    Ok(Json(PageContext::build(
        &state.catalog,
        &state.config,
        language,
        page,
        host,
    )))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleSummary {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
    pub is_default: bool,
}

async fn list_locales() -> Json<Vec<LocaleSummary>> {
    Json(
        Language::all()
            .into_iter()
            .map(|language| LocaleSummary {
                code: language.code(),
                name: language.name(),
                native_name: language.native_name(),
                is_default: language.is_default(),
            })
            .collect(),
    )
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub languages: Vec<Language>,
    pub metrics: MetricsReport,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        languages: Language::all(),
        metrics: state.catalog.metrics().report(),
    })
}
