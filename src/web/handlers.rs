//! HTTP request handlers

use super::state::AppState;
use crate::bar::{resolve as resolve_bar, Device, Visibility};
use crate::config::{ConfigData, SettingsMessage};
use crate::engines::builtin;
use crate::error::ConfigError;
use crate::userscript;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tera::Context;
use tracing::{debug, error};
use url::Url;

/// Query parameters for resolving a results page
#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    /// URL of the results page
    pub url: String,
    /// Treat the client as a touch device; guessed from the User-Agent when absent
    pub mobile: Option<bool>,
    /// Client prefers a dark color scheme
    #[serde(default)]
    pub dark: bool,
}

impl ResolveParams {
    fn device(&self, headers: &HeaderMap) -> Device {
        let guessed = headers
            .get(header::USER_AGENT)
            .and_then(|ua| ua.to_str().ok())
            .map(Device::from_user_agent)
            .unwrap_or_default();
        Device {
            touch: self.mobile.unwrap_or(guessed.touch),
            dark_mode: self.dark,
        }
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

fn config_error(e: ConfigError) -> Response {
    match e {
        ConfigError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
        _ => bad_request(e.to_string()),
    }
}

/// Settings page handler
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config.load_configuration();

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("version", crate::VERSION);
    ctx.insert("engines", &config.engines);
    ctx.insert("custom", &state.config.has_custom_configuration());
    ctx.insert("builtins", &builtin::available());

    match state.templates.render_with_context("settings.html", &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Current engine configuration
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigData> {
    Json(state.config.load_configuration())
}

/// Apply a message from the settings page.
///
/// Malformed bodies are answered with `400 {"error": ...}`, the same as invalid engines.
pub async fn post_config(State(state): State<AppState>, body: Bytes) -> Response {
    let message = match serde_json::from_slice::<SettingsMessage>(&body) {
        Ok(message) => message,
        Err(e) => return config_error(ConfigError::from(e)),
    };
    match state.config.apply(message) {
        Ok(config) => Json(config).into_response(),
        Err(e) => config_error(e),
    }
}

/// Resolve a results page to its bar, as JSON; `null` when no bar applies
pub async fn resolve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ResolveParams>,
) -> Response {
    let url = match Url::parse(&params.url) {
        Ok(url) => url,
        Err(e) => return bad_request(format!("invalid url: {}", e)),
    };

    let config = state.config.load_configuration();
    let resolution = resolve_bar(
        &config.engines,
        &url,
        params.device(&headers),
        &state.settings.ui,
    );
    debug!("Resolved {}: {:?}", url, resolution.as_ref().map(|r| &r.engine));
    Json(resolution).into_response()
}

/// Bar markup for a results page; 204 when no bar applies
pub async fn bar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ResolveParams>,
) -> Response {
    let url = match Url::parse(&params.url) {
        Ok(url) => url,
        Err(e) => return bad_request(format!("invalid url: {}", e)),
    };

    let config = state.config.load_configuration();
    let device = params.device(&headers);
    let Some(resolution) = resolve_bar(&config.engines, &url, device, &state.settings.ui) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let mut ctx = Context::new();
    ctx.insert("resolution", &resolution);
    ctx.insert("device", &device);
    ctx.insert("offset", &Visibility::Shown.bottom_offset(&state.settings.ui));
    ctx.insert("ui", &state.settings.ui);

    match state.templates.render_with_context("bar.html", &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Userscript metadata block for the current configuration
pub async fn userscript(State(state): State<AppState>) -> Response {
    let config = state.config.load_configuration();
    match userscript::header(&config.engines) {
        Ok(script_header) => (
            [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
            script_header,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to render userscript header: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
