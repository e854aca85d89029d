//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // The bar is fetched from arbitrary results pages
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(handlers::index))
        .route("/bar", get(handlers::bar))
        .route("/metasearch.user.js", get(handlers::userscript))
        // API routes
        .route(
            "/api/config",
            get(handlers::get_config).post(handlers::post_config),
        )
        .route("/api/resolve", get(handlers::resolve))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryStore, Settings};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::with_store(Settings::default(), Arc::new(MemoryStore::new())).unwrap();
        create_router(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(app: Router, uri: &str, json: &str) -> (StatusCode, String) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap();
        send(app, request).await
    }

    const GOOGLE_CATS: &str = "https%3A%2F%2Fwww.google.com%2Fsearch%3Fq%3Dcats";

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_resolve() {
        let (status, body) = get(app(), &format!("/api/resolve?url={}", GOOGLE_CATS)).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["engine"], "Google");
        assert_eq!(json["query"], "cats");
        assert_eq!(json["links"][0]["title"], "DuckDuckGo");
        assert_eq!(json["links"][0]["href"], "https://duckduckgo.com/?q=cats");
    }

    #[tokio::test]
    async fn test_resolve_unknown_page_is_null() {
        let (status, body) = get(app(), "/api/resolve?url=https%3A%2F%2Fexample.com%2F").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "null");
    }

    #[tokio::test]
    async fn test_resolve_rejects_bad_url() {
        let (status, _) = get(app(), "/api/resolve?url=not-a-url").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bar_fragment() {
        let (status, body) = get(app(), &format!("/bar?url={}&dark=true", GOOGLE_CATS)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Search Bing for cats"));
        assert!(body.contains("metasearch-close"));
        // Wikipedia's black icon is lightened for dark mode
        assert!(body.contains("#fcfcfa"));
        // The inline script reads its behaviour from the UI settings
        assert!(body.contains(r#"data-hidden-offset="-48""#));
        assert!(body.contains(r#"data-dismissed-offset="-40""#));
        assert!(body.contains(r#"data-throttle-ms="100""#));
        assert!(body.contains("addEventListener('wheel'"));

        let (status, _) = get(app(), "/bar?url=https%3A%2F%2Fexample.com%2F").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_save_and_reset_configuration() {
        let app = app();
        let save = r##"{"type": "saveConfiguration", "engines": [
            {"title": "Kagi", "url": "https://kagi.com/search?q=%s", "color": "#FFB319"},
            {"title": "Bing", "url": "https://www.bing.com/search?q=%s", "color": "#008373"}
        ]}"##;
        let (status, _) = post_json(app.clone(), "/api/config", save).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = get(app.clone(), "/api/config").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["engines"].as_array().unwrap().len(), 2);

        let (_, body) = get(app.clone(), &format!("/api/resolve?url={}", GOOGLE_CATS)).await;
        assert_eq!(body, "null");

        let (status, _) = post_json(app.clone(), "/api/config", r#"{"type": "resetConfiguration"}"#).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = get(app, &format!("/api/resolve?url={}", GOOGLE_CATS)).await;
        assert!(body.contains("\"engine\":\"Google\""));
    }

    #[tokio::test]
    async fn test_invalid_configuration_is_rejected() {
        let app = app();
        let save = r##"{"type": "saveConfiguration", "engines": [
            {"title": "Broken", "url": "https://broken.test/", "color": "#000000"}
        ]}"##;
        let (status, body) = post_json(app.clone(), "/api/config", save).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Broken"));

        let (_, body) = get(app, "/api/config").await;
        assert!(body.contains("DuckDuckGo"));
    }

    #[tokio::test]
    async fn test_malformed_engine_is_a_json_error() {
        let save = r##"{"type": "saveConfiguration", "engines": [
            {"title": "Kagi", "url": "https://kagi.com/search?q=%s", "color": "zzz"}
        ]}"##;
        let (status, body) = post_json(app(), "/api/config", save).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("invalid hex color"));

        let (status, body) = post_json(app(), "/api/config", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(serde_json::from_str::<serde_json::Value>(&body).unwrap()["error"].is_string());
    }

    #[tokio::test]
    async fn test_settings_page() {
        let (status, body) = get(app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("MetaSearch Settings"));
        assert!(body.contains("Using the built-in engine list."));
        assert!(body.contains("google_web"));

        assert!(body.contains(r#"id="engine-form""#));
        assert!(body.contains("Add engine"));
        assert!(body.contains(r#"name="weight""#));
        assert!(body.contains("saveConfiguration"));
        // The JSON view is seeded with the active list
        assert!(body.contains("&quot;title&quot;: &quot;DuckDuckGo&quot;"));
    }

    #[tokio::test]
    async fn test_userscript_header() {
        let (status, body) = get(app(), "/metasearch.user.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("// ==UserScript=="));
        assert!(body.contains("*://*.bing.com/search*"));
    }
}
