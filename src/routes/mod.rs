pub mod api;
pub mod catalog;
pub mod theme;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Builds the application routes (layers are added by the caller)
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(catalog::index))
        .route("/addons/:key", get(catalog::addon_details))
        .route("/reload", post(catalog::reload))
        .route("/theme", post(theme::toggle_theme))
        .route("/api/addons", get(api::list_addons))
        .route("/api/status", get(api::status))
        .route("/api/reload", post(api::reload))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{CatalogLoader, CatalogSource};
    use crate::normalizer::normalize;
    use crate::state::UiConfig;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::time::Duration;
    use tower::ServiceExt;

    /// State whose source points nowhere, preloaded with `catalog`
    async fn state_with(catalog: Value) -> AppState {
        let loader = CatalogLoader::new(Duration::from_secs(1)).unwrap();
        let source = CatalogSource::Local(PathBuf::from("/nonexistent/addons.json"));
        let state = AppState::new(loader, source, UiConfig::default());

        let ticket = state.catalog.begin().await;
        state
            .catalog
            .finish(ticket, Ok(normalize(catalog).unwrap()))
            .await
            .unwrap();

        state
    }

    async fn test_state() -> AppState {
        state_with(json!([
            { "name": "Foo Blaster", "type": "free", "file": "foo.zip" },
            { "name": "Bar Tool", "type": "paid", "id": "bar" },
        ]))
        .await
    }

    /// Targets of the cards' "Details" links, in grid order
    fn details_links(html: &str) -> Vec<String> {
        html.split(r#"href="/addons/"#)
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(|key| format!("/addons/{}", key))
            .collect()
    }

    async fn send(state: AppState, request: Request<Body>) -> Response {
        router(state).oneshot(request).await.unwrap()
    }

    async fn get_path(state: AppState, uri: &str) -> Response {
        send(state, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_api_addons_filters_by_query_and_type() {
        let state = test_state().await;

        let response = get_path(state.clone(), "/api/addons?q=foo").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "loaded");
        assert_eq!(body["total"], 2);
        assert_eq!(body["count"], 1);
        assert_eq!(body["addons"][0]["name"], "Foo Blaster");

        let body = body_json(get_path(state, "/api/addons?type=paid").await).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["addons"][0]["name"], "Bar Tool");
        assert_eq!(body["addons"][0]["type"], "paid");
    }

    #[tokio::test]
    async fn test_api_addons_rejects_unknown_type() {
        let response = get_path(test_state().await, "/api/addons?type=bogus").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failed_reload_reports_error_and_keeps_catalog() {
        let state = test_state().await;

        let response = send(
            state.clone(),
            Request::post("/api/reload").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("addons.json"));

        let status = body_json(get_path(state.clone(), "/api/status").await).await;
        assert_eq!(status["status"], "failed");
        assert_eq!(status["total"], 2);

        let html = body_text(get_path(state, "/").await).await;
        assert!(html.contains(crate::render::LOAD_ERROR_MESSAGE));
        assert!(html.contains("Foo Blaster"));
    }

    #[tokio::test]
    async fn test_successful_reload_replaces_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"[{"name": "Fresh"}]"#).unwrap();

        let loader = CatalogLoader::new(Duration::from_secs(1)).unwrap();
        let source = CatalogSource::Local(file.path().to_path_buf());
        let state = AppState::new(loader, source, UiConfig::default());

        let response = send(
            state.clone(),
            Request::post("/api/reload").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "outcome": "applied", "count": 1 })
        );

        let body = body_json(get_path(state, "/api/addons").await).await;
        assert_eq!(body["addons"][0]["name"], "Fresh");
    }

    #[tokio::test]
    async fn test_index_renders_filtered_grid() {
        let response = get_path(test_state().await, "/?q=bar&type=all").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Bar Tool"));
        assert!(!html.contains("Foo Blaster"));
        assert!(html.contains(r#"value="bar""#));
    }

    #[tokio::test]
    async fn test_details_page_and_not_found() {
        let state = test_state().await;

        let response = get_path(state.clone(), "/addons/bar").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Contact Me"));

        let response = get_path(state.clone(), "/addons/foo-blaster").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_path(state, "/addons/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_same_slug_addons_open_their_own_details() {
        let state = state_with(json!([
            { "name": "Foo Blaster", "description": "first one" },
            { "name": "foo blaster", "description": "second one" },
        ]))
        .await;

        let links = details_links(&body_text(get_path(state.clone(), "/").await).await);
        assert_eq!(links, vec!["/addons/foo-blaster", "/addons/foo-blaster-2"]);

        for (link, shown, hidden) in [
            (&links[0], "first one", "second one"),
            (&links[1], "second one", "first one"),
        ] {
            let response = get_path(state.clone(), link).await;
            assert_eq!(response.status(), StatusCode::OK);
            let html = body_text(response).await;
            assert!(html.contains(shown), "{link} should show {shown:?}");
            assert!(!html.contains(hidden), "{link} should not show {hidden:?}");
        }
    }

    #[tokio::test]
    async fn test_addon_without_slug_has_working_details_link() {
        let state = state_with(json!([{ "name": "🔥🔥", "description": "hot stuff" }])).await;

        let links = details_links(&body_text(get_path(state.clone(), "/").await).await);
        assert_eq!(links, vec!["/addons/addon-1"]);

        let response = get_path(state, &links[0]).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("hot stuff"));
    }

    #[tokio::test]
    async fn test_theme_toggle_sets_cookie_and_redirects() {
        let request = Request::post("/theme")
            .header(header::COOKIE, "theme=light")
            .header(header::REFERER, "http://localhost/?q=foo")
            .body(Body::empty())
            .unwrap();
        let response = send(test_state().await, request).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/?q=foo");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("theme=dark;"));
    }

    #[tokio::test]
    async fn test_theme_cookie_is_applied_to_pages() {
        let request = Request::get("/")
            .header(header::COOKIE, "theme=dark")
            .body(Body::empty())
            .unwrap();
        let html = body_text(send(test_state().await, request).await).await;
        assert!(html.contains(r#"<body class="dark">"#));
    }
}
