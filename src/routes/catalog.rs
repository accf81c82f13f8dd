use crate::filter::{filter, TypeFilter};
use crate::render::{self, IndexView};
use crate::state::AppState;
use crate::theme::Theme;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

/// Search parameters shared by the HTML and JSON catalog views
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default, rename = "type")]
    pub addon_type: String,
}

impl CatalogQuery {
    pub fn selector(&self) -> Result<TypeFilter, (StatusCode, String)> {
        self.addon_type.parse().map_err(|err: String| {
            tracing::debug!("Rejected catalog query: {}", err);
            (StatusCode::BAD_REQUEST, err)
        })
    }
}

/// Renders the catalog grid filtered by the query string
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CatalogQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let selector = query.selector()?;
    let snapshot = state.catalog.snapshot().await;
    let results = filter(&snapshot.addons, &query.q, selector);

    tracing::debug!(
        "Rendering catalog: query={:?}, type={}, {} of {} addons",
        query.q,
        selector,
        results.len(),
        snapshot.addons.len()
    );

    let page = render::index_page(&IndexView {
        theme: Theme::from_headers(&headers),
        query: &query.q,
        selector,
        snapshot: &snapshot,
        results: &results,
        ui: &state.ui,
    });

    Ok(Html(page.into_string()))
}

/// Details page with screenshots for a single addon
pub async fn addon_details(
    Path(key): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let theme = Theme::from_headers(&headers);
    let snapshot = state.catalog.snapshot().await;

    match snapshot.addons.iter().find(|addon| addon.key() == key) {
        Some(addon) => {
            Html(render::details_page(theme, addon, &state.ui).into_string()).into_response()
        }
        None => {
            tracing::debug!("Addon not found: {}", key);
            (
                StatusCode::NOT_FOUND,
                Html(render::not_found_page(theme, &key).into_string()),
            )
                .into_response()
        }
    }
}

/// Reloads the catalog, then sends the browser back to the grid.
/// Failures are shown by the grid itself.
pub async fn reload(State(state): State<AppState>) -> Redirect {
    let _ = state.reload().await;
    Redirect::to("/")
}
