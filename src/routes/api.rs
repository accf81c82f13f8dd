use crate::catalog::ReloadOutcome;
use crate::filter::filter;
use crate::models::Addon;
use crate::routes::catalog::CatalogQuery;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AddonList {
    pub status: &'static str,
    pub total: usize,
    pub count: usize,
    pub addons: Vec<Addon>,
}

#[derive(Debug, Serialize)]
pub struct CatalogStatus {
    pub status: &'static str,
    pub total: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ReloadResponse {
    Applied { count: usize },
    Superseded,
}

/// Filtered catalog as JSON
pub async fn list_addons(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<AddonList>, (StatusCode, String)> {
    let selector = query.selector()?;
    let snapshot = state.catalog.snapshot().await;

    let addons: Vec<Addon> = filter(&snapshot.addons, &query.q, selector)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(AddonList {
        status: snapshot.status.as_str(),
        total: snapshot.addons.len(),
        count: addons.len(),
        addons,
    }))
}

pub async fn status(State(state): State<AppState>) -> Json<CatalogStatus> {
    let snapshot = state.catalog.snapshot().await;

    Json(CatalogStatus {
        status: snapshot.status.as_str(),
        total: snapshot.addons.len(),
        loaded_at: snapshot.loaded_at,
        error: snapshot.status.error().map(str::to_string),
    })
}

/// Reloads the catalog and reports what happened
pub async fn reload(State(state): State<AppState>) -> Response {
    match state.reload().await {
        Ok(ReloadOutcome::Applied(count)) => {
            Json(ReloadResponse::Applied { count }).into_response()
        }
        Ok(ReloadOutcome::Superseded) => Json(ReloadResponse::Superseded).into_response(),
        Err(err) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}
