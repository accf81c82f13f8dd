use crate::theme::Theme;
use axum::{
    http::{header, HeaderMap, Uri},
    response::{IntoResponse, Redirect},
};

/// Flips the theme cookie and returns to the page the toggle was pressed on
pub async fn toggle_theme(headers: HeaderMap) -> impl IntoResponse {
    let theme = Theme::from_headers(&headers).toggled();
    let target = return_path(&headers);

    tracing::debug!("Switching theme to {}", theme.as_str());

    ([(header::SET_COOKIE, theme.cookie())], Redirect::to(&target))
}

/// Local path of the referring page, never another origin
fn return_path(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/".to_string())
}
