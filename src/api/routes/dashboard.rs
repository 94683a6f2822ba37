//! Dashboard Page
//!
//! - GET / - The single-page dashboard (dropdowns, map, bar chart)

use axum::response::Html;

const DASHBOARD_HTML: &str = include_str!("../../../assets/dashboard.html");

/// GET /
///
/// Static page; it pulls options and figures from the JSON endpoints.
pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
