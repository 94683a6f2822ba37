//! Figure Routes
//!
//! - GET /api/v1/figures?year=&indicator= - Map and bar chart for a selection

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::FigureParams;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::render::{render, Dashboard, Selection};

/// GET /api/v1/figures
///
/// Runs the filter-and-render step. Empty selections and selections with
/// no data come back as placeholder or empty figures, never as errors.
pub async fn get_figures(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FigureParams>,
) -> ApiResult<Json<Dashboard>> {
    let year = match params.year.as_deref() {
        Some(raw) => Selection::parse_year(raw)?,
        None => Selection::NoSelection,
    };
    let indicator = params
        .indicator
        .as_deref()
        .map(Selection::parse_indicator)
        .unwrap_or(Selection::NoSelection);

    let dashboard = render(&state.table, &year, &indicator);

    tracing::info!(
        year = ?year.as_selected(),
        indicator = ?indicator.as_selected(),
        status = ?dashboard.status,
        "Figures rendered"
    );

    Ok(Json(dashboard))
}
