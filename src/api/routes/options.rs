//! Options Route
//!
//! - GET /api/v1/options - Dropdown options for year and indicator

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::OptionsResponse;
use crate::api::state::AppState;
use crate::render::{indicator_options, year_options};

/// GET /api/v1/options
///
/// Years present in the table and every indicator column, each list
/// led by the "No Selection" entry.
pub async fn list_options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        years: year_options(&state.table.years()),
        indicators: indicator_options(state.table.indicators()),
    })
}
