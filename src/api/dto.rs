//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::render::DropdownOption;

// ============================================
// OPTIONS DTOs
// ============================================

/// Dropdown contents for the dashboard
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    /// Year options, "No Selection" first
    pub years: Vec<DropdownOption>,
    /// Indicator options, "No Selection" first
    pub indicators: Vec<DropdownOption>,
}

// ============================================
// FIGURE DTOs
// ============================================

/// Figure query parameters; absent values mean "No Selection"
#[derive(Debug, Default, Deserialize)]
pub struct FigureParams {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub indicator: Option<String>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Dataset location
    pub source: String,
    /// Rows in the wide table
    pub rows: usize,
    /// Indicator columns in the wide table
    pub indicators: usize,
    /// Distinct years in the wide table
    pub years: usize,
    /// When the table was built
    pub loaded_at: DateTime<Utc>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
