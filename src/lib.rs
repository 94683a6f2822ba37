//! # CDI Dashboard
//!
//! Interactive dashboard for the U.S. Chronic Disease Indicators (CDI) dataset:
//! a choropleth map and a bar chart driven by a year and a health-indicator
//! dropdown.
//!
//! ## Modules
//!
//! - [`dataset`]: Loading the CDI CSV and pivoting it into a wide table
//! - [`render`]: Filtering the wide table and building Plotly figures
//! - [`api`]: HTTP server with Axum (dashboard page + JSON endpoints)
//! - [`config`]: TOML / environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cdi_dashboard::dataset::{load_and_reshape, DataSource};
//! use cdi_dashboard::render::{render, Selection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = load_and_reshape(&DataSource::parse("./chronicdiseases_ind.csv")).await?;
//!
//!     let year = Selection::Selected(2019);
//!     let indicator = Selection::Selected("Current smoking among adults aged >= 18 years".to_string());
//!     let dashboard = render(&table, &year, &indicator);
//!
//!     println!("{:?}", dashboard.status);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dataset;
pub mod render;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SourceConfig};

pub use dataset::{
    load_and_reshape, DataSource, DatasetError, DatasetResult, Observation, RowKey, WideRow,
    WideTable,
};

pub use render::{render, Dashboard, Figure, RenderStatus, Selection};
