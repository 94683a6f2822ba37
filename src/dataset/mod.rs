//! CDI Dataset
//!
//! Loads the U.S. Chronic Disease Indicators CSV once at startup and
//! reshapes it into an immutable wide table:
//!
//! - **types**: Observation, RowKey, WideRow, WideTable
//! - **loader**: Fetching (HTTP or file) and CSV parsing
//! - **pivot**: Long-to-wide reshape with "first value wins" aggregation
//! - **error**: Error types
//!
//! # Pipeline
//!
//! ```text
//! CSV → Select 9 columns → Pivot on 7 keys → Sort → Rename Stratification1 → WideTable
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use cdi_dashboard::dataset::{load_and_reshape, DataSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = DataSource::parse("./chronicdiseases_ind.csv");
//!     let table = load_and_reshape(&source).await?;
//!
//!     println!("{} rows, {} indicators", table.len(), table.indicators().len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod pivot;
pub mod types;

pub use error::{DatasetError, DatasetResult};
pub use loader::{
    load_and_reshape, load_and_reshape_with, parse_observations, reshape_csv, LoadOptions,
};
pub use pivot::pivot;
pub use types::*;
