//! Core data types for the CDI dataset
//!
//! This module defines the long and wide shapes of the data:
//! - `Observation`: one row of the source CSV, reduced to the nine columns we use
//! - `RowKey`: the seven columns that identify a row after pivoting
//! - `WideRow` / `WideTable`: the pivoted table, one column per indicator

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Source column holding the observation year
pub const COL_YEAR: &str = "YearEnd";
/// Source column holding the two-letter state code
pub const COL_LOCATION_ABBR: &str = "LocationAbbr";
/// Source column holding the location name
pub const COL_LOCATION_DESC: &str = "LocationDesc";
/// Source column holding the data source (BRFSS, NVSS, ...)
pub const COL_DATA_SOURCE: &str = "DataSource";
/// Source column holding the indicator question
pub const COL_QUESTION: &str = "Question";
/// Source column holding the value type (Crude Prevalence, Number, ...)
pub const COL_DATA_VALUE_TYPE: &str = "DataValueType";
/// Source column holding the raw value
pub const COL_DATA_VALUE: &str = "DataValue";
/// Source column holding the demographic stratum
pub const COL_STRATIFICATION: &str = "Stratification1";
/// Source column holding the stratification category id
pub const COL_STRATIFICATION_CATEGORY: &str = "StratificationCategoryID1";

/// Display name of the stratification column in the wide table
pub const COL_DEMOGRAPHIC: &str = "Demographic";

/// The nine columns selected from the source, in selection order
pub const REQUIRED_COLUMNS: [&str; 9] = [
    COL_YEAR,
    COL_LOCATION_ABBR,
    COL_LOCATION_DESC,
    COL_DATA_SOURCE,
    COL_QUESTION,
    COL_DATA_VALUE_TYPE,
    COL_DATA_VALUE,
    COL_STRATIFICATION,
    COL_STRATIFICATION_CATEGORY,
];

/// Header names of the seven key columns of the wide table (after renaming)
pub const KEY_COLUMNS: [&str; 7] = [
    COL_YEAR,
    COL_LOCATION_ABBR,
    COL_LOCATION_DESC,
    COL_DATA_SOURCE,
    COL_DATA_VALUE_TYPE,
    COL_DEMOGRAPHIC,
    COL_STRATIFICATION_CATEGORY,
];

/// Where the dataset is loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Remote CSV fetched over HTTP(S)
    Url(String),
    /// Local CSV file
    Path(PathBuf),
}

impl DataSource {
    /// Interpret a location string: `http://` and `https://` are URLs, anything else is a path
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A single long-format observation
///
/// Key columns are always present; observations with a missing key are
/// dropped while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub year: i32,
    pub location_abbr: String,
    pub location_desc: String,
    pub data_source: String,
    pub question: String,
    pub data_value_type: String,
    /// Raw value text, `None` when missing
    pub data_value: Option<String>,
    pub stratification: String,
    pub stratification_category_id: String,
}

impl Observation {
    /// The pivot key of this observation
    pub fn key(&self) -> RowKey {
        RowKey {
            year: self.year,
            location_abbr: self.location_abbr.clone(),
            location_desc: self.location_desc.clone(),
            data_source: self.data_source.clone(),
            data_value_type: self.data_value_type.clone(),
            demographic: self.stratification.clone(),
            stratification_category_id: self.stratification_category_id.clone(),
        }
    }
}

/// The seven key columns of a wide row
///
/// Field order defines the ordering used by the pivot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RowKey {
    pub year: i32,
    pub location_abbr: String,
    pub location_desc: String,
    pub data_source: String,
    pub data_value_type: String,
    /// The `Stratification1` column, displayed as "Demographic"
    pub demographic: String,
    pub stratification_category_id: String,
}

/// A row of the wide table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideRow {
    pub key: RowKey,
    /// One cell per indicator, aligned with [`WideTable::indicators`]
    pub values: Vec<Option<String>>,
}

impl WideRow {
    /// Raw value for the indicator at `index`
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

/// The pivoted, sorted, immutable dataset
#[derive(Debug, Clone)]
pub struct WideTable {
    indicators: Vec<String>,
    rows: Vec<WideRow>,
    loaded_at: DateTime<Utc>,
}

impl WideTable {
    /// Build a table from already pivoted parts
    pub(crate) fn new(indicators: Vec<String>, rows: Vec<WideRow>) -> Self {
        Self {
            indicators,
            rows,
            loaded_at: Utc::now(),
        }
    }

    /// Indicator column names, in column order
    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    /// All rows, sorted by (year, location abbreviation, location name)
    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// When the table was built
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// All column headers: the seven key columns followed by the indicators
    pub fn column_names(&self) -> Vec<String> {
        KEY_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.indicators.iter().cloned())
            .collect()
    }

    /// Position of an indicator column
    pub fn indicator_index(&self, name: &str) -> Option<usize> {
        self.indicators.iter().position(|i| i == name)
    }

    /// Distinct years, ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = Vec::new();
        for row in &self.rows {
            if years.last() != Some(&row.key.year) {
                years.push(row.key.year);
            }
        }
        years
    }

    /// Rows for a single year
    pub fn rows_for_year(&self, year: i32) -> &[WideRow] {
        // Rows are sorted by year first
        let start = self.rows.partition_point(|r| r.key.year < year);
        let end = self.rows.partition_point(|r| r.key.year <= year);
        &self.rows[start..end]
    }
}
