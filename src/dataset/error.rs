//! Dataset error types
//!
//! Both variants are fatal at startup: the service cannot run without data.

use thiserror::Error;

/// Errors that can occur while loading and reshaping the dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The source could not be fetched, read, or parsed
    #[error("Data unavailable from {source_name}: {reason}")]
    DataUnavailable { source_name: String, reason: String },

    /// One or more required columns are absent from the header row
    #[error("Schema mismatch: missing columns {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
}

impl DatasetError {
    /// Shorthand for a `DataUnavailable` error
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        DatasetError::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for DatasetError {
    fn from(err: reqwest::Error) -> Self {
        let source_name = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "remote source".to_string());
        DatasetError::unavailable(source_name, err.to_string())
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::unavailable("csv", err.to_string())
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        DatasetError::unavailable("io", err.to_string())
    }
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatasetError::SchemaMismatch {
            missing: vec!["Question".to_string(), "DataValue".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Schema mismatch: missing columns Question, DataValue"
        );

        let err = DatasetError::unavailable("cdi.csv", "connection refused");
        assert_eq!(
            err.to_string(),
            "Data unavailable from cdi.csv: connection refused"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DatasetError = io_err.into();
        assert!(matches!(err, DatasetError::DataUnavailable { .. }));
    }
}
