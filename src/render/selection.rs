//! Dropdown selections
//!
//! Both dropdowns carry a "No Selection" sentinel as their default value.

use serde::Serialize;

/// Text of the "nothing selected" dropdown entry
pub const NO_SELECTION: &str = "No Selection";

/// A dropdown value: either the sentinel or a concrete choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    NoSelection,
    Selected(T),
}

impl<T> Selection<T> {
    /// The selected value, if any
    pub fn as_selected(&self) -> Option<&T> {
        match self {
            Selection::NoSelection => None,
            Selection::Selected(value) => Some(value),
        }
    }

    /// Check for the sentinel
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::NoSelection)
    }
}

/// Error for a year value that is neither the sentinel nor an integer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid year selection: {0}")]
pub struct InvalidYear(pub String);

impl Selection<i32> {
    /// Parse the year dropdown value
    pub fn parse_year(raw: &str) -> Result<Self, InvalidYear> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == NO_SELECTION {
            return Ok(Selection::NoSelection);
        }
        trimmed
            .parse::<i32>()
            .map(Selection::Selected)
            .map_err(|_| InvalidYear(raw.to_string()))
    }
}

impl Selection<String> {
    /// Parse the indicator dropdown value
    ///
    /// Indicator names are matched exactly, so no trimming beyond the sentinel check.
    pub fn parse_indicator(raw: &str) -> Self {
        if raw.is_empty() || raw == NO_SELECTION {
            Selection::NoSelection
        } else {
            Selection::Selected(raw.to_string())
        }
    }
}

/// A `{label, value}` dropdown entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: serde_json::Value,
}

impl DropdownOption {
    /// The "No Selection" entry
    pub fn no_selection() -> Self {
        Self {
            label: NO_SELECTION.to_string(),
            value: serde_json::Value::String(NO_SELECTION.to_string()),
        }
    }
}

/// Year dropdown options, sentinel first
pub fn year_options(years: &[i32]) -> Vec<DropdownOption> {
    std::iter::once(DropdownOption::no_selection())
        .chain(years.iter().map(|year| DropdownOption {
            label: year.to_string(),
            value: serde_json::Value::from(*year),
        }))
        .collect()
}

/// Indicator dropdown options, sentinel first
pub fn indicator_options(indicators: &[String]) -> Vec<DropdownOption> {
    std::iter::once(DropdownOption::no_selection())
        .chain(indicators.iter().map(|name| DropdownOption {
            label: name.clone(),
            value: serde_json::Value::String(name.clone()),
        }))
        .collect()
}
