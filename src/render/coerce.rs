//! Numeric coercion of indicator cells
//!
//! Cells are stored as raw text. Anything that does not parse as a finite
//! number (e.g. "Suppressed", "No data") is treated as missing.

/// Coerce a raw cell to a number
pub fn to_numeric(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_text() {
        assert_eq!(to_numeric(Some("10")), Some(10.0));
        assert_eq!(to_numeric(Some(" 12.5 ")), Some(12.5));
        assert_eq!(to_numeric(Some("-3")), Some(-3.0));
        assert_eq!(to_numeric(Some("1e3")), Some(1000.0));
    }

    #[test]
    fn test_non_numeric_is_missing() {
        assert_eq!(to_numeric(None), None);
        assert_eq!(to_numeric(Some("")), None);
        assert_eq!(to_numeric(Some("Suppressed")), None);
        assert_eq!(to_numeric(Some("1,234")), None);
        assert_eq!(to_numeric(Some("NaN")), None);
        assert_eq!(to_numeric(Some("inf")), None);
    }

    #[test]
    fn test_coercion_is_idempotent() {
        for raw in ["10", "0.1", "33.333333333333336", "-7.25", "1e-7", "123456789"] {
            let once = to_numeric(Some(raw)).unwrap();
            let twice = to_numeric(Some(&once.to_string())).unwrap();
            assert_eq!(once, twice, "coercing {} twice changed the value", raw);
        }
    }
}
