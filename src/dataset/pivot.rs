//! Long-to-wide pivot
//!
//! Groups observations by their seven key columns and spreads the
//! `Question` column into one column per indicator.
//!
//! ```text
//! Observations → Group by RowKey → First value per question → Sort → WideTable
//! ```
//!
//! Aggregation keeps the first non-missing value for each (key, question)
//! pair; later duplicates are discarded. Keys without any value and
//! questions without any value produce no row and no column respectively.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::types::{Observation, RowKey, WideRow, WideTable};

/// Pivot observations into the sorted wide table
pub fn pivot<I>(observations: I) -> WideTable
where
    I: IntoIterator<Item = Observation>,
{
    let mut groups: BTreeMap<RowKey, HashMap<String, String>> = BTreeMap::new();
    let mut questions: BTreeSet<String> = BTreeSet::new();
    let mut duplicates = 0usize;

    for obs in observations {
        let Some(value) = obs.data_value.clone() else {
            continue;
        };

        let cells = groups.entry(obs.key()).or_default();
        if cells.contains_key(&obs.question) {
            duplicates += 1;
            continue;
        }

        questions.insert(obs.question.clone());
        cells.insert(obs.question, value);
    }

    if duplicates > 0 {
        tracing::debug!(duplicates, "Discarded duplicate observations during pivot");
    }

    let indicators: Vec<String> = questions.into_iter().collect();

    let mut rows: Vec<WideRow> = groups
        .into_iter()
        .map(|(key, mut cells)| {
            let values = indicators.iter().map(|q| cells.remove(q)).collect();
            WideRow { key, values }
        })
        .collect();

    // Stable: ties keep the full-key order produced by the grouping
    rows.sort_by(|a, b| {
        (a.key.year, &a.key.location_abbr, &a.key.location_desc).cmp(&(
            b.key.year,
            &b.key.location_abbr,
            &b.key.location_desc,
        ))
    });

    WideTable::new(indicators, rows)
}
