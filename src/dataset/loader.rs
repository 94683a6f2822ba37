//! Dataset Loader
//!
//! Fetches the CDI CSV (remote or local), selects the nine columns the
//! dashboard needs and hands the observations to the pivot.

use std::io::Read;
use std::time::Duration;

use super::error::{DatasetError, DatasetResult};
use super::pivot::pivot;
use super::types::*;

/// Cell texts treated as missing values
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for fetching the dataset
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Timeout for the whole HTTP download
    pub request_timeout: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Load the dataset and reshape it into the wide table
pub async fn load_and_reshape(source: &DataSource) -> DatasetResult<WideTable> {
    load_and_reshape_with(source, &LoadOptions::default()).await
}

/// Load the dataset with explicit options
pub async fn load_and_reshape_with(
    source: &DataSource,
    options: &LoadOptions,
) -> DatasetResult<WideTable> {
    let bytes = fetch(source, options).await?;
    tracing::info!(source = %source, bytes = bytes.len(), "Dataset downloaded");

    let source_name = source.to_string();
    let table = tokio::task::spawn_blocking(move || reshape_csv(bytes.as_slice()))
        .await
        .map_err(|e| DatasetError::unavailable(source_name, format!("parse task failed: {}", e)))??;

    tracing::info!(
        rows = table.len(),
        indicators = table.indicators().len(),
        years = table.years().len(),
        "Dataset reshaped"
    );

    Ok(table)
}

/// Parse and pivot a CSV stream
pub fn reshape_csv<R: Read>(reader: R) -> DatasetResult<WideTable> {
    let observations = parse_observations(reader)?;
    Ok(pivot(observations))
}

/// Read raw bytes from the source
async fn fetch(source: &DataSource, options: &LoadOptions) -> DatasetResult<Vec<u8>> {
    match source {
        DataSource::Url(url) => {
            tracing::info!(url = %url, "Fetching dataset");
            let client = reqwest::Client::builder()
                .timeout(options.request_timeout)
                .build()?;

            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(DatasetError::unavailable(
                    url.clone(),
                    format!("HTTP {}", status),
                ));
            }

            Ok(response.bytes().await?.to_vec())
        }
        DataSource::Path(path) => {
            tracing::info!(path = ?path, "Reading dataset");
            tokio::fs::read(path)
                .await
                .map_err(|e| DatasetError::unavailable(path.display().to_string(), e.to_string()))
        }
    }
}

/// Parse observations from CSV, keeping only the required columns
///
/// Rows with a missing key column are skipped. Extra columns are ignored.
/// Cell text is kept verbatim, so `" AL"` and `"AL"` are distinct keys.
pub fn parse_observations<R: Read>(reader: R) -> DatasetResult<Vec<Observation>> {
    // Short records are padded with missing cells rather than rejected
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let indices = resolve_columns(&headers)?;

    let mut observations = Vec::new();
    let mut skipped = 0usize;

    for (line_num, result) in reader.records().enumerate() {
        // Header is line 1
        let actual_line = line_num + 2;

        let record = result.map_err(|e| {
            DatasetError::unavailable("csv", format!("Line {}: {}", actual_line, e))
        })?;

        let field = |i: usize| cell(record.get(indices[i]));

        let year = match field(0) {
            Some(text) => text.trim().parse::<i32>().map_err(|_| {
                DatasetError::unavailable(
                    "csv",
                    format!("Line {}: invalid {} '{}'", actual_line, COL_YEAR, text),
                )
            })?,
            None => {
                skipped += 1;
                continue;
            }
        };

        let (
            Some(location_abbr),
            Some(location_desc),
            Some(data_source),
            Some(question),
            Some(data_value_type),
            Some(stratification),
            Some(stratification_category_id),
        ) = (
            field(1),
            field(2),
            field(3),
            field(4),
            field(5),
            field(7),
            field(8),
        )
        else {
            skipped += 1;
            continue;
        };

        observations.push(Observation {
            year,
            location_abbr: location_abbr.to_string(),
            location_desc: location_desc.to_string(),
            data_source: data_source.to_string(),
            question: question.to_string(),
            data_value_type: data_value_type.to_string(),
            data_value: field(6).map(str::to_string),
            stratification: stratification.to_string(),
            stratification_category_id: stratification_category_id.to_string(),
        });
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped observations with missing key columns");
    }

    Ok(observations)
}

/// Map each required column to its position in the header row
fn resolve_columns(headers: &csv::StringRecord) -> DatasetResult<[usize; 9]> {
    let mut indices = [0usize; 9];
    let mut missing = Vec::new();

    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|h| h.trim() == *name) {
            Some(idx) => indices[slot] = idx,
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(DatasetError::SchemaMismatch { missing });
    }

    Ok(indices)
}

/// Normalize a cell: `None` for absent cells and exact missing markers
fn cell(raw: Option<&str>) -> Option<&str> {
    let text = raw?;
    if MISSING_MARKERS.contains(&text) {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "YearStart,YearEnd,LocationAbbr,LocationDesc,DataSource,Topic,Question,DataValueType,DataValue,Stratification1,StratificationCategoryID1";

    fn csv_with(rows: &[&str]) -> String {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn test_parse_selects_required_columns() {
        let data = csv_with(&[
            "2015,2015,AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,10,Overall,OVR",
        ]);

        let observations = parse_observations(data.as_bytes()).unwrap();

        assert_eq!(observations.len(), 1);
        let obs = &observations[0];
        assert_eq!(obs.year, 2015);
        assert_eq!(obs.location_abbr, "AL");
        assert_eq!(obs.location_desc, "Alabama");
        assert_eq!(obs.question, "Smoking");
        assert_eq!(obs.data_value.as_deref(), Some("10"));
        assert_eq!(obs.stratification, "Overall");
        assert_eq!(obs.stratification_category_id, "OVR");
    }

    #[test]
    fn test_schema_mismatch_lists_missing_columns() {
        let data = "YearEnd,LocationAbbr,LocationDesc,DataSource,DataValueType,DataValue,Stratification1\n";

        let err = parse_observations(data.as_bytes()).unwrap_err();

        match err {
            DatasetError::SchemaMismatch { missing } => {
                assert_eq!(missing, vec!["Question", "StratificationCategoryID1"]);
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_markers_become_none() {
        let data = csv_with(&[
            "2015,2015,AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,,Overall,OVR",
            "2015,2015,AK,Alaska,BRFSS,Tobacco,Smoking,Crude Prevalence,NA,Overall,OVR",
            "2015,2015,AZ,Arizona,BRFSS,Tobacco,Smoking,Crude Prevalence,Suppressed,Overall,OVR",
        ]);

        let observations = parse_observations(data.as_bytes()).unwrap();

        assert_eq!(observations.len(), 3);
        assert_eq!(observations[0].data_value, None);
        assert_eq!(observations[1].data_value, None);
        // Non-numeric text is kept; numeric coercion happens at render time
        assert_eq!(observations[2].data_value.as_deref(), Some("Suppressed"));
    }

    #[test]
    fn test_rows_with_missing_keys_are_skipped() {
        let data = csv_with(&[
            "2015,,AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,10,Overall,OVR",
            "2015,2015,AL,Alabama,BRFSS,Tobacco,,Crude Prevalence,10,Overall,OVR",
            "2015,2015,AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,10,,OVR",
            "2015,2015,AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,10,Overall,OVR",
        ]);

        let observations = parse_observations(data.as_bytes()).unwrap();

        assert_eq!(observations.len(), 1);
    }

    #[test]
    fn test_invalid_year_is_data_unavailable() {
        let data = csv_with(&[
            "2015,twenty,AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,10,Overall,OVR",
        ]);

        let err = parse_observations(data.as_bytes()).unwrap_err();

        assert!(matches!(err, DatasetError::DataUnavailable { .. }));
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_short_records_are_padded() {
        let data = "YearEnd,LocationAbbr,LocationDesc,DataSource,Question,DataValueType,DataValue,Stratification1,StratificationCategoryID1,Extra
2015,AL,Alabama,BRFSS,Smoking,Crude Prevalence,10,Overall,OVR
2015,AK,Alaska
2016,AZ,Arizona,BRFSS,Smoking,Crude Prevalence,12,Overall,OVR,note";

        let observations = parse_observations(data.as_bytes()).unwrap();

        // The Alaska row lacks key columns and is skipped
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].location_abbr, "AL");
        assert_eq!(observations[0].data_value.as_deref(), Some("10"));
        assert_eq!(observations[1].location_abbr, "AZ");
    }

    #[test]
    fn test_short_record_missing_value_is_none() {
        let data = "YearEnd,LocationAbbr,LocationDesc,DataSource,Question,DataValueType,Stratification1,StratificationCategoryID1,DataValue
2015,AL,Alabama,BRFSS,Smoking,Crude Prevalence,Overall,OVR";

        let observations = parse_observations(data.as_bytes()).unwrap();

        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].data_value, None);
    }

    #[test]
    fn test_key_whitespace_is_preserved() {
        let data = csv_with(&[
            "2015,2015,AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,10,Overall,OVR",
            "2015, 2015, AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,11,Overall,OVR",
        ]);

        let table = reshape_csv(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.years(), vec![2015]);
        let abbrs: Vec<&str> = table
            .rows()
            .iter()
            .map(|r| r.key.location_abbr.as_str())
            .collect();
        assert_eq!(abbrs, vec![" AL", "AL"]);
    }

    #[test]
    fn test_reshape_csv_builds_wide_table() {
        let data = csv_with(&[
            "2015,2015,AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,10,Overall,OVR",
            "2015,2015,AL,Alabama,BRFSS,Diabetes,Diabetes prevalence,Crude Prevalence,9.1,Overall,OVR",
        ]);

        let table = reshape_csv(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.indicators(), &["Diabetes prevalence", "Smoking"]);
    }

    #[tokio::test]
    async fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        let data = csv_with(&[
            "2016,2016,AK,Alaska,BRFSS,Tobacco,Smoking,Crude Prevalence,19,Overall,OVR",
            "2015,2015,AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,10,Overall,OVR",
        ]);
        file.write_all(data.as_bytes()).unwrap();

        let source = DataSource::Path(file.path().to_path_buf());
        let table = load_and_reshape(&source).await.unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.years(), vec![2015, 2016]);
    }

    /// Serve `body` at `/cdi.csv` on an ephemeral local port
    async fn serve_csv(body: String) -> String {
        let app = axum::Router::new().route(
            "/cdi.csv",
            axum::routing::get(move || {
                let body = body.clone();
                async move { body }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_load_from_url() {
        let base = serve_csv(csv_with(&[
            "2015,2015,AL,Alabama,BRFSS,Tobacco,Smoking,Crude Prevalence,10,Overall,OVR",
        ]))
        .await;

        let source = DataSource::parse(&format!("{}/cdi.csv", base));
        assert!(matches!(source, DataSource::Url(_)));

        let table = load_and_reshape(&source).await.unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.indicators(), &["Smoking"]);
    }

    #[tokio::test]
    async fn test_load_url_not_found_is_data_unavailable() {
        let base = serve_csv(String::new()).await;
        let source = DataSource::parse(&format!("{}/missing.csv", base));

        let err = load_and_reshape(&source).await.unwrap_err();

        match err {
            DatasetError::DataUnavailable { reason, .. } => {
                assert!(reason.starts_with("HTTP 404"), "unexpected reason: {}", reason);
            }
            other => panic!("expected DataUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::Path(dir.path().join("absent.csv"));

        let err = load_and_reshape(&source).await.unwrap_err();

        assert!(matches!(err, DatasetError::DataUnavailable { .. }));
    }
}
