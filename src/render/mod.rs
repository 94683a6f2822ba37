//! Filter-and-Render
//!
//! Pure function from the two dropdown selections to a map and a bar chart.
//! The wide table is only read; every call derives its own filtered view.
//!
//! # Pipeline
//!
//! ```text
//! (year, indicator) → Filter by year → Coerce to number → Drop missing → Map + Bar chart
//! ```

pub mod coerce;
pub mod figure;
pub mod selection;

pub use coerce::to_numeric;
pub use figure::*;
pub use selection::{
    indicator_options, year_options, DropdownOption, InvalidYear, Selection, NO_SELECTION,
};

use serde::Serialize;

use crate::dataset::{RowKey, WideTable, COL_DATA_SOURCE, COL_DATA_VALUE_TYPE, COL_DEMOGRAPHIC};

/// Bar chart width in pixels
pub const CHART_WIDTH: u32 = 800;
/// Bar chart height in pixels
pub const CHART_HEIGHT: u32 = 400;
/// Bar chart margin on every side, in pixels
pub const CHART_MARGIN: u32 = 50;
/// Bar chart font size
pub const CHART_FONT_SIZE: u32 = 10;

const BAR_COLOR: &str = "#636efa";

/// How a render call was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderStatus {
    /// Both selections set and `rows` rows plotted
    Rendered { rows: usize },
    /// At least one dropdown is on "No Selection"
    EmptySelection,
    /// Selections set but nothing survived filtering
    NoMatchingRows,
}

/// The two dashboard outputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub status: RenderStatus,
    pub map: Figure,
    pub chart: Figure,
}

/// A row that survived filtering and coercion
#[derive(Debug, Clone, Copy)]
pub struct PlotRow<'a> {
    pub key: &'a RowKey,
    pub value: f64,
}

/// Render the map and bar chart for a year and indicator
pub fn render(
    table: &WideTable,
    year: &Selection<i32>,
    indicator: &Selection<String>,
) -> Dashboard {
    let (Some(&year), Some(indicator)) = (year.as_selected(), indicator.as_selected()) else {
        tracing::debug!("Empty selection, returning placeholder figures");
        return Dashboard {
            status: RenderStatus::EmptySelection,
            map: placeholder_map(),
            chart: Figure::empty(),
        };
    };

    let rows = filter_rows(table, year, indicator);
    let status = if rows.is_empty() {
        RenderStatus::NoMatchingRows
    } else {
        RenderStatus::Rendered { rows: rows.len() }
    };

    tracing::debug!(year, indicator = %indicator, status = ?status, "Rendered figures");

    Dashboard {
        status,
        map: choropleth_map(&rows, indicator),
        chart: indicator_bar_chart(&rows, indicator),
    }
}

/// Rows for `year` with a numeric value for `indicator`, in table order
///
/// An unknown indicator yields no rows.
pub fn filter_rows<'a>(table: &'a WideTable, year: i32, indicator: &str) -> Vec<PlotRow<'a>> {
    let Some(column) = table.indicator_index(indicator) else {
        return Vec::new();
    };

    table
        .rows_for_year(year)
        .iter()
        .filter_map(|row| {
            to_numeric(row.value(column)).map(|value| PlotRow {
                key: &row.key,
                value,
            })
        })
        .collect()
}

/// The map shown before both dropdowns are set
pub fn placeholder_map() -> Figure {
    Figure::empty()
}

/// US state choropleth colored by indicator value
pub fn choropleth_map(rows: &[PlotRow<'_>], indicator: &str) -> Figure {
    let hovertemplate = format!(
        "<b>%{{hovertext}}</b><br><br>LocationAbbr=%{{location}}<br>{}=%{{customdata[0]}}<br>{}=%{{customdata[1]}}<br>{}=%{{customdata[2]}}<br>{}=%{{z}}<extra></extra>",
        COL_DATA_SOURCE, COL_DATA_VALUE_TYPE, COL_DEMOGRAPHIC, indicator
    );

    let trace = ChoroplethTrace {
        locations: rows.iter().map(|r| r.key.location_abbr.clone()).collect(),
        z: rows.iter().map(|r| r.value).collect(),
        locationmode: "USA-states".to_string(),
        coloraxis: "coloraxis".to_string(),
        hovertext: rows.iter().map(|r| r.key.location_desc.clone()).collect(),
        customdata: rows
            .iter()
            .map(|r| {
                vec![
                    r.key.data_source.clone(),
                    r.key.data_value_type.clone(),
                    r.key.demographic.clone(),
                ]
            })
            .collect(),
        hovertemplate,
        name: String::new(),
        geo: "geo".to_string(),
    };

    Figure {
        data: vec![Trace::Choropleth(trace)],
        layout: Layout {
            geo: Some(Geo {
                scope: "usa".to_string(),
            }),
            coloraxis: Some(ColorAxis {
                colorscale: continuous_scale(&PLASMA),
                colorbar: ColorBar {
                    title: Title::new(indicator),
                },
            }),
            margin: Some(Margin {
                l: 0,
                r: 0,
                t: 40,
                b: 0,
            }),
            ..Default::default()
        },
    }
}

/// Indicator values per demographic group
pub fn indicator_bar_chart(rows: &[PlotRow<'_>], indicator: &str) -> Figure {
    let trace = BarTrace {
        x: rows.iter().map(|r| r.key.demographic.clone()).collect(),
        y: rows.iter().map(|r| r.value).collect(),
        orientation: "v".to_string(),
        hovertemplate: format!(
            "{}=%{{x}}<br>{}=%{{y}}<extra></extra>",
            COL_DEMOGRAPHIC, indicator
        ),
        name: String::new(),
        marker: Marker {
            color: BAR_COLOR.to_string(),
        },
        showlegend: false,
    };

    Figure {
        data: vec![Trace::Bar(trace)],
        layout: Layout {
            title: Some(Title::new(format!("{} by {}", indicator, COL_DEMOGRAPHIC))),
            font: Some(Font {
                size: CHART_FONT_SIZE,
            }),
            width: Some(CHART_WIDTH),
            height: Some(CHART_HEIGHT),
            margin: Some(Margin::uniform(CHART_MARGIN)),
            xaxis: Some(Axis {
                title: Title::new(COL_DEMOGRAPHIC),
                showticklabels: None,
            }),
            yaxis: Some(Axis {
                title: Title::new(""),
                showticklabels: Some(false),
            }),
            barmode: Some("relative".to_string()),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::reshape_csv;

    const HEADER: &str = "YearEnd,LocationAbbr,LocationDesc,DataSource,Question,DataValueType,DataValue,Stratification1,StratificationCategoryID1";

    fn table(rows: &[&str]) -> WideTable {
        let mut data = HEADER.to_string();
        for row in rows {
            data.push('\n');
            data.push_str(row);
        }
        reshape_csv(data.as_bytes()).unwrap()
    }

    fn sample() -> WideTable {
        table(&[
            "2015,AL,Alabama,BRFSS,Smoking,Crude Prevalence,10,Overall,OVR",
            "2015,AL,Alabama,BRFSS,Smoking,Crude Prevalence,12,Overall,OVR",
            "2015,AL,Alabama,BRFSS,Smoking,Crude Prevalence,21,Male,GENDER",
            "2015,AK,Alaska,BRFSS,Smoking,Crude Prevalence,Suppressed,Overall,OVR",
            "2015,AZ,Arizona,BRFSS,Asthma,Crude Prevalence,9.5,Overall,OVR",
            "2016,AL,Alabama,BRFSS,Smoking,Crude Prevalence,11,Overall,OVR",
        ])
    }

    fn year(y: i32) -> Selection<i32> {
        Selection::Selected(y)
    }

    fn indicator(name: &str) -> Selection<String> {
        Selection::Selected(name.to_string())
    }

    #[test]
    fn test_no_selection_returns_placeholders() {
        let table = sample();

        for (y, i) in [
            (Selection::NoSelection, indicator("Smoking")),
            (year(2015), Selection::NoSelection),
            (Selection::NoSelection, Selection::NoSelection),
        ] {
            let dashboard = render(&table, &y, &i);
            assert_eq!(dashboard.status, RenderStatus::EmptySelection);
            assert_eq!(dashboard.map, placeholder_map());
            assert!(dashboard.chart.data.is_empty());
        }
    }

    #[test]
    fn test_first_value_scenario() {
        let table = sample();

        let dashboard = render(&table, &year(2015), &indicator("Smoking"));

        assert_eq!(dashboard.status, RenderStatus::Rendered { rows: 2 });
        let Trace::Bar(bar) = &dashboard.chart.data[0] else {
            panic!("expected bar trace");
        };
        // Male sorts before Overall within AL
        assert_eq!(bar.x, vec!["Male", "Overall"]);
        assert_eq!(bar.y, vec![21.0, 10.0]);
    }

    #[test]
    fn test_suppressed_rows_are_excluded() {
        let table = sample();

        let dashboard = render(&table, &year(2015), &indicator("Smoking"));

        let Trace::Choropleth(map) = &dashboard.map.data[0] else {
            panic!("expected choropleth trace");
        };
        assert!(!map.locations.iter().any(|l| l == "AK"));
        let Trace::Bar(bar) = &dashboard.chart.data[0] else {
            panic!("expected bar trace");
        };
        assert_eq!(bar.y.len(), map.z.len());
    }

    #[test]
    fn test_region_count_matches_numeric_rows() {
        let table = sample();

        for &y in &table.years() {
            for name in table.indicators() {
                let column = table.indicator_index(name).unwrap();
                let expected = table
                    .rows()
                    .iter()
                    .filter(|r| r.key.year == y && to_numeric(r.value(column)).is_some())
                    .count();

                let dashboard = render(&table, &year(y), &indicator(name));
                assert_eq!(dashboard.map.point_count(), expected);
                assert_eq!(dashboard.chart.point_count(), expected);
            }
        }
    }

    #[test]
    fn test_no_matching_rows_is_empty_not_error() {
        let table = sample();

        let missing_year = render(&table, &year(1999), &indicator("Smoking"));
        assert_eq!(missing_year.status, RenderStatus::NoMatchingRows);
        assert_eq!(missing_year.map.point_count(), 0);
        assert_eq!(missing_year.chart.point_count(), 0);

        let all_dropped = render(&table, &year(2016), &indicator("Asthma"));
        assert_eq!(all_dropped.status, RenderStatus::NoMatchingRows);

        let unknown = render(&table, &year(2015), &indicator("Not an indicator"));
        assert_eq!(unknown.status, RenderStatus::NoMatchingRows);
    }

    #[test]
    fn test_map_hover_and_scale() {
        let table = sample();

        let dashboard = render(&table, &year(2015), &indicator("Asthma"));

        let Trace::Choropleth(map) = &dashboard.map.data[0] else {
            panic!("expected choropleth trace");
        };
        assert_eq!(map.locations, vec!["AZ"]);
        assert_eq!(map.z, vec![9.5]);
        assert_eq!(map.locationmode, "USA-states");
        assert_eq!(map.hovertext, vec!["Arizona"]);
        assert_eq!(
            map.customdata,
            vec![vec![
                "BRFSS".to_string(),
                "Crude Prevalence".to_string(),
                "Overall".to_string()
            ]]
        );

        let layout = &dashboard.map.layout;
        assert_eq!(layout.geo.as_ref().unwrap().scope, "usa");
        let coloraxis = layout.coloraxis.as_ref().unwrap();
        assert_eq!(coloraxis.colorscale.first().unwrap().1, PLASMA[0]);
        assert_eq!(coloraxis.colorbar.title.text, "Asthma");
    }

    #[test]
    fn test_bar_chart_layout() {
        let table = sample();

        let dashboard = render(&table, &year(2015), &indicator("Smoking"));
        let layout = &dashboard.chart.layout;

        assert_eq!(layout.title.as_ref().unwrap().text, "Smoking by Demographic");
        assert_eq!(layout.width, Some(800));
        assert_eq!(layout.height, Some(400));
        assert_eq!(layout.margin, Some(Margin::uniform(50)));
        assert_eq!(layout.font.as_ref().unwrap().size, 10);
        let yaxis = layout.yaxis.as_ref().unwrap();
        assert_eq!(yaxis.title.text, "");
        assert_eq!(yaxis.showticklabels, Some(false));
    }

    #[test]
    fn test_render_does_not_touch_table() {
        let table = sample();
        let before: Vec<_> = table.rows().to_vec();

        let _ = render(&table, &year(2015), &indicator("Smoking"));

        assert_eq!(table.rows(), before.as_slice());
    }
}
