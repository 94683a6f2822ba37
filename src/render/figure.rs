//! Plotly Figure Model
//!
//! Serializable figure descriptions consumed by plotly.js in the browser.
//! Only the attributes the dashboard uses are modelled; unset options are
//! omitted from the JSON so plotly falls back to its defaults.

use serde::Serialize;

/// Plotly's sequential Plasma palette
pub const PLASMA: [&str; 10] = [
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a",
    "#fdca26", "#f0f921",
];

/// A complete figure: traces plus layout
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// A figure with no traces and default layout
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of plotted points across all traces
    pub fn point_count(&self) -> usize {
        self.data.iter().map(Trace::len).sum()
    }
}

/// A single trace
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Choropleth(ChoroplethTrace),
    Bar(BarTrace),
}

impl Trace {
    /// Number of points in the trace
    pub fn len(&self) -> usize {
        match self {
            Trace::Choropleth(t) => t.locations.len(),
            Trace::Bar(t) => t.x.len(),
        }
    }

    /// Check if the trace has no points
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Geographic regions colored by value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    /// Region ids (two-letter state codes)
    pub locations: Vec<String>,
    /// Color values, aligned with `locations`
    pub z: Vec<f64>,
    pub locationmode: String,
    pub coloraxis: String,
    /// Bold hover heading per region
    pub hovertext: Vec<String>,
    /// Extra hover fields per region
    pub customdata: Vec<Vec<String>>,
    pub hovertemplate: String,
    pub name: String,
    pub geo: String,
}

/// Vertical bars
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub orientation: String,
    pub hovertemplate: String,
    pub name: String,
    pub marker: Marker,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
}

/// Figure layout
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloraxis: Option<ColorAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

impl Margin {
    /// Same margin on every side
    pub fn uniform(px: u32) -> Self {
        Self {
            l: px,
            r: px,
            t: px,
            b: px,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showticklabels: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geo {
    pub scope: String,
}

/// Continuous color scale shared by choropleth traces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorAxis {
    /// `(position, color)` stops from 0.0 to 1.0
    pub colorscale: Vec<(f64, String)>,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

/// Spread a palette into evenly spaced colorscale stops
pub fn continuous_scale(palette: &[&str]) -> Vec<(f64, String)> {
    match palette.len() {
        0 => Vec::new(),
        1 => vec![(0.0, palette[0].to_string()), (1.0, palette[0].to_string())],
        n => {
            let last = (n - 1) as f64;
            palette
                .iter()
                .enumerate()
                .map(|(i, color)| (i as f64 / last, color.to_string()))
                .collect()
        }
    }
}
