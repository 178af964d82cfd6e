//! Data types produced by the series pipeline.

use serde::Serialize;

/// A single `(timestamp, value)` sample. `x` is UTC epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: i64,
    pub y: f64,
}

impl Point {
    pub fn new(x: i64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Value axis a [`MetricGroup`] is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AxisId {
    #[serde(rename = "y")]
    NewCases,
    #[serde(rename = "y1")]
    Severe,
    #[serde(rename = "y2")]
    Deaths,
    #[serde(rename = "y3")]
    Inpatient,
    #[serde(rename = "y4")]
    Discharged,
    #[serde(rename = "y5")]
    Doses,
}

impl AxisId {
    /// All axes in presentation order.
    pub const ALL: [AxisId; 6] = [
        AxisId::NewCases,
        AxisId::Severe,
        AxisId::Deaths,
        AxisId::Inpatient,
        AxisId::Discharged,
        AxisId::Doses,
    ];

    /// Identifier used by the charting widget (`y`, `y1` .. `y5`).
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisId::NewCases => "y",
            AxisId::Severe => "y1",
            AxisId::Deaths => "y2",
            AxisId::Inpatient => "y3",
            AxisId::Discharged => "y4",
            AxisId::Doses => "y5",
        }
    }
}

/// Static presentation attributes of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    pub label: &'static str,
    pub color: &'static str,
    pub border_color: &'static str,
    pub point_radius: u8,
}

/// A named line of points, ascending by `x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub label: &'static str,
    pub color: &'static str,
    pub border_color: &'static str,
    pub point_radius: u8,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(style: SeriesStyle, points: Vec<Point>) -> Self {
        Self {
            label: style.label,
            color: style.color,
            border_color: style.border_color,
            point_radius: style.point_radius,
            points,
        }
    }
}

/// Series sharing one value axis, e.g. a raw counter and its moving average.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricGroup {
    pub axis_id: AxisId,
    pub title: &'static str,
    pub series: Vec<Series>,
}
