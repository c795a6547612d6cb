//! Trend chart scaling: maps year/value observations onto the unit square.
//!
//! All series share one vertical scale and one time axis. The engine emits
//! `y_frac` un-inverted (0 is the bottom of the plot, 1 the top); flipping it
//! for a top-left pixel origin happens in [`PlotArea::project`].
//!
//! Degenerate input never divides by zero: a zero year range puts every point
//! at `x_frac = 0.5`, a zero value range puts every value at `y_frac = 0.5`,
//! and an empty point list yields an empty layout with all-zero bounds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::TrendPoint;

/// Fraction used on an axis whose range collapsed to a single value.
pub const MIDPOINT: f64 = 0.5;

/// Extent of the data, for gridlines and axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AxisBounds {
    pub min_year: i32,
    pub max_year: i32,
    pub min_value: f64,
    pub max_value: f64,
}

impl AxisBounds {
    pub fn year_range(&self) -> i64 {
        i64::from(self.max_year) - i64::from(self.min_year)
    }

    /// May be infinite when the bounds span more than `f64::MAX`.
    pub fn value_range(&self) -> f64 {
        self.max_value - self.min_value
    }

    /// Half of the value range, finite for any finite bounds.
    fn half_value_range(&self) -> f64 {
        self.max_value / 2.0 - self.min_value / 2.0
    }

    fn x_frac(&self, year: i32) -> f64 {
        let range = self.year_range();
        if range == 0 {
            MIDPOINT
        } else {
            (f64::from(year) - f64::from(self.min_year)) / range as f64
        }
    }

    fn y_frac(&self, value: f64) -> f64 {
        let half_range = self.half_value_range();
        if half_range == 0.0 {
            MIDPOINT
        } else {
            (value / 2.0 - self.min_value / 2.0) / half_range
        }
    }

    /// `count` evenly spaced gridline values, top (max) first.
    ///
    /// A single tick sits at the minimum; zero ticks gives an empty list.
    pub fn value_ticks(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![self.min_value],
            _ => {
                let steps = (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        let t = (steps - i as f64) / steps;
                        2.0 * (self.min_value / 2.0 + self.half_value_range() * t)
                    })
                    .collect()
            }
        }
    }
}

/// Normalized position of one value, before any pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotCoord {
    pub x_frac: f64,
    pub y_frac: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledPoint {
    pub year: i32,
    /// Only series with a finite value at this year appear here.
    pub series: BTreeMap<String, PlotCoord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartLayout {
    pub points: Vec<ScaledPoint>,
    pub bounds: AxisBounds,
}

impl ChartLayout {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Coordinate of `series` at `year`, if it was plotted.
    pub fn coord(&self, year: i32, series: &str) -> Option<PlotCoord> {
        self.points
            .iter()
            .find(|point| point.year == year)
            .and_then(|point| point.series.get(series).copied())
    }
}

/// Scales `points` for the named series onto a shared unit square.
///
/// `points` is expected in ascending year order and is emitted in the same
/// order; nothing is sorted here. Missing or non-finite values are skipped both
/// for the bounds and for the output.
pub fn scale_trend<S: AsRef<str>>(points: &[TrendPoint], series_names: &[S]) -> ChartLayout {
    let Some(bounds) = compute_bounds(points, series_names) else {
        return ChartLayout::default();
    };

    let scaled = points
        .iter()
        .map(|point| {
            let x_frac = bounds.x_frac(point.year);
            let series = series_names
                .iter()
                .filter_map(|name| {
                    let name = name.as_ref();
                    let value = point.value(name).filter(|v| v.is_finite())?;
                    Some((
                        name.to_string(),
                        PlotCoord {
                            x_frac,
                            y_frac: bounds.y_frac(value),
                        },
                    ))
                })
                .collect();
            ScaledPoint {
                year: point.year,
                series,
            }
        })
        .collect();

    debug!(
        points = points.len(),
        series = series_names.len(),
        min_year = bounds.min_year,
        max_year = bounds.max_year,
        min_value = bounds.min_value,
        max_value = bounds.max_value,
        "scaled trend chart"
    );

    ChartLayout {
        points: scaled,
        bounds,
    }
}

fn compute_bounds<S: AsRef<str>>(points: &[TrendPoint], series_names: &[S]) -> Option<AxisBounds> {
    let first = points.first()?;
    let (min_year, max_year) = points
        .iter()
        .fold((first.year, first.year), |(lo, hi), point| {
            (lo.min(point.year), hi.max(point.year))
        });

    let values = points.iter().flat_map(move |point| {
        series_names
            .iter()
            .filter_map(move |name| point.value(name.as_ref()))
            .filter(|value| value.is_finite())
    });
    let (min_value, max_value) = values
        .fold(None, |acc: Option<(f64, f64)>, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
        .unwrap_or((0.0, 0.0));

    Some(AxisBounds {
        min_year,
        max_year,
        min_value,
        max_value,
    })
}

/// Year label positioned on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearLabel {
    pub year: i32,
    pub x_frac: f64,
}

/// Every `step`-th point gets a year label, starting with the first. A `step`
/// of zero is treated as one.
pub fn year_labels(layout: &ChartLayout, step: usize) -> Vec<YearLabel> {
    layout
        .points
        .iter()
        .step_by(step.max(1))
        .map(|point| YearLabel {
            year: point.year,
            x_frac: layout.bounds.x_frac(point.year),
        })
        .collect()
}

/// Space left under the plot for x-axis labels.
const BASELINE_INSET: f64 = 60.0;
/// Vertical room the points actually use (keeps the top dot inside the frame).
const SPAN_INSET: f64 = 80.0;

/// Screen geometry of the plot, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub height: f64,
}

impl Default for PlotArea {
    fn default() -> Self {
        Self { height: 200.0 }
    }
}

/// A coordinate ready for absolute positioning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelPoint {
    /// Horizontal offset as a percentage of the plot width.
    pub left_percent: f64,
    /// Pixels from the top edge.
    pub top: f64,
}

impl PlotArea {
    pub fn new(height: f64) -> Self {
        Self { height }
    }

    /// Pixel row of `y_frac == 0`.
    pub fn baseline(&self) -> f64 {
        (self.height - BASELINE_INSET).max(0.0)
    }

    pub fn span(&self) -> f64 {
        (self.height - SPAN_INSET).max(0.0)
    }

    /// Inverts the vertical axis: larger `y_frac` means closer to the top.
    pub fn project(&self, coord: PlotCoord) -> PixelPoint {
        PixelPoint {
            left_percent: coord.x_frac * 100.0,
            top: self.baseline() - coord.y_frac * self.span(),
        }
    }

    /// Pixel rows of `count` evenly spaced gridlines, top first.
    pub fn gridlines(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![0.0],
            _ => {
                let steps = (count - 1) as f64;
                (0..count)
                    .map(|i| i as f64 * self.baseline() / steps)
                    .collect()
            }
        }
    }
}
