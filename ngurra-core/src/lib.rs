//! Core logic behind the NgurraHub health-outcome dashboards.
//!
//! Everything here is a pure function over in-memory sample data, except for
//! [`schedule`], which drives the simulated refresh/analysis delays on tokio.

use serde::{Deserialize, Serialize};

pub mod chart;
pub mod display;
pub mod filter;
pub mod link;
pub mod model;
pub mod schedule;
pub mod screen;
pub mod stats;

pub use chart::{scale_trend, AxisBounds, ChartLayout, PlotArea, PlotCoord, ScaledPoint};
pub use filter::{filter_services, matches_filter, matches_search, Searchable, ServiceFilter};
pub use model::*;
pub use stats::{intervention_stats, InterventionStats};

/// Tunables for the dashboard screens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Delay (ms) of the simulated data refresh.
    pub refresh_delay_ms: u64,
    /// Delay (ms) of the simulated AI analysis run.
    pub analysis_delay_ms: u64,
    /// Height of the trend chart in layout pixels.
    pub chart_height: f64,
    /// Number of horizontal gridlines on the trend chart.
    pub value_tick_count: usize,
    /// Label every n-th year on the x axis.
    pub year_label_step: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: 2_000,
            analysis_delay_ms: 3_000,
            chart_height: 200.0,
            value_tick_count: 5,
            year_label_step: 2,
        }
    }
}

/// Errors shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum GapError {
    #[error("input is missing required data")]
    MissingData,
    #[error("could not read data: {0}")]
    Parse(String),
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
    #[error("unable to open link: {0}")]
    UnhandledLink(String),
    #[error("other error: {0}")]
    Other(String),
}

/// Builds an empty dataset (handy for mocks and tests).
pub fn empty_dataset() -> Dataset {
    Dataset::default()
}
