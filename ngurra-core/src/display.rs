//! Shared lookup tables mapping status-like enums to how cards draw them.
//!
//! Every enum owns exactly one table; screens never branch on variants to
//! pick a colour or icon.

use serde::Serialize;

use crate::model::{
    Impact, InsightKind, InterventionStatus, LoadLevel, MetricTrend, Priority, ProgramStatus,
    RiskLevel, ServiceStatus, Trend,
};

const GREEN: &str = "#10B981";
const AMBER: &str = "#F59E0B";
const ORANGE: &str = "#F97316";
const RED: &str = "#EF4444";
const BLUE: &str = "#3B82F6";
const PURPLE: &str = "#8B5CF6";
const GRAY: &str = "#6B7280";

const GREEN_TINT: &str = "#D1FAE5";
const AMBER_TINT: &str = "#FFFBEB";
const ORANGE_TINT: &str = "#FFEDD5";
const RED_TINT: &str = "#FEF2F2";
const BLUE_TINT: &str = "#DBEAFE";
const PURPLE_TINT: &str = "#EDE9FE";
const GRAY_TINT: &str = "#F3F4F6";

/// How a variant is drawn: text, accent colour, light background and icon name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub color: &'static str,
    pub tint: &'static str,
    pub icon: &'static str,
}

const fn badge(
    label: &'static str,
    color: &'static str,
    tint: &'static str,
    icon: &'static str,
) -> Badge {
    Badge {
        label,
        color,
        tint,
        icon,
    }
}

/// Used when a table has no row for a variant.
pub const FALLBACK_BADGE: Badge = badge("Unknown", GRAY, GRAY_TINT, "help-circle");

/// An enum with a display table.
pub trait Presentable: Copy + PartialEq + 'static {
    const TABLE: &'static [(Self, Badge)];

    fn badge(self) -> Badge {
        Self::TABLE
            .iter()
            .find(|(variant, _)| *variant == self)
            .map(|(_, badge)| *badge)
            .unwrap_or(FALLBACK_BADGE)
    }
}

impl Presentable for Trend {
    const TABLE: &'static [(Self, Badge)] = &[
        (Trend::Improving, badge("Improving", GREEN, GREEN_TINT, "trending-up")),
        (Trend::Worsening, badge("Worsening", RED, RED_TINT, "trending-down")),
        (Trend::Stable, badge("Stable", AMBER, AMBER_TINT, "remove")),
    ];
}

impl Presentable for Priority {
    const TABLE: &'static [(Self, Badge)] = &[
        (Priority::Low, badge("Low", GREEN, GREEN_TINT, "checkmark-circle")),
        (Priority::Medium, badge("Medium", AMBER, AMBER_TINT, "information-circle")),
        (Priority::High, badge("High", ORANGE, ORANGE_TINT, "alert-circle")),
        (Priority::Critical, badge("Critical", RED, RED_TINT, "warning")),
    ];
}

impl Presentable for RiskLevel {
    const TABLE: &'static [(Self, Badge)] = &[
        (RiskLevel::Low, badge("Low", GREEN, GREEN_TINT, "shield-checkmark")),
        (RiskLevel::Moderate, badge("Moderate", AMBER, AMBER_TINT, "shield-half")),
        (RiskLevel::High, badge("High", ORANGE, ORANGE_TINT, "shield")),
        (RiskLevel::Severe, badge("Severe", RED, RED_TINT, "alert")),
    ];
}

impl Presentable for LoadLevel {
    const TABLE: &'static [(Self, Badge)] = &[
        (LoadLevel::Low, badge("Low", GREEN, GREEN_TINT, "speedometer")),
        (LoadLevel::Moderate, badge("Moderate", AMBER, AMBER_TINT, "speedometer")),
        (LoadLevel::High, badge("High", ORANGE, ORANGE_TINT, "speedometer")),
        (LoadLevel::Critical, badge("Critical", RED, RED_TINT, "speedometer")),
    ];
}

impl Presentable for ProgramStatus {
    const TABLE: &'static [(Self, Badge)] = &[
        (ProgramStatus::Active, badge("Active", GREEN, GREEN_TINT, "checkmark-circle")),
        (ProgramStatus::Urgent, badge("Urgent", RED, RED_TINT, "warning")),
        (ProgramStatus::Planning, badge("Planning", BLUE, BLUE_TINT, "time")),
        (ProgramStatus::Completed, badge("Completed", GREEN, GREEN_TINT, "checkmark-done")),
        (ProgramStatus::Paused, badge("Paused", RED, RED_TINT, "pause")),
    ];
}

impl Presentable for InterventionStatus {
    const TABLE: &'static [(Self, Badge)] = &[
        (InterventionStatus::Active, badge("Active", "#065F46", GREEN_TINT, "checkmark-circle")),
        (InterventionStatus::Planning, badge("Planning", "#1E40AF", BLUE_TINT, "time")),
        (
            InterventionStatus::Completed,
            badge("Completed", "#065F46", GREEN_TINT, "checkmark-done"),
        ),
        (InterventionStatus::Paused, badge("Paused", "#991B1B", "#FEE2E2", "pause")),
    ];
}

impl Presentable for ServiceStatus {
    const TABLE: &'static [(Self, Badge)] = &[
        (ServiceStatus::Available, badge("Available", GREEN, GREEN_TINT, "checkmark-circle")),
        (ServiceStatus::Limited, badge("Limited", AMBER, AMBER_TINT, "time")),
        (ServiceStatus::Urgent, badge("Urgent", RED, RED_TINT, "warning")),
    ];
}

impl Presentable for InsightKind {
    const TABLE: &'static [(Self, Badge)] = &[
        (InsightKind::Critical, badge("Critical", RED, RED_TINT, "warning")),
        (InsightKind::Opportunity, badge("Opportunity", GREEN, GREEN_TINT, "trending-up")),
        (InsightKind::Trend, badge("Trend", AMBER, AMBER_TINT, "analytics")),
        (InsightKind::Recommendation, badge("Recommendation", PURPLE, PURPLE_TINT, "bulb")),
    ];
}

impl Presentable for Impact {
    const TABLE: &'static [(Self, Badge)] = &[
        (Impact::High, badge("High impact", RED, RED_TINT, "flash")),
        (Impact::Medium, badge("Medium impact", AMBER, AMBER_TINT, "flash")),
        (Impact::Low, badge("Low impact", GREEN, GREEN_TINT, "flash")),
    ];
}

impl Presentable for MetricTrend {
    const TABLE: &'static [(Self, Badge)] = &[
        (MetricTrend::Up, badge("Up", GREEN, GREEN_TINT, "trending-up")),
        (MetricTrend::Down, badge("Down", RED, RED_TINT, "trending-down")),
        (MetricTrend::Stable, badge("Stable", GRAY, GRAY_TINT, "remove")),
    ];
}

/// Progress bar colours, highest threshold first.
pub const PROGRESS_BANDS: [(u8, &str); 4] = [(75, GREEN), (50, AMBER), (25, ORANGE), (0, RED)];

pub fn progress_color(progress_percent: u8) -> &'static str {
    PROGRESS_BANDS
        .iter()
        .find(|(threshold, _)| progress_percent >= *threshold)
        .map(|(_, color)| *color)
        .unwrap_or(RED)
}

/// Label and colour of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesStyle {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

pub const SERIES_STYLES: [SeriesStyle; 3] = [
    SeriesStyle {
        key: "lifeExpectancy",
        label: "Life Expectancy",
        color: PURPLE,
    },
    SeriesStyle {
        key: "education",
        label: "Education",
        color: "#06B6D4",
    },
    SeriesStyle {
        key: "employment",
        label: "Employment",
        color: GREEN,
    },
];

/// Style for `key`, or a grey style labelled with the key itself.
pub fn series_style(key: &str) -> SeriesStyle {
    SERIES_STYLES
        .iter()
        .find(|style| style.key == key)
        .copied()
        .unwrap_or(SeriesStyle {
            key: "",
            label: "Series",
            color: GRAY,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers<T: Presentable + std::fmt::Debug>(all: &[T]) {
        assert_eq!(T::TABLE.len(), all.len());
        for variant in all {
            let rows = T::TABLE.iter().filter(|(v, _)| v == variant).count();
            assert_eq!(rows, 1, "{variant:?} should have exactly one row");
            assert_ne!(variant.badge(), FALLBACK_BADGE);
        }
    }

    #[test]
    fn every_variant_has_one_row() {
        assert_covers(&Trend::ALL);
        assert_covers(&Priority::ALL);
        assert_covers(&RiskLevel::ALL);
        assert_covers(&LoadLevel::ALL);
        assert_covers(&ProgramStatus::ALL);
        assert_covers(&InterventionStatus::ALL);
        assert_covers(&ServiceStatus::ALL);
        assert_covers(&InsightKind::ALL);
        assert_covers(&Impact::ALL);
        assert_covers(&MetricTrend::ALL);
    }

    #[test]
    fn trend_and_priority_colours() {
        assert_eq!(Trend::Worsening.badge().color, RED);
        assert_eq!(Trend::Improving.badge().icon, "trending-up");
        assert_eq!(Priority::High.badge().color, ORANGE);
        assert_eq!(ServiceStatus::Limited.badge().color, AMBER);
    }

    #[test]
    fn progress_bands() {
        assert_eq!(progress_color(100), GREEN);
        assert_eq!(progress_color(75), GREEN);
        assert_eq!(progress_color(74), AMBER);
        assert_eq!(progress_color(50), AMBER);
        assert_eq!(progress_color(25), ORANGE);
        assert_eq!(progress_color(24), RED);
        assert_eq!(progress_color(0), RED);
    }

    #[test]
    fn unknown_series_falls_back_to_grey() {
        assert_eq!(series_style("education").label, "Education");
        assert_eq!(series_style("income").color, GRAY);
    }
}
