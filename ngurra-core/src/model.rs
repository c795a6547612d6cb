//! Domain records for the dashboards. All of them are read-only sample data.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction a health measure is moving in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
}

impl Trend {
    pub const ALL: [Trend; 3] = [Trend::Improving, Trend::Worsening, Trend::Stable];
}

/// Priority of a measure, alert or intervention reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];
}

/// Population risk attached to a measure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Severe,
    ];
}

/// Load on a service, also used as the risk of a tracked intervention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LoadLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl LoadLevel {
    pub const ALL: [LoadLevel; 4] = [
        LoadLevel::Low,
        LoadLevel::Moderate,
        LoadLevel::High,
        LoadLevel::Critical,
    ];
}

/// Status of a program referenced from a measure card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
    Active,
    Urgent,
    Planning,
    Completed,
    Paused,
}

impl ProgramStatus {
    pub const ALL: [ProgramStatus; 5] = [
        ProgramStatus::Active,
        ProgramStatus::Urgent,
        ProgramStatus::Planning,
        ProgramStatus::Completed,
        ProgramStatus::Paused,
    ];
}

/// Lifecycle of a tracked intervention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    Active,
    Planning,
    Completed,
    Paused,
}

impl InterventionStatus {
    pub const ALL: [InterventionStatus; 4] = [
        InterventionStatus::Active,
        InterventionStatus::Planning,
        InterventionStatus::Completed,
        InterventionStatus::Paused,
    ];
}

/// Availability of a service provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Available,
    Limited,
    Urgent,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 3] = [
        ServiceStatus::Available,
        ServiceStatus::Limited,
        ServiceStatus::Urgent,
    ];
}

/// Category of an AI insight card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Critical,
    Opportunity,
    Trend,
    Recommendation,
}

impl InsightKind {
    pub const ALL: [InsightKind; 4] = [
        InsightKind::Critical,
        InsightKind::Opportunity,
        InsightKind::Trend,
        InsightKind::Recommendation,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub const ALL: [Impact; 3] = [Impact::High, Impact::Medium, Impact::Low];
}

/// Arrow shown on a dashboard key metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricTrend {
    Up,
    Down,
    Stable,
}

impl MetricTrend {
    pub const ALL: [MetricTrend; 3] = [MetricTrend::Up, MetricTrend::Down, MetricTrend::Stable];
}

/// Unit a measure's values are expressed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeasureUnit {
    Years,
    #[default]
    Percent,
}

impl MeasureUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            MeasureUnit::Years => " years",
            MeasureUnit::Percent => "%",
        }
    }
}

/// A tracked health indicator comparing Indigenous and non-Indigenous values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub id: u32,
    pub measure_name: String,
    pub indigenous_value: f64,
    pub non_indigenous_value: f64,
    /// `indigenous_value - non_indigenous_value`; negative when the Indigenous value is lower.
    pub gap: f64,
    pub trend: Trend,
    pub priority: Priority,
    pub risk_level: RiskLevel,
    pub affected_population: u64,
    #[serde(default)]
    pub unit: MeasureUnit,
    #[serde(default)]
    pub interventions: Vec<InterventionRef>,
}

impl Measure {
    /// Gap recomputed from the two population values.
    pub fn computed_gap(&self) -> f64 {
        self.indigenous_value - self.non_indigenous_value
    }

    /// Whether the stored gap agrees with the values within `tolerance`.
    pub fn gap_is_consistent(&self, tolerance: f64) -> bool {
        (self.gap - self.computed_gap()).abs() <= tolerance
    }

    /// Gap as shown on the service-matching sheet, e.g. `8.6 years`.
    pub fn gap_label(&self) -> String {
        format!("{}{}", self.gap.abs(), self.unit.suffix())
    }
}

/// A program listed under a measure card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterventionRef {
    pub id: u32,
    pub name: String,
    pub status: ProgramStatus,
    pub progress_percent: u8,
    pub participants: u32,
    pub urgency: Priority,
}

/// A tracked program or initiative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    pub id: u32,
    pub name: String,
    pub community: String,
    pub start_date: NaiveDate,
    pub status: InterventionStatus,
    pub progress_percent: u8,
    pub participants: u32,
    #[serde(default)]
    pub completion_rate: Option<u8>,
    #[serde(default)]
    pub outcomes: BTreeMap<String, u32>,
    #[serde(default)]
    pub connected_services: Vec<String>,
    #[serde(default)]
    pub next_milestone: Option<NaiveDate>,
    #[serde(default)]
    pub risk_level: Option<LoadLevel>,
}

/// A health-service provider entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub service_type: String,
    #[serde(default)]
    pub coverage: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub phone: String,
    pub capacity_percent: u8,
    pub available_slots: u32,
    pub wait_time: String,
    pub cultural_score_percent: u8,
    pub response_time: String,
    pub success_rate_percent: u8,
    pub current_load: LoadLevel,
    pub status: ServiceStatus,
}

/// A critical alert on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub action: String,
}

/// An "AI" insight card. The confidence is display data, nothing computes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    pub id: String,
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub confidence_percent: u8,
    pub impact: Impact,
    pub timeframe: String,
    #[serde(default)]
    pub related_interventions: Vec<String>,
    pub actionable: bool,
}

/// A static completion forecast shown in the predictions view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub intervention: String,
    pub current_progress: u8,
    pub predicted_completion: u8,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Headline figure on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetric {
    pub id: u32,
    pub title: String,
    pub value: String,
    pub subtitle: String,
    pub icon: String,
    pub accent: String,
    pub trend: MetricTrend,
}

/// External reference link on the about screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuickLink {
    pub title: String,
    pub subtitle: String,
    pub url: String,
    pub icon: String,
}

/// One year of observations across the chart series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TrendPoint {
    pub year: i32,
    pub measures: BTreeMap<String, f64>,
}

impl TrendPoint {
    pub fn new<I, K>(year: i32, measures: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            year,
            measures: measures.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn value(&self, series: &str) -> Option<f64> {
        self.measures.get(series).copied()
    }
}

/// Every collection the screens draw from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub key_metrics: Vec<KeyMetric>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    pub measures: Vec<Measure>,
    pub interventions: Vec<Intervention>,
    pub services: Vec<Service>,
    #[serde(default)]
    pub insights: Vec<AiInsight>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub trend_series: Vec<String>,
    pub trend: Vec<TrendPoint>,
    #[serde(default)]
    pub links: Vec<QuickLink>,
}

impl Dataset {
    /// Puts the trend points in ascending year order; the chart engine relies on it.
    pub fn normalized(mut self) -> Self {
        self.trend.sort_by_key(|point| point.year);
        self
    }

    pub fn measure(&self, id: u32) -> Option<&Measure> {
        self.measures.iter().find(|measure| measure.id == id)
    }

    pub fn intervention(&self, id: u32) -> Option<&Intervention> {
        self.interventions.iter().find(|item| item.id == id)
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure(indigenous: f64, non_indigenous: f64, gap: f64) -> Measure {
        Measure {
            id: 1,
            measure_name: "Life Expectancy".into(),
            indigenous_value: indigenous,
            non_indigenous_value: non_indigenous,
            gap,
            trend: Trend::Improving,
            priority: Priority::High,
            risk_level: RiskLevel::Moderate,
            affected_population: 81_000,
            unit: MeasureUnit::Years,
            interventions: Vec::new(),
        }
    }

    #[test]
    fn gap_sign_follows_indigenous_minus_non_indigenous() {
        let m = measure(71.6, 80.2, -8.6);
        assert!(m.computed_gap() < 0.0);
        assert!(m.gap_is_consistent(1e-9));
        assert_eq!(m.gap_label(), "8.6 years");
    }

    #[test]
    fn inconsistent_gap_is_detected() {
        assert!(!measure(8.4, 4.2, -4.2).gap_is_consistent(1e-9));
    }

    #[test]
    fn normalized_sorts_trend_by_year() {
        let dataset = Dataset {
            trend: vec![
                TrendPoint::new(2020, [("education", 63.0)]),
                TrendPoint::new(2018, [("education", 60.0)]),
            ],
            ..Dataset::default()
        }
        .normalized();

        let years: Vec<i32> = dataset.trend.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2018, 2020]);
    }

    #[test]
    fn enums_use_snake_case_tags() {
        let json = serde_json::to_string(&InterventionStatus::Planning).unwrap();
        assert_eq!(json, "\"planning\"");
        let load: LoadLevel = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(load, LoadLevel::Critical);
    }
}
