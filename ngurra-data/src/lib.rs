//! JSON to `Dataset` loader with validation, plus the compiled-in sample data.

use std::collections::HashSet;

use ngurra_core::stats::{
    insight_summary, intervention_stats, measure_summary, tab_counts, InsightSummary,
    InterventionStats, MeasureSummary,
};
use ngurra_core::{Dataset, GapError, Intervention, Service, ServiceStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Sample data shipped with the app.
pub const SAMPLE_DATASET_JSON: &str = include_str!("../data/sample_dataset.json");

/// Allowed drift between a measure's stored gap and its recomputed gap.
pub const GAP_TOLERANCE: f64 = 1e-9;

const REQUIRED_COLLECTIONS: [&str; 4] = ["measures", "interventions", "services", "trend"];

/// Loads the compiled-in sample dataset.
pub fn sample_dataset() -> Result<Dataset, GapError> {
    load_dataset_str(SAMPLE_DATASET_JSON)
}

/// Load a dataset from a JSON string.
pub fn load_dataset_str(dataset_json: &str) -> Result<Dataset, GapError> {
    let value: Value =
        serde_json::from_str(dataset_json).map_err(|err| GapError::Parse(err.to_string()))?;
    load_dataset_value(&value)
}

/// Load a dataset from a `serde_json::Value`.
///
/// Trend points come back sorted by year.
pub fn load_dataset_value(dataset: &Value) -> Result<Dataset, GapError> {
    let root = dataset.as_object().ok_or(GapError::MissingData)?;

    for key in REQUIRED_COLLECTIONS {
        if !root.get(key).is_some_and(Value::is_array) {
            warn!(collection = key, "dataset is missing a required collection");
            return Err(GapError::MissingData);
        }
    }

    let parsed: Dataset =
        Dataset::deserialize(dataset).map_err(|err| GapError::Parse(err.to_string()))?;
    let parsed = parsed.normalized();
    validate(&parsed)?;

    debug!(
        measures = parsed.measures.len(),
        interventions = parsed.interventions.len(),
        services = parsed.services.len(),
        trend_points = parsed.trend.len(),
        "dataset loaded"
    );
    Ok(parsed)
}

/// Checks the invariants serde cannot express.
pub fn validate(dataset: &Dataset) -> Result<(), GapError> {
    for measure in &dataset.measures {
        if !measure.gap_is_consistent(GAP_TOLERANCE) {
            return Err(invariant(format!(
                "measure {} ({}) has gap {} but values differ by {}",
                measure.id,
                measure.measure_name,
                measure.gap,
                measure.computed_gap()
            )));
        }
        for program in &measure.interventions {
            check_percent(&program.name, "progressPercent", program.progress_percent)?;
        }
    }

    validate_interventions(&dataset.interventions)?;
    validate_services(&dataset.services)?;

    for insight in &dataset.insights {
        check_percent(&insight.title, "confidencePercent", insight.confidence_percent)?;
    }

    for prediction in &dataset.predictions {
        check_percent(&prediction.intervention, "currentProgress", prediction.current_progress)?;
        check_percent(
            &prediction.intervention,
            "predictedCompletion",
            prediction.predicted_completion,
        )?;
    }

    check_unique("measure", dataset.measures.iter().map(|m| m.id.to_string()))?;

    for series in &dataset.trend_series {
        let present = dataset
            .trend
            .iter()
            .any(|point| point.measures.contains_key(series));
        if !present {
            return Err(invariant(format!(
                "trend series {series} has no values in any trend point"
            )));
        }
    }

    Ok(())
}

/// Percent and id checks for interventions handed over on their own.
pub fn validate_interventions(interventions: &[Intervention]) -> Result<(), GapError> {
    for item in interventions {
        check_percent(&item.name, "progressPercent", item.progress_percent)?;
        if let Some(rate) = item.completion_rate {
            check_percent(&item.name, "completionRate", rate)?;
        }
    }
    check_unique("intervention", interventions.iter().map(|i| i.id.to_string()))
}

/// Percent and id checks for services handed over on their own.
pub fn validate_services(services: &[Service]) -> Result<(), GapError> {
    for service in services {
        check_percent(&service.name, "capacityPercent", service.capacity_percent)?;
        check_percent(&service.name, "culturalScorePercent", service.cultural_score_percent)?;
        check_percent(&service.name, "successRatePercent", service.success_rate_percent)?;
    }
    check_unique("service", services.iter().map(|s| s.id.clone()))
}

fn check_percent(owner: &str, field: &str, value: u8) -> Result<(), GapError> {
    if value > 100 {
        return Err(invariant(format!("{owner}: {field} {value} is above 100")));
    }
    Ok(())
}

fn check_unique<I>(kind: &str, ids: I) -> Result<(), GapError>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.clone()) {
            return Err(invariant(format!("duplicate {kind} id {id}")));
        }
    }
    Ok(())
}

fn invariant(message: String) -> GapError {
    warn!(%message, "dataset rejected");
    GapError::Invariant(message)
}

/// Everything the summary strips across the screens display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub interventions: InterventionStats,
    pub tabs: Vec<TabCount>,
    pub measures: MeasureSummary,
    pub insights: InsightSummary,
    pub critical_alerts: usize,
    pub services_total: usize,
    pub services_available: usize,
    pub open_slots: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabCount {
    pub tab: &'static str,
    pub count: usize,
}

pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    let tabs = tab_counts(&dataset.interventions)
        .into_iter()
        .map(|(tab, count)| TabCount {
            tab: tab.option().id,
            count,
        })
        .collect();

    DatasetSummary {
        interventions: intervention_stats(&dataset.interventions),
        tabs,
        measures: measure_summary(&dataset.measures),
        insights: insight_summary(&dataset.insights),
        critical_alerts: dataset
            .alerts
            .iter()
            .filter(|alert| alert.priority == ngurra_core::Priority::Critical)
            .count(),
        services_total: dataset.services.len(),
        services_available: dataset
            .services
            .iter()
            .filter(|service| service.status == ServiceStatus::Available)
            .count(),
        open_slots: dataset
            .services
            .iter()
            .map(|service| u64::from(service.available_slots))
            .sum(),
    }
}
