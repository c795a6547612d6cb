//! Summary figures derived from the sample collections.

use serde::Serialize;

use crate::filter::InterventionTab;
use crate::model::{AiInsight, Intervention, InterventionStatus, Measure, Priority};

/// Numbers on the tracking screen's stat strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InterventionStats {
    pub active_count: usize,
    pub total_participants: u64,
    /// Mean progress rounded half-up; `None` when there are no interventions.
    pub average_progress: Option<u32>,
}

pub fn intervention_stats(interventions: &[Intervention]) -> InterventionStats {
    InterventionStats {
        active_count: interventions
            .iter()
            .filter(|item| item.status == InterventionStatus::Active)
            .count(),
        total_participants: interventions
            .iter()
            .map(|item| u64::from(item.participants))
            .sum(),
        average_progress: rounded_mean(interventions.iter().map(|item| item.progress_percent)),
    }
}

/// Mean of integer percentages, rounded half-up without going through floats.
pub fn rounded_mean<I>(values: I) -> Option<u32>
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), value| {
            (sum + u64::from(value), count + 1)
        });
    if count == 0 {
        return None;
    }
    // floor(sum / count + 1/2) == floor((2 * sum + count) / (2 * count))
    u32::try_from((2 * sum + count) / (2 * count)).ok()
}

/// Badge counts for the tracking tabs, in table order.
pub fn tab_counts(interventions: &[Intervention]) -> Vec<(InterventionTab, usize)> {
    InterventionTab::ALL
        .iter()
        .map(|tab| {
            let count = interventions.iter().filter(|item| tab.includes(item)).count();
            (*tab, count)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureSummary {
    pub critical_count: usize,
    pub total_affected_population: u64,
    /// Id of the measure with the largest absolute gap.
    pub widest_gap: Option<u32>,
}

pub fn measure_summary(measures: &[Measure]) -> MeasureSummary {
    let widest_gap = measures
        .iter()
        .filter(|measure| measure.gap.is_finite())
        .max_by(|a, b| a.gap.abs().total_cmp(&b.gap.abs()))
        .map(|measure| measure.id);

    MeasureSummary {
        critical_count: measures
            .iter()
            .filter(|measure| measure.priority == Priority::Critical)
            .count(),
        total_affected_population: measures
            .iter()
            .map(|measure| measure.affected_population)
            .sum(),
        widest_gap,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSummary {
    pub total: usize,
    pub actionable: usize,
    pub average_confidence: Option<u32>,
}

pub fn insight_summary(insights: &[AiInsight]) -> InsightSummary {
    InsightSummary {
        total: insights.len(),
        actionable: insights.iter().filter(|insight| insight.actionable).count(),
        average_confidence: rounded_mean(insights.iter().map(|insight| insight.confidence_percent)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::model::{Impact, InsightKind, MeasureUnit, RiskLevel, Trend};

    fn intervention(id: u32, status: InterventionStatus, progress: u8, participants: u32) -> Intervention {
        Intervention {
            id,
            name: format!("Program {id}"),
            community: "Katherine".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status,
            progress_percent: progress,
            participants,
            completion_rate: None,
            outcomes: BTreeMap::new(),
            connected_services: Vec::new(),
            next_milestone: None,
            risk_level: None,
        }
    }

    fn sample() -> Vec<Intervention> {
        vec![
            intervention(1, InterventionStatus::Active, 68, 145),
            intervention(2, InterventionStatus::Active, 85, 32),
            intervention(3, InterventionStatus::Active, 45, 67),
            intervention(4, InterventionStatus::Planning, 15, 12),
        ]
    }

    #[test]
    fn tracking_stats_for_sample_programs() {
        let stats = intervention_stats(&sample());
        assert_eq!(stats.active_count, 3);
        assert_eq!(stats.total_participants, 256);
        assert_eq!(stats.average_progress, Some(53));
    }

    #[test]
    fn empty_collection_has_no_average() {
        let stats = intervention_stats(&[]);
        assert_eq!(stats, InterventionStats::default());
        assert_eq!(stats.average_progress, None);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(rounded_mean([50, 51]), Some(51));
        assert_eq!(rounded_mean([1, 2, 2, 2]), Some(2));
        assert_eq!(rounded_mean([0, 1, 1, 1]), Some(1));
        assert_eq!(rounded_mean([100]), Some(100));
    }

    #[test]
    fn tab_counts_follow_table_order() {
        let counts = tab_counts(&sample());
        assert_eq!(
            counts,
            vec![
                (InterventionTab::Active, 3),
                (InterventionTab::Planning, 1),
                (InterventionTab::Completed, 0),
                (InterventionTab::All, 4),
            ]
        );
    }

    #[test]
    fn measure_summary_picks_widest_gap() {
        let make = |id: u32, gap: f64, priority: Priority, population: u64| Measure {
            id,
            measure_name: format!("Measure {id}"),
            indigenous_value: gap,
            non_indigenous_value: 0.0,
            gap,
            trend: Trend::Stable,
            priority,
            risk_level: RiskLevel::High,
            affected_population: population,
            unit: MeasureUnit::Percent,
            interventions: Vec::new(),
        };
        let summary = measure_summary(&[
            make(1, -8.6, Priority::High, 81_000),
            make(2, 4.2, Priority::Critical, 39_648),
        ]);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.total_affected_population, 120_648);
        assert_eq!(summary.widest_gap, Some(1));
        assert_eq!(measure_summary(&[]).widest_gap, None);
    }

    #[test]
    fn insight_summary_counts_actionable() {
        let make = |confidence: u8, actionable: bool| AiInsight {
            id: confidence.to_string(),
            kind: InsightKind::Trend,
            title: String::new(),
            description: String::new(),
            confidence_percent: confidence,
            impact: Impact::Medium,
            timeframe: String::new(),
            related_interventions: Vec::new(),
            actionable,
        };
        let summary = insight_summary(&[make(92, true), make(88, true), make(76, false), make(84, true)]);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.actionable, 3);
        assert_eq!(summary.average_confidence, Some(85));
    }
}
