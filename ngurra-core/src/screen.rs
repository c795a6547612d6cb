//! Local state of each screen, kept as enums so that two modals can never be
//! open at once and a modal never shows without its subject.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filter::{filter_interventions, filter_services, InterventionTab, ServiceFilter};
use crate::model::{Dataset, Intervention, Measure, Service};
use crate::schedule::{MockAction, ScheduledTask, TaskState};
use crate::DashboardConfig;

/// Bottom tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppTab {
    #[default]
    Dashboard,
    Health,
    Services,
    Tracking,
    About,
}

impl AppTab {
    pub const ALL: [AppTab; 5] = [
        AppTab::Dashboard,
        AppTab::Health,
        AppTab::Services,
        AppTab::Tracking,
        AppTab::About,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AppTab::Dashboard => "Dashboard",
            AppTab::Health => "Health",
            AppTab::Services => "Services",
            AppTab::Tracking => "Tracking",
            AppTab::About => "About",
        }
    }
}

/// Dashboard: only the refresh spinner.
#[derive(Debug, Default)]
pub struct DashboardView {
    refresh: Option<ScheduledTask>,
}

impl DashboardView {
    /// Starts the simulated refresh. Refused while one is already pending.
    pub fn start_refresh<F>(&mut self, config: &DashboardConfig, on_done: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.refresh_state().is_busy() {
            return false;
        }
        self.refresh = Some(MockAction::Refresh.start(config, on_done));
        true
    }

    pub fn refresh_state(&self) -> TaskState {
        self.refresh
            .as_ref()
            .map_or(TaskState::Idle, ScheduledTask::state)
    }

    /// Cancels a pending refresh. Returns whether one was pending.
    pub fn leave(&mut self) -> bool {
        self.refresh.as_ref().is_some_and(ScheduledTask::cancel)
    }

    /// Hands the last refresh over, e.g. to await it.
    pub fn take_refresh(&mut self) -> Option<ScheduledTask> {
        self.refresh.take()
    }
}

/// Sheet on the health-outcomes screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthModal {
    /// Service matching for one measure.
    ServiceMatch { measure_id: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthView {
    pub modal: Option<HealthModal>,
}

impl HealthView {
    pub fn open_service_match(&mut self, measure: &Measure) {
        self.modal = Some(HealthModal::ServiceMatch {
            measure_id: measure.id,
        });
    }

    pub fn close(&mut self) {
        self.modal = None;
    }

    /// Measure the open sheet is about.
    pub fn selected<'a>(&self, dataset: &'a Dataset) -> Option<&'a Measure> {
        match self.modal? {
            HealthModal::ServiceMatch { measure_id } => dataset.measure(measure_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServicesView {
    pub query: String,
    pub filter: ServiceFilter,
}

impl ServicesView {
    pub fn visible<'a>(&self, services: &'a [Service]) -> Vec<&'a Service> {
        filter_services(services, &self.query, self.filter)
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.filter = ServiceFilter::All;
    }
}

/// Views inside the AI analysis sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisCategory {
    #[default]
    Overview,
    Insights,
    Predictions,
    Recommendations,
}

impl AnalysisCategory {
    pub fn label(self) -> &'static str {
        match self {
            AnalysisCategory::Overview => "Overview",
            AnalysisCategory::Insights => "Insights",
            AnalysisCategory::Predictions => "Predictions",
            AnalysisCategory::Recommendations => "Actions",
        }
    }
}

#[derive(Debug, Default)]
pub struct AnalysisView {
    pub category: AnalysisCategory,
    run: Option<ScheduledTask>,
}

impl AnalysisView {
    pub fn run_state(&self) -> TaskState {
        self.run.as_ref().map_or(TaskState::Idle, ScheduledTask::state)
    }

    fn cancel(&self) -> bool {
        self.run.as_ref().is_some_and(ScheduledTask::cancel)
    }
}

#[derive(Debug)]
pub enum TrackingModal {
    AiAnalysis(AnalysisView),
}

#[derive(Debug, Default)]
pub struct TrackingView {
    pub tab: InterventionTab,
    pub modal: Option<TrackingModal>,
}

impl TrackingView {
    pub fn select_tab(&mut self, tab: InterventionTab) {
        self.tab = tab;
    }

    pub fn open_analysis(&mut self) {
        self.close();
        self.modal = Some(TrackingModal::AiAnalysis(AnalysisView::default()));
    }

    /// Starts the simulated analysis in the open sheet.
    ///
    /// Refused when no sheet is open or a run is already pending.
    pub fn run_analysis<F>(&mut self, config: &DashboardConfig, on_done: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match &mut self.modal {
            Some(TrackingModal::AiAnalysis(view)) if !view.run_state().is_busy() => {
                view.run = Some(MockAction::Analysis.start(config, on_done));
                true
            }
            _ => false,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisView> {
        match &self.modal {
            Some(TrackingModal::AiAnalysis(view)) => Some(view),
            None => None,
        }
    }

    /// Closes the sheet, cancelling a pending run. Returns whether one was pending.
    pub fn close(&mut self) -> bool {
        match self.modal.take() {
            Some(TrackingModal::AiAnalysis(view)) => view.cancel(),
            None => false,
        }
    }

    /// Hands the open sheet's run over, e.g. to await it.
    pub fn take_analysis(&mut self) -> Option<ScheduledTask> {
        match &mut self.modal {
            Some(TrackingModal::AiAnalysis(view)) => view.run.take(),
            None => None,
        }
    }

    /// Switches the category of the open analysis sheet; no-op when closed.
    pub fn select_category(&mut self, category: AnalysisCategory) {
        if let Some(TrackingModal::AiAnalysis(view)) = &mut self.modal {
            view.category = category;
        }
    }

    pub fn visible<'a>(&self, interventions: &'a [Intervention]) -> Vec<&'a Intervention> {
        filter_interventions(interventions, self.tab)
    }
}

/// Collapsible sections on the about screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AboutSection {
    About,
    Features,
    Framework,
    DataSources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AboutView {
    pub expanded: Option<AboutSection>,
}

impl AboutView {
    /// Opens `section`, or collapses it when it is already the open one.
    pub fn toggle(&mut self, section: AboutSection) {
        self.expanded = if self.expanded == Some(section) {
            None
        } else {
            Some(section)
        };
    }
}

/// Every screen's state plus the selected tab.
#[derive(Debug, Default)]
pub struct AppState {
    pub tab: AppTab,
    pub dashboard: DashboardView,
    pub health: HealthView,
    pub services: ServicesView,
    pub tracking: TrackingView,
    pub about: AboutView,
}

impl AppState {
    /// Moves to `tab`. Leaving a screen closes its sheets and cancels its
    /// pending actions; returns whether anything was cancelled.
    pub fn select_tab(&mut self, tab: AppTab) -> bool {
        if tab == self.tab {
            return false;
        }
        let cancelled = match self.tab {
            AppTab::Dashboard => self.dashboard.leave(),
            AppTab::Health => {
                self.health.close();
                false
            }
            AppTab::Tracking => self.tracking.close(),
            AppTab::Services | AppTab::About => false,
        };
        debug!(from = self.tab.title(), to = tab.title(), cancelled, "tab changed");
        self.tab = tab;
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn about_toggle_keeps_one_section_open() {
        let mut view = AboutView::default();
        view.toggle(AboutSection::Features);
        assert_eq!(view.expanded, Some(AboutSection::Features));
        view.toggle(AboutSection::Framework);
        assert_eq!(view.expanded, Some(AboutSection::Framework));
        view.toggle(AboutSection::Framework);
        assert_eq!(view.expanded, None);
    }

    #[test]
    fn analysis_category_needs_an_open_sheet() {
        let mut view = TrackingView::default();
        view.select_category(AnalysisCategory::Predictions);
        assert!(view.modal.is_none());

        view.open_analysis();
        view.select_category(AnalysisCategory::Predictions);
        let sheet = view.analysis().expect("sheet is open");
        assert_eq!(sheet.category, AnalysisCategory::Predictions);
        assert_eq!(sheet.run_state(), TaskState::Idle);

        assert!(!view.close());
        assert!(view.modal.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_sheet_mid_run_cancels_the_analysis() {
        let config = DashboardConfig::default();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let mut view = TrackingView::default();
        assert!(!view.run_analysis(&config, || {}), "no sheet open");
        view.open_analysis();
        assert!(view.run_analysis(&config, move || flag.store(true, Ordering::SeqCst)));
        assert_eq!(view.analysis().unwrap().run_state(), TaskState::Pending);
        assert!(!view.run_analysis(&config, || {}), "already running");

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(view.close());
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(view.analysis().is_none());
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn analysis_resolves_while_the_sheet_stays_open() {
        let config = DashboardConfig::default();
        let mut view = TrackingView::default();
        view.open_analysis();
        assert!(view.run_analysis(&config, || {}));

        tokio::time::sleep(Duration::from_millis(3_100)).await;
        assert_eq!(view.analysis().unwrap().run_state(), TaskState::Resolved);
        let task = view.take_analysis().unwrap();
        assert_eq!(task.join().await, TaskState::Resolved);
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_the_dashboard_cancels_its_refresh() {
        let config = DashboardConfig::default();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let mut app = AppState::default();
        assert_eq!(app.tab, AppTab::Dashboard);
        assert!(app
            .dashboard
            .start_refresh(&config, move || flag.store(true, Ordering::SeqCst)));
        assert!(!app.dashboard.start_refresh(&config, || {}));

        assert!(app.select_tab(AppTab::Services));
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(app.dashboard.refresh_state(), TaskState::Cancelled);
        assert!(!fired.load(Ordering::SeqCst));
        let task = app.dashboard.take_refresh().unwrap();
        assert_eq!(task.join().await, TaskState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_can_run_again_once_resolved() {
        let config = DashboardConfig::default();
        let mut view = DashboardView::default();
        assert_eq!(view.refresh_state(), TaskState::Idle);
        assert!(view.start_refresh(&config, || {}));
        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(view.refresh_state(), TaskState::Resolved);
        assert!(!view.leave());
        assert!(view.start_refresh(&config, || {}));
        assert_eq!(view.refresh_state(), TaskState::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_tracking_closes_the_sheet() {
        let config = DashboardConfig::default();
        let mut app = AppState::default();
        app.select_tab(AppTab::Tracking);
        app.tracking.open_analysis();
        app.tracking.run_analysis(&config, || {});

        assert!(app.select_tab(AppTab::About));
        assert!(app.tracking.modal.is_none());
        assert!(!app.select_tab(AppTab::About));
    }

    #[test]
    fn health_sheet_resolves_its_measure() {
        let dataset = Dataset {
            measures: vec![Measure {
                id: 7,
                measure_name: "Mental Health".into(),
                indigenous_value: 23.1,
                non_indigenous_value: 16.8,
                gap: 6.3,
                trend: crate::model::Trend::Stable,
                priority: crate::model::Priority::High,
                risk_level: crate::model::RiskLevel::High,
                affected_population: 59_472,
                unit: crate::model::MeasureUnit::Percent,
                interventions: Vec::new(),
            }],
            ..Dataset::default()
        };

        let mut view = HealthView::default();
        assert!(view.selected(&dataset).is_none());
        view.open_service_match(&dataset.measures[0]);
        assert_eq!(view.selected(&dataset).map(|m| m.id), Some(7));
        view.close();
        assert!(view.selected(&dataset).is_none());
    }

    #[test]
    fn services_view_clear_resets_filters() {
        let mut view = ServicesView {
            query: "mental".into(),
            filter: ServiceFilter::Urgent,
        };
        view.clear();
        assert_eq!(view, ServicesView::default());
    }
}
