//! Search and category filters used by the list screens.
//!
//! Filters keep input order and hold no state, so running one twice on the
//! same collection gives the same result.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{AiInsight, Intervention, InterventionStatus, Measure, Service, ServiceStatus};
use crate::GapError;

/// Specialty that puts a service under the "Emergency" filter.
pub const EMERGENCY_SPECIALTY: &str = "Emergency Care";

/// Shown when a filter leaves nothing to display.
pub const EMPTY_RESULTS_HINT: &str = "Try adjusting your search or filter criteria";

/// Something free-text search can look into.
pub trait Searchable {
    fn search_name(&self) -> &str;
    fn search_tags(&self) -> &[String];
}

impl Searchable for Service {
    fn search_name(&self) -> &str {
        &self.name
    }

    fn search_tags(&self) -> &[String] {
        &self.specialties
    }
}

impl Searchable for Intervention {
    fn search_name(&self) -> &str {
        &self.name
    }

    fn search_tags(&self) -> &[String] {
        &self.connected_services
    }
}

impl Searchable for Measure {
    fn search_name(&self) -> &str {
        &self.measure_name
    }

    fn search_tags(&self) -> &[String] {
        &[]
    }
}

/// True when `query` is empty or is a case-insensitive substring of the name or a tag.
pub fn matches_search<T: Searchable + ?Sized>(item: &T, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    item.search_name().to_lowercase().contains(&needle)
        || item
            .search_tags()
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// How a filter row decides membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    Any,
    Status(ServiceStatus),
    Specialty(&'static str),
}

impl FilterRule {
    pub fn accepts(self, service: &Service) -> bool {
        match self {
            FilterRule::Any => true,
            FilterRule::Status(status) => service.status == status,
            FilterRule::Specialty(name) => service.specialties.iter().any(|spec| spec == name),
        }
    }
}

/// Category chips on the services screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceFilter {
    #[default]
    All,
    Available,
    Urgent,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub filter: ServiceFilter,
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub rule: FilterRule,
}

pub static SERVICE_FILTERS: [FilterOption; 4] = [
    FilterOption {
        filter: ServiceFilter::All,
        id: "all",
        label: "All Services",
        icon: "apps",
        rule: FilterRule::Any,
    },
    FilterOption {
        filter: ServiceFilter::Available,
        id: "available",
        label: "Available",
        icon: "checkmark-circle",
        rule: FilterRule::Status(ServiceStatus::Available),
    },
    FilterOption {
        filter: ServiceFilter::Urgent,
        id: "urgent",
        label: "Urgent",
        icon: "warning",
        rule: FilterRule::Status(ServiceStatus::Urgent),
    },
    FilterOption {
        filter: ServiceFilter::Emergency,
        id: "emergency",
        label: "Emergency",
        icon: "medical",
        rule: FilterRule::Specialty(EMERGENCY_SPECIALTY),
    },
];

impl ServiceFilter {
    pub fn option(self) -> &'static FilterOption {
        SERVICE_FILTERS
            .iter()
            .find(|option| option.filter == self)
            .unwrap_or(&SERVICE_FILTERS[0])
    }

    pub fn id(self) -> &'static str {
        self.option().id
    }

    /// Looks a filter up by its chip id (`"all"`, `"available"`, ...).
    pub fn from_id(id: &str) -> Result<Self, GapError> {
        SERVICE_FILTERS
            .iter()
            .find(|option| option.id == id)
            .map(|option| option.filter)
            .ok_or_else(|| GapError::UnknownFilter(id.to_string()))
    }
}

pub fn matches_filter(service: &Service, filter: ServiceFilter) -> bool {
    filter.option().rule.accepts(service)
}

/// Services passing both the search and the category filter, in input order.
pub fn filter_services<'a>(
    services: &'a [Service],
    query: &str,
    filter: ServiceFilter,
) -> Vec<&'a Service> {
    let matches: Vec<&Service> = services
        .iter()
        .filter(|service| matches_search(*service, query) && matches_filter(service, filter))
        .collect();
    debug!(
        query,
        filter = filter.id(),
        total = services.len(),
        matched = matches.len(),
        "filtered services"
    );
    matches
}

/// Tabs on the tracking screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterventionTab {
    #[default]
    Active,
    Planning,
    Completed,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabOption {
    pub tab: InterventionTab,
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    /// `None` matches every status.
    pub status: Option<InterventionStatus>,
}

pub static INTERVENTION_TABS: [TabOption; 4] = [
    TabOption {
        tab: InterventionTab::Active,
        id: "active",
        label: "Active",
        icon: "checkmark-circle",
        status: Some(InterventionStatus::Active),
    },
    TabOption {
        tab: InterventionTab::Planning,
        id: "planning",
        label: "Planning",
        icon: "time",
        status: Some(InterventionStatus::Planning),
    },
    TabOption {
        tab: InterventionTab::Completed,
        id: "completed",
        label: "Completed",
        icon: "checkmark-done",
        status: Some(InterventionStatus::Completed),
    },
    TabOption {
        tab: InterventionTab::All,
        id: "all",
        label: "All",
        icon: "apps",
        status: None,
    },
];

impl InterventionTab {
    pub const ALL: [InterventionTab; 4] = [
        InterventionTab::Active,
        InterventionTab::Planning,
        InterventionTab::Completed,
        InterventionTab::All,
    ];

    pub fn option(self) -> &'static TabOption {
        INTERVENTION_TABS
            .iter()
            .find(|option| option.tab == self)
            .unwrap_or(&INTERVENTION_TABS[3])
    }

    pub fn from_id(id: &str) -> Result<Self, GapError> {
        INTERVENTION_TABS
            .iter()
            .find(|option| option.id == id)
            .map(|option| option.tab)
            .ok_or_else(|| GapError::UnknownFilter(id.to_string()))
    }

    pub fn includes(self, intervention: &Intervention) -> bool {
        match self.option().status {
            Some(status) => intervention.status == status,
            None => true,
        }
    }
}

pub fn filter_interventions(
    interventions: &[Intervention],
    tab: InterventionTab,
) -> Vec<&Intervention> {
    interventions.iter().filter(|item| tab.includes(item)).collect()
}

/// Insights listed under the "Actions" view.
pub fn actionable_insights(insights: &[AiInsight]) -> Vec<&AiInsight> {
    insights.iter().filter(|insight| insight.actionable).collect()
}
