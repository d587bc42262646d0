use crate::activity::SeverityMap;
use crate::calendar::CalendarRegime;
use crate::resource::ResourceCatalog;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything the engine needs besides the activity network itself, passed
/// explicitly to each pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub project_name: String,
    pub project_start_date: NaiveDate,
    #[serde(default)]
    pub calendar: CalendarRegime,
    #[serde(default)]
    pub severities: SeverityMap,
    #[serde(default)]
    pub resources: ResourceCatalog,
    /// Flat adjustment reported as "other" cost.
    #[serde(default)]
    pub other_cost: f64,
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self {
            project_name: "New Project".to_string(),
            project_start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            calendar: CalendarRegime::default(),
            severities: SeverityMap::new(),
            resources: ResourceCatalog::default(),
            other_cost: 0.0,
        }
    }
}

impl ProjectContext {
    pub fn new(project_name: impl Into<String>, project_start_date: NaiveDate) -> Self {
        Self {
            project_name: project_name.into(),
            project_start_date,
            ..Self::default()
        }
    }

    pub fn with_calendar(mut self, calendar: CalendarRegime) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_resources(mut self, resources: ResourceCatalog) -> Self {
        self.resources = resources;
        self
    }
}
