pub mod activity;
pub(crate) mod activity_validation;
pub mod calculations;
pub mod calendar;
pub mod compilation;
pub mod context;
pub mod cost;
pub mod graph;
pub mod metrics;
pub mod project;
pub mod report;
pub mod resource;
#[cfg(feature = "shared")]
pub mod session;

pub use activity::{Activity, ActivityId, DependencyEdge, Severity, SeverityMap};
pub use calendar::{
    CalendarError, CalendarRegime, WorkCalendar, WorkCalendarConfig, date_from_duration,
    duration_to_man_months,
};
pub use compilation::{CompilationSummary, CompiledGraph, compile};
pub use context::ProjectContext;
pub use cost::{CostBreakdown, cost};
pub use graph::{
    ActivityTiming, DependentActivity, Resolution, ResolvedGraph, StructuralError, resolve,
};
pub use metrics::{MetricsSnapshot, MetricsUnavailable, RiskMetrics, metrics};
pub use project::{ProjectError, ProjectModel, ProjectSnapshot};
pub use report::schedule_dataframe;
pub use resource::{CostType, Resource, ResourceCatalog, ResourceId};
#[cfg(feature = "shared")]
pub use session::SharedProject;
