use crate::activity::{ActivityId, DependencyEdge};
use crate::calculations::backward_pass::BackwardPass;
use crate::calculations::complexity::cyclomatic_complexity;
use crate::calculations::forward_pass::ForwardPass;
use crate::calendar::CalendarRegime;
use crate::graph::{ActivityTiming, DependentActivity, Resolution, StructuralError};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilationSummary {
    pub activity_count: usize,
    pub critical_count: usize,
    pub critical_path: Vec<ActivityId>,
    pub duration: Option<i64>,
    pub finish_date: Option<NaiveDate>,
    pub cyclomatic_complexity: Option<i64>,
    pub duplicate_edge_count: usize,
    pub error: Option<String>,
}

impl CompilationSummary {
    pub fn to_summary_line(&self) -> String {
        if let Some(error) = &self.error {
            return format!("invalid: {error}");
        }
        let mut parts = Vec::new();
        parts.push(format!("activities={}", self.activity_count));
        parts.push(format!("critical={}", self.critical_count));
        if let Some(duration) = self.duration {
            parts.push(format!("duration={duration}"));
        }
        if let Some(date) = self.finish_date {
            parts.push(format!("finish={date}"));
        }
        if let Some(complexity) = self.cyclomatic_complexity {
            parts.push(format!("complexity={complexity}"));
        }
        if self.duplicate_edge_count > 0 {
            parts.push(format!("duplicate_edges={}", self.duplicate_edge_count));
        }
        if !self.critical_path.is_empty() {
            let chain = self
                .critical_path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("path={chain}"));
        }
        parts.join(", ")
    }
}

/// The outcome of one compilation pass.
///
/// A valid graph carries every activity with its timing populated. An invalid
/// graph carries only the [`StructuralError`]; all derived accessors return
/// empty values so nothing stale can be read from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledGraph {
    project_start: NaiveDate,
    calendar: CalendarRegime,
    activities: Vec<DependentActivity>,
    critical_path: Vec<ActivityId>,
    duration: Option<i64>,
    cyclomatic_complexity: Option<i64>,
    edges: Vec<DependencyEdge>,
    duplicate_edges: Vec<DependencyEdge>,
    error: Option<StructuralError>,
}

/// Runs the forward and backward passes over a resolved network.
///
/// Offsets are integer duration units with `project_start` at 0; the calendar
/// regime is only used to turn offsets into dates. A failed resolution yields
/// an invalid graph without attempting any propagation.
pub fn compile(
    resolution: &Resolution,
    project_start: NaiveDate,
    calendar: &CalendarRegime,
) -> CompiledGraph {
    let graph = match resolution {
        Ok(graph) => graph,
        Err(err) => {
            debug!(error = %err, "skipping compilation of invalid network");
            return CompiledGraph::invalid(err.clone(), project_start, calendar.clone());
        }
    };

    let earliest = ForwardPass::new(graph).execute();
    let project_finish = earliest.values().map(|(_, ef)| *ef).max().unwrap_or(0);
    let latest = BackwardPass::new(graph).execute(project_finish);

    let mut activities = Vec::with_capacity(graph.activity_count());
    for dependent in graph.activities() {
        let id = dependent.id();
        let (Some(&(es, ef)), Some(&(ls, lf))) = (earliest.get(&id), latest.get(&id)) else {
            continue;
        };
        let free_float = dependent
            .successors
            .iter()
            .filter_map(|succ| earliest.get(succ).map(|(succ_es, _)| *succ_es))
            .min()
            .map(|min_es| min_es - ef)
            .unwrap_or(0);

        let mut compiled = dependent.clone();
        compiled.timing = Some(ActivityTiming {
            earliest_start: es,
            earliest_finish: ef,
            latest_start: ls,
            latest_finish: lf,
            free_float,
            total_float: ls - es,
        });
        activities.push(compiled);
    }

    let mut critical: Vec<(i64, ActivityId)> = activities
        .iter()
        .filter_map(|a| {
            a.timing
                .filter(ActivityTiming::is_critical)
                .map(|t| (t.earliest_start, a.id()))
        })
        .collect();
    critical.sort_unstable();
    let critical_path: Vec<ActivityId> = critical.into_iter().map(|(_, id)| id).collect();

    let complexity = cyclomatic_complexity(graph.dag());
    debug!(
        activities = activities.len(),
        critical = critical_path.len(),
        duration = project_finish,
        complexity,
        "compiled activity network"
    );

    CompiledGraph {
        project_start,
        calendar: calendar.clone(),
        activities,
        critical_path,
        duration: Some(project_finish),
        cyclomatic_complexity: Some(complexity),
        edges: graph.edges().to_vec(),
        duplicate_edges: graph.duplicate_edges().to_vec(),
        error: None,
    }
}

impl CompiledGraph {
    fn invalid(error: StructuralError, project_start: NaiveDate, calendar: CalendarRegime) -> Self {
        Self {
            project_start,
            calendar,
            activities: Vec::new(),
            critical_path: Vec::new(),
            duration: None,
            cyclomatic_complexity: None,
            edges: Vec::new(),
            duplicate_edges: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&StructuralError> {
        self.error.as_ref()
    }

    pub fn project_start(&self) -> NaiveDate {
        self.project_start
    }

    pub fn calendar(&self) -> &CalendarRegime {
        &self.calendar
    }

    /// Compiled activities in ascending id order. Empty when invalid.
    pub fn activities(&self) -> &[DependentActivity] {
        &self.activities
    }

    pub fn activity(&self, id: ActivityId) -> Option<&DependentActivity> {
        self.activities
            .binary_search_by_key(&id, DependentActivity::id)
            .ok()
            .map(|idx| &self.activities[idx])
    }

    pub fn timing(&self, id: ActivityId) -> Option<ActivityTiming> {
        self.activity(id).and_then(|a| a.timing)
    }

    /// Zero-total-float activities ordered by earliest start, then id.
    pub fn critical_path(&self) -> &[ActivityId] {
        &self.critical_path
    }

    pub fn is_critical(&self, id: ActivityId) -> bool {
        self.activity(id).is_some_and(DependentActivity::is_critical)
    }

    /// Project duration in units (the largest earliest finish).
    pub fn duration(&self) -> Option<i64> {
        self.duration
    }

    pub fn cyclomatic_complexity(&self) -> Option<i64> {
        self.cyclomatic_complexity
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn duplicate_edges(&self) -> &[DependencyEdge] {
        &self.duplicate_edges
    }

    /// `None` when the offset lands outside the representable date range.
    fn offset_date(&self, offset: i64) -> Option<NaiveDate> {
        self.calendar.date_from_duration(self.project_start, offset)
    }

    pub fn earliest_start_date(&self, id: ActivityId) -> Option<NaiveDate> {
        self.timing(id).and_then(|t| self.offset_date(t.earliest_start))
    }

    /// Exclusive: the first day after the work is done.
    pub fn earliest_finish_date(&self, id: ActivityId) -> Option<NaiveDate> {
        self.timing(id).and_then(|t| self.offset_date(t.earliest_finish))
    }

    pub fn latest_start_date(&self, id: ActivityId) -> Option<NaiveDate> {
        self.timing(id).and_then(|t| self.offset_date(t.latest_start))
    }

    pub fn latest_finish_date(&self, id: ActivityId) -> Option<NaiveDate> {
        self.timing(id).and_then(|t| self.offset_date(t.latest_finish))
    }

    pub fn project_finish_date(&self) -> Option<NaiveDate> {
        self.duration.and_then(|d| self.offset_date(d))
    }

    pub fn duration_man_months(&self) -> Option<f64> {
        self.duration.map(|d| self.calendar.duration_to_man_months(d))
    }

    pub fn summary(&self) -> CompilationSummary {
        CompilationSummary {
            activity_count: self.activities.len(),
            critical_count: self.critical_path.len(),
            critical_path: self.critical_path.clone(),
            duration: self.duration,
            finish_date: self.project_finish_date(),
            cyclomatic_complexity: self.cyclomatic_complexity,
            duplicate_edge_count: self.duplicate_edges.len(),
            error: self.error.as_ref().map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::Activity;
    use crate::graph::resolve;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summary_line_lists_critical_chain() {
        let activities = vec![Activity::new(1, "A", 2), Activity::new(2, "B", 3)];
        let resolution = resolve(&activities, &[DependencyEdge::new(1, 2)]);
        let compiled = compile(&resolution, d(2025, 1, 6), &CalendarRegime::CalendarDays);

        assert_eq!(
            compiled.summary().to_summary_line(),
            "activities=2, critical=2, duration=5, finish=2025-01-11, complexity=1, path=1->2"
        );
    }

    #[test]
    fn summary_line_reports_errors() {
        let activities = vec![Activity::new(1, "A", 2)];
        let resolution = resolve(&activities, &[DependencyEdge::new(1, 9)]);
        let compiled = compile(&resolution, d(2025, 1, 6), &CalendarRegime::default());

        let line = compiled.summary().to_summary_line();
        assert!(line.starts_with("invalid: "), "{line}");
        assert!(line.contains("missing activity 9"));
    }
}
