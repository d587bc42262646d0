use crate::activity::{Activity, ActivityId, DependencyEdge, Severity};
use crate::activity_validation::validate_activity;
use crate::compilation::{CompiledGraph, compile};
use crate::context::ProjectContext;
use crate::cost::{CostBreakdown, cost};
use crate::graph::{Resolution, StructuralError, resolve};
use crate::metrics::{MetricsSnapshot, MetricsUnavailable, metrics};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectError {
    #[error("activity {0} not found")]
    UnknownActivity(ActivityId),
    #[error(transparent)]
    InvalidActivity(#[from] StructuralError),
}

/// Everything derived from one version of the model. Replaced wholesale on
/// every compile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSnapshot {
    pub compiled: CompiledGraph,
    pub metrics: Result<MetricsSnapshot, MetricsUnavailable>,
    pub cost: CostBreakdown,
}

/// Caller-owned activity model plus its context. Holds no derived values;
/// [`ProjectModel::compile`] runs the whole pipeline on the current state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectModel {
    pub context: ProjectContext,
    activities: Vec<Activity>,
    edges: Vec<DependencyEdge>,
}

impl ProjectModel {
    pub fn new(context: ProjectContext) -> Self {
        Self {
            context,
            activities: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn find_activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    fn require(&self, id: ActivityId) -> Result<(), ProjectError> {
        match self.find_activity(id) {
            Some(_) => Ok(()),
            None => Err(ProjectError::UnknownActivity(id)),
        }
    }

    /// Inserts or replaces an activity. When `predecessors` is given, the
    /// activity's incoming dependencies are replaced by exactly that list.
    /// Predecessors need not exist yet; unresolved ones surface on compile.
    pub fn upsert_activity(
        &mut self,
        activity: Activity,
        predecessors: Option<Vec<ActivityId>>,
    ) -> Result<(), ProjectError> {
        validate_activity(&activity)?;
        let id = activity.id;

        match self.activities.iter_mut().find(|a| a.id == id) {
            Some(existing) => *existing = activity,
            None => self.activities.push(activity),
        }

        if let Some(preds) = predecessors {
            self.edges.retain(|edge| edge.successor != id);
            for pred in preds {
                let edge = DependencyEdge::new(pred, id);
                if !self.edges.contains(&edge) {
                    self.edges.push(edge);
                }
            }
        }
        Ok(())
    }

    /// Removes an activity together with every edge and severity referring to it.
    pub fn delete_activity(&mut self, id: ActivityId) -> bool {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != id);
        if self.activities.len() == before {
            return false;
        }
        self.edges.retain(|edge| edge.predecessor != id && edge.successor != id);
        self.context.severities.remove(&id);
        true
    }

    /// Returns `false` when the dependency already exists.
    pub fn add_dependency(
        &mut self,
        predecessor: ActivityId,
        successor: ActivityId,
    ) -> Result<bool, ProjectError> {
        self.require(predecessor)?;
        self.require(successor)?;
        let edge = DependencyEdge::new(predecessor, successor);
        if self.edges.contains(&edge) {
            return Ok(false);
        }
        self.edges.push(edge);
        Ok(true)
    }

    pub fn remove_dependency(&mut self, predecessor: ActivityId, successor: ActivityId) -> bool {
        let edge = DependencyEdge::new(predecessor, successor);
        let before = self.edges.len();
        self.edges.retain(|e| *e != edge);
        self.edges.len() != before
    }

    /// Sets or clears (`None`) the severity classification of an activity.
    pub fn set_severity(
        &mut self,
        id: ActivityId,
        severity: Option<Severity>,
    ) -> Result<(), ProjectError> {
        self.require(id)?;
        match severity {
            Some(severity) => {
                self.context.severities.insert(id, severity);
            }
            None => {
                self.context.severities.remove(&id);
            }
        }
        Ok(())
    }

    pub fn resolve(&self) -> Resolution {
        resolve(&self.activities, &self.edges)
    }

    /// resolve -> compile -> {metrics, cost}, all against this exact state.
    pub fn compile(&self) -> ProjectSnapshot {
        let resolution = self.resolve();
        let compiled = compile(
            &resolution,
            self.context.project_start_date,
            &self.context.calendar,
        );
        let metrics = metrics(&compiled, &self.context.severities);
        let cost = cost(&compiled, &self.context.resources, self.context.other_cost);
        debug!(
            project = %self.context.project_name,
            valid = compiled.is_valid(),
            "project pipeline finished"
        );
        ProjectSnapshot {
            compiled,
            metrics,
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_inserts_and_updates() {
        let mut model = ProjectModel::default();
        model
            .upsert_activity(Activity::new(1, "Task A", 5), None)
            .unwrap();
        assert_eq!(model.activities().len(), 1);

        // Update name and duration, and set predecessors
        model
            .upsert_activity(Activity::new(1, "Task A1", 7), Some(vec![2, 3]))
            .unwrap();

        let activity = model.find_activity(1).unwrap();
        assert_eq!(activity.name, "Task A1");
        assert_eq!(activity.duration, 7);
        assert_eq!(
            model.edges(),
            &[DependencyEdge::new(2, 1), DependencyEdge::new(3, 1)]
        );
    }

    #[test]
    fn upsert_rejects_invalid_activity() {
        let mut model = ProjectModel::default();
        let err = model
            .upsert_activity(Activity::new(1, "Bad", -1), None)
            .unwrap_err();
        assert!(matches!(err, ProjectError::InvalidActivity(_)));
        assert!(model.activities().is_empty());
    }

    #[test]
    fn add_dependency_requires_known_activities() {
        let mut model = ProjectModel::default();
        model.upsert_activity(Activity::new(1, "A", 1), None).unwrap();
        assert_eq!(
            model.add_dependency(1, 2),
            Err(ProjectError::UnknownActivity(2))
        );
        model.upsert_activity(Activity::new(2, "B", 1), None).unwrap();
        assert_eq!(model.add_dependency(1, 2), Ok(true));
        assert_eq!(model.add_dependency(1, 2), Ok(false));
        assert!(model.remove_dependency(1, 2));
        assert!(!model.remove_dependency(1, 2));
    }
}
