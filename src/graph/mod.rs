pub mod activity_dag;
pub mod resolver;

use crate::activity::{Activity, ActivityId, DependencyEdge};
use activity_dag::ActivityDag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub use resolver::resolve;

/// Fatal problems with the network's structure. Any of these aborts compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StructuralError {
    #[error("dependency {predecessor}->{successor} references missing activity {missing}")]
    UnresolvedReference {
        predecessor: ActivityId,
        successor: ActivityId,
        missing: ActivityId,
    },
    #[error("cyclic dependency: {}", format_cycle(.cycle))]
    CyclicDependency { cycle: Vec<ActivityId> },
    #[error("duplicate activity id {0}")]
    DuplicateActivity(ActivityId),
    #[error("activity {id} is invalid: {reason}")]
    InvalidActivity { id: ActivityId, reason: String },
}

fn format_cycle(cycle: &[ActivityId]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("->")
}

pub type Resolution = Result<ResolvedGraph, StructuralError>;

/// Derived schedule values, in duration units from the project start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTiming {
    pub earliest_start: i64,
    pub earliest_finish: i64,
    pub latest_start: i64,
    pub latest_finish: i64,
    pub free_float: i64,
    pub total_float: i64,
}

impl ActivityTiming {
    pub fn is_critical(&self) -> bool {
        self.total_float == 0
    }
}

/// An activity together with its resolved incoming and outgoing dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependentActivity {
    pub activity: Activity,
    pub predecessors: Vec<ActivityId>,
    pub successors: Vec<ActivityId>,
    /// Populated only by a successful compilation.
    pub timing: Option<ActivityTiming>,
}

impl DependentActivity {
    pub fn id(&self) -> ActivityId {
        self.activity.id
    }

    pub fn duration(&self) -> i64 {
        self.activity.duration
    }

    pub fn is_dummy(&self) -> bool {
        self.activity.is_dummy
    }

    pub fn is_source(&self) -> bool {
        self.predecessors.is_empty()
    }

    pub fn is_sink(&self) -> bool {
        self.successors.is_empty()
    }

    pub fn is_critical(&self) -> bool {
        self.timing.is_some_and(|timing| timing.is_critical())
    }
}

/// A validated, acyclic network ready for compilation.
#[derive(Debug, Clone)]
pub struct ResolvedGraph {
    pub(crate) dag: ActivityDag,
    pub(crate) activities: BTreeMap<ActivityId, DependentActivity>,
    pub(crate) topological_order: Vec<ActivityId>,
    pub(crate) edges: Vec<DependencyEdge>,
    pub(crate) duplicate_edges: Vec<DependencyEdge>,
}

impl ResolvedGraph {
    pub fn dag(&self) -> &ActivityDag {
        &self.dag
    }

    /// Activities in ascending id order.
    pub fn activities(&self) -> impl Iterator<Item = &DependentActivity> {
        self.activities.values()
    }

    pub fn activity(&self, id: ActivityId) -> Option<&DependentActivity> {
        self.activities.get(&id)
    }

    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    pub fn topological_order(&self) -> &[ActivityId] {
        &self.topological_order
    }

    /// De-duplicated edges, sorted.
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Repeated edges that were dropped during resolution, in input order.
    pub fn duplicate_edges(&self) -> &[DependencyEdge] {
        &self.duplicate_edges
    }
}
