use crate::resource::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type ActivityId = i32;

/// Per-activity severity classification, keyed by activity id.
pub type SeverityMap = BTreeMap<ActivityId, Severity>;

/// A unit of work in the activity-on-node network.
///
/// Identity, duration and resource assignments are caller-owned input. Derived
/// schedule values never live here; see [`crate::graph::DependentActivity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    /// Duration in abstract time units. Must be non-negative.
    pub duration: i64,
    /// Identifiers of resources from the caller's catalog assigned to this activity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceId>,
    /// Zero-duration node that only expresses a dependency.
    #[serde(default)]
    pub is_dummy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Activity {
    pub fn new(id: ActivityId, name: impl Into<String>, duration: i64) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
            resources: Vec::new(),
            is_dummy: false,
            notes: None,
        }
    }

    pub fn dummy(id: ActivityId) -> Self {
        Self {
            id,
            name: format!("dummy-{id}"),
            duration: 0,
            resources: Vec::new(),
            is_dummy: true,
            notes: None,
        }
    }

    pub fn with_resources<I>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = ResourceId>,
    {
        self.resources = resources.into_iter().collect();
        self
    }
}

/// Precedence constraint: `successor` may not start before `predecessor` finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub predecessor: ActivityId,
    pub successor: ActivityId,
}

impl DependencyEdge {
    pub fn new(predecessor: ActivityId, successor: ActivityId) -> Self {
        Self {
            predecessor,
            successor,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.predecessor == self.successor
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.predecessor, self.successor)
    }
}

impl From<(ActivityId, ActivityId)> for DependencyEdge {
    fn from((predecessor, successor): (ActivityId, ActivityId)) -> Self {
        Self::new(predecessor, successor)
    }
}

/// Ordinal risk classification of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Negligible,
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Negligible,
        Severity::Low,
        Severity::Medium,
        Severity::High,
    ];

    pub fn rank(self) -> u32 {
        match self {
            Severity::Negligible => 0,
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }

    /// Score normalized to `[0, 1]`, linear in rank.
    pub fn score(self) -> f64 {
        f64::from(self.rank()) / f64::from(Severity::High.rank())
    }

    /// Fibonacci term `F(2 * rank)`: 0, 1, 3, 8.
    pub fn fibonacci_weight(self) -> f64 {
        fibonacci(2 * self.rank()) as f64
    }

    pub fn max_fibonacci_weight() -> f64 {
        Severity::High.fibonacci_weight()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Negligible => "negligible",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn fibonacci(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a + b;
        a = b;
        b = next;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fibonacci_weights_grow_super_linearly() {
        let weights: Vec<f64> = Severity::ALL
            .iter()
            .map(|s| s.fibonacci_weight())
            .collect();
        assert_eq!(weights, vec![0.0, 1.0, 3.0, 8.0]);
        assert_eq!(Severity::max_fibonacci_weight(), 8.0);
    }

    #[test]
    fn scores_span_unit_interval() {
        assert_eq!(Severity::Negligible.score(), 0.0);
        assert_eq!(Severity::High.score(), 1.0);
        assert!(Severity::Low.score() < Severity::Medium.score());
    }

    #[test]
    fn dummy_has_zero_duration() {
        let dummy = Activity::dummy(9);
        assert!(dummy.is_dummy);
        assert_eq!(dummy.duration, 0);
    }
}
