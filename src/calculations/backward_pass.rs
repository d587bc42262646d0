use crate::activity::ActivityId;
use crate::graph::ResolvedGraph;
use std::collections::HashMap;

/// Latest start/finish offsets, propagated in reverse topological order.
pub struct BackwardPass<'a> {
    graph: &'a ResolvedGraph,
}

impl<'a> BackwardPass<'a> {
    pub fn new(graph: &'a ResolvedGraph) -> Self {
        Self { graph }
    }

    pub fn execute(&self, project_finish: i64) -> HashMap<ActivityId, (i64, i64)> {
        // LS/LF keyed by activity id
        let mut late_starts: HashMap<ActivityId, i64> = HashMap::new();
        let mut late_finishes: HashMap<ActivityId, i64> = HashMap::new();

        for &activity_id in self.graph.topological_order().iter().rev() {
            let Some(activity) = self.graph.activity(activity_id) else {
                continue;
            };

            // Latest finish is bounded by successors' late starts; sinks end with the project
            let lf = activity
                .successors
                .iter()
                .filter_map(|succ_id| late_starts.get(succ_id).copied())
                .min()
                .unwrap_or(project_finish);
            let ls = lf.saturating_sub(activity.duration());

            late_finishes.insert(activity_id, lf);
            late_starts.insert(activity_id, ls);
        }

        // Pack results
        let mut results = HashMap::with_capacity(late_starts.len());
        for (activity_id, ls) in late_starts {
            if let Some(&lf) = late_finishes.get(&activity_id) {
                results.insert(activity_id, (ls, lf));
            }
        }
        results
    }
}
