use crate::activity::ActivityId;
use crate::graph::ResolvedGraph;
use std::collections::HashMap;

/// Earliest start/finish offsets, propagated in topological order.
pub struct ForwardPass<'a> {
    graph: &'a ResolvedGraph,
}

impl<'a> ForwardPass<'a> {
    pub fn new(graph: &'a ResolvedGraph) -> Self {
        Self { graph }
    }

    pub fn execute(&self) -> HashMap<ActivityId, (i64, i64)> {
        let mut results: HashMap<ActivityId, (i64, i64)> =
            HashMap::with_capacity(self.graph.activity_count());

        for &activity_id in self.graph.topological_order() {
            let Some(activity) = self.graph.activity(activity_id) else {
                continue;
            };

            // Early start is max of all predecessor finishes; sources start at 0
            let early_start = activity
                .predecessors
                .iter()
                .filter_map(|pred_id| results.get(pred_id).map(|(_, ef)| *ef))
                .max()
                .unwrap_or(0);
            let early_finish = early_start.saturating_add(activity.duration());

            results.insert(activity_id, (early_start, early_finish));
        }

        results
    }
}
