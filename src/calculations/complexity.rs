use crate::graph::activity_dag::ActivityDag;

/// `edges - nodes + 2 * components` over the activity-on-node network.
/// Durations play no part. The empty network scores 0.
pub fn cyclomatic_complexity(dag: &ActivityDag) -> i64 {
    let edges = dag.edge_count() as i64;
    let nodes = dag.node_count() as i64;
    let components = dag.component_count() as i64;
    edges - nodes + 2 * components
}
