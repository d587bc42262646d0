use super::activity_dag::ActivityDag;
use super::{DependentActivity, Resolution, ResolvedGraph, StructuralError};
use crate::activity::{Activity, ActivityId, DependencyEdge};
use crate::activity_validation::validate_activity_collection;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Builds the dependency graph for `activities` constrained by `edges`.
///
/// Activities and edges are only read. Repeated edges are kept once and listed
/// in [`ResolvedGraph::duplicate_edges`]; every other problem is a
/// [`StructuralError`].
pub fn resolve(activities: &[Activity], edges: &[DependencyEdge]) -> Resolution {
    validate_activity_collection(activities)?;

    let known: BTreeMap<ActivityId, &Activity> =
        activities.iter().map(|activity| (activity.id, activity)).collect();

    let mut unique: BTreeSet<DependencyEdge> = BTreeSet::new();
    let mut duplicate_edges = Vec::new();
    for edge in edges {
        for endpoint in [edge.predecessor, edge.successor] {
            if !known.contains_key(&endpoint) {
                return Err(StructuralError::UnresolvedReference {
                    predecessor: edge.predecessor,
                    successor: edge.successor,
                    missing: endpoint,
                });
            }
        }
        if edge.is_self_loop() {
            return Err(StructuralError::CyclicDependency {
                cycle: vec![edge.predecessor, edge.successor],
            });
        }
        if !unique.insert(*edge) {
            warn!(edge = %edge, "dropping duplicate dependency edge");
            duplicate_edges.push(*edge);
        }
    }

    let edges: Vec<DependencyEdge> = unique.into_iter().collect();
    let dag = ActivityDag::build(known.keys().copied(), &edges);
    let successors: BTreeMap<ActivityId, Vec<ActivityId>> = known
        .keys()
        .map(|&id| (id, dag.successors(id)))
        .collect();

    let topological_order = depth_first_order(&successors).map_err(|cycle| {
        warn!(?cycle, "dependency cycle detected");
        StructuralError::CyclicDependency { cycle }
    })?;

    let activities = known
        .into_iter()
        .map(|(id, activity)| {
            let dependent = DependentActivity {
                activity: activity.clone(),
                predecessors: dag.predecessors(id),
                successors: successors.get(&id).cloned().unwrap_or_default(),
                timing: None,
            };
            (id, dependent)
        })
        .collect();

    debug!(
        activities = dag.node_count(),
        edges = dag.edge_count(),
        duplicates = duplicate_edges.len(),
        "resolved activity network"
    );

    Ok(ResolvedGraph {
        dag,
        activities,
        topological_order,
        edges,
        duplicate_edges,
    })
}

/// Depth-first traversal with a recursion-stack marker. Returns a topological
/// order (reverse post-order) or the first cycle found as `[a, .., a]`.
fn depth_first_order(
    successors: &BTreeMap<ActivityId, Vec<ActivityId>>,
) -> Result<Vec<ActivityId>, Vec<ActivityId>> {
    let mut marks: HashMap<ActivityId, Mark> = successors
        .keys()
        .map(|&id| (id, Mark::Unvisited))
        .collect();
    let mut post_order = Vec::with_capacity(successors.len());

    for &root in successors.keys() {
        if marks.get(&root) != Some(&Mark::Unvisited) {
            continue;
        }
        marks.insert(root, Mark::OnStack);
        // (node, index of the next successor to visit)
        let mut stack: Vec<(ActivityId, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let next = successors
                .get(&node)
                .and_then(|succs| succs.get(frame.1))
                .copied();

            let Some(succ) = next else {
                marks.insert(node, Mark::Done);
                post_order.push(node);
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks.get(&succ).copied().unwrap_or(Mark::Done) {
                Mark::Unvisited => {
                    marks.insert(succ, Mark::OnStack);
                    stack.push((succ, 0));
                }
                Mark::OnStack => {
                    let start = stack
                        .iter()
                        .position(|(id, _)| *id == succ)
                        .unwrap_or(0);
                    let mut cycle: Vec<ActivityId> =
                        stack[start..].iter().map(|(id, _)| *id).collect();
                    cycle.push(succ);
                    return Err(cycle);
                }
                Mark::Done => {}
            }
        }
    }

    post_order.reverse();
    Ok(post_order)
}
