use project_plan::{Activity, DependencyEdge, StructuralError, resolve};

fn chain(ids: &[i32]) -> Vec<DependencyEdge> {
    ids.windows(2)
        .map(|w| DependencyEdge::new(w[0], w[1]))
        .collect()
}

#[test]
fn resolves_predecessor_and_successor_sets() {
    // 1 -> {2, 3} -> 4
    let activities = vec![
        Activity::new(1, "T1", 2),
        Activity::new(2, "T2", 3),
        Activity::new(3, "T3", 1),
        Activity::new(4, "T4", 2),
    ];
    let edges = vec![
        DependencyEdge::new(1, 2),
        DependencyEdge::new(1, 3),
        DependencyEdge::new(2, 4),
        DependencyEdge::new(3, 4),
    ];
    let graph = resolve(&activities, &edges).unwrap();

    assert_eq!(graph.activity_count(), 4);
    assert_eq!(graph.dag().edge_count(), 4);
    let t1 = graph.activity(1).unwrap();
    assert!(t1.is_source());
    assert_eq!(t1.successors, vec![2, 3]);
    let t4 = graph.activity(4).unwrap();
    assert_eq!(t4.predecessors, vec![2, 3]);
    assert!(t4.is_sink());
    assert!(graph.activities().all(|a| a.timing.is_none()));
}

#[test]
fn topological_order_puts_predecessors_first() {
    let activities: Vec<Activity> = [5, 3, 9, 1]
        .iter()
        .map(|&id| Activity::new(id, format!("T{id}"), 1))
        .collect();
    let edges = chain(&[9, 5, 1, 3]);
    let graph = resolve(&activities, &edges).unwrap();
    assert_eq!(graph.topological_order(), &[9, 5, 1, 3]);
}

#[test]
fn missing_endpoint_is_unresolved_reference() {
    let activities = vec![Activity::new(1, "A", 1), Activity::new(2, "B", 1)];
    let edges = vec![DependencyEdge::new(1, 2), DependencyEdge::new(7, 2)];

    let err = resolve(&activities, &edges).unwrap_err();
    assert_eq!(
        err,
        StructuralError::UnresolvedReference {
            predecessor: 7,
            successor: 2,
            missing: 7,
        }
    );
}

#[test]
fn two_node_cycle_is_reported() {
    let activities = vec![Activity::new(1, "A", 1), Activity::new(2, "B", 1)];
    let edges = vec![DependencyEdge::new(1, 2), DependencyEdge::new(2, 1)];

    let err = resolve(&activities, &edges).unwrap_err();
    assert_eq!(
        err,
        StructuralError::CyclicDependency {
            cycle: vec![1, 2, 1]
        }
    );
    assert_eq!(err.to_string(), "cyclic dependency: 1->2->1");
}

#[test]
fn cycle_downstream_of_valid_prefix_is_found() {
    let activities: Vec<Activity> = (1..=5)
        .map(|id| Activity::new(id, format!("T{id}"), 1))
        .collect();
    // 1 -> 2 -> 3 -> 4 -> 2, 5 isolated
    let mut edges = chain(&[1, 2, 3, 4]);
    edges.push(DependencyEdge::new(4, 2));

    match resolve(&activities, &edges) {
        Err(StructuralError::CyclicDependency { cycle }) => assert_eq!(cycle, vec![2, 3, 4, 2]),
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn self_loop_is_cyclic() {
    let activities = vec![Activity::new(1, "A", 1)];
    let err = resolve(&activities, &[DependencyEdge::new(1, 1)]).unwrap_err();
    assert_eq!(err, StructuralError::CyclicDependency { cycle: vec![1, 1] });
}

#[test]
fn duplicate_edges_are_dropped_not_fatal() {
    let activities = vec![Activity::new(1, "A", 1), Activity::new(2, "B", 1)];
    let edges = vec![
        DependencyEdge::new(1, 2),
        DependencyEdge::new(1, 2),
        DependencyEdge::new(1, 2),
    ];
    let graph = resolve(&activities, &edges).unwrap();

    assert_eq!(graph.edges(), &[DependencyEdge::new(1, 2)]);
    assert_eq!(graph.duplicate_edges().len(), 2);
    assert_eq!(graph.dag().edge_count(), 1);
}

#[test]
fn duplicate_activity_ids_are_rejected() {
    let activities = vec![Activity::new(1, "A", 1), Activity::new(1, "B", 2)];
    assert_eq!(
        resolve(&activities, &[]).unwrap_err(),
        StructuralError::DuplicateActivity(1)
    );
}

#[test]
fn inputs_are_left_untouched() {
    let activities = vec![Activity::new(1, "A", 1), Activity::new(2, "B", 1)];
    let edges = vec![DependencyEdge::new(1, 2), DependencyEdge::new(1, 2)];
    let before = (activities.clone(), edges.clone());
    let _ = resolve(&activities, &edges);
    assert_eq!((activities, edges), before);
}
