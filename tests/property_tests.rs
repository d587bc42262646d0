use chrono::NaiveDate;
use project_plan::{
    Activity, CalendarRegime, CompiledGraph, DependencyEdge, compile, date_from_duration, resolve,
};
use proptest::prelude::*;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

/// Random acyclic network: edges only run from lower to higher ids.
fn network() -> impl Strategy<Value = (Vec<Activity>, Vec<DependencyEdge>)> {
    (1usize..12).prop_flat_map(|n| {
        let durations = prop::collection::vec(0i64..10, n);
        let edges = prop::collection::vec((0..n, 0..n), 0..(n * 2));
        (durations, edges).prop_map(|(durations, pairs)| {
            let activities = durations
                .into_iter()
                .enumerate()
                .map(|(i, duration)| Activity::new(i as i32 + 1, format!("T{}", i + 1), duration))
                .collect();
            let edges = pairs
                .into_iter()
                .filter(|(a, b)| a < b)
                .map(|(a, b)| DependencyEdge::new(a as i32 + 1, b as i32 + 1))
                .collect();
            (activities, edges)
        })
    })
}

fn build(activities: &[Activity], edges: &[DependencyEdge]) -> CompiledGraph {
    compile(
        &resolve(activities, edges),
        start(),
        &CalendarRegime::CalendarDays,
    )
}

proptest! {
    #[test]
    fn acyclic_networks_always_compile((activities, edges) in network()) {
        let compiled = build(&activities, &edges);
        prop_assert!(compiled.is_valid());
        prop_assert_eq!(compiled.activities().len(), activities.len());
    }

    #[test]
    fn floats_are_consistent((activities, edges) in network()) {
        let compiled = build(&activities, &edges);
        let duration = compiled.duration().unwrap();
        for dependent in compiled.activities() {
            let t = dependent.timing.unwrap();
            prop_assert_eq!(t.earliest_finish - t.earliest_start, dependent.duration());
            prop_assert_eq!(t.latest_finish - t.latest_start, dependent.duration());
            prop_assert!(t.total_float >= 0);
            prop_assert!(t.free_float >= 0);
            prop_assert!(t.free_float <= t.total_float);
            prop_assert!(t.latest_finish <= duration);
        }
    }

    #[test]
    fn precedence_holds_for_every_edge((activities, edges) in network()) {
        let compiled = build(&activities, &edges);
        for edge in compiled.edges() {
            let pred = compiled.timing(edge.predecessor).unwrap();
            let succ = compiled.timing(edge.successor).unwrap();
            prop_assert!(succ.earliest_start >= pred.earliest_finish);
            prop_assert!(pred.latest_finish <= succ.latest_start);
        }
    }

    #[test]
    fn critical_activities_chain_from_source_to_sink((activities, edges) in network()) {
        let compiled = build(&activities, &edges);
        let duration = compiled.duration().unwrap();
        prop_assert!(!compiled.critical_path().is_empty());

        let source = compiled
            .critical_path()
            .iter()
            .filter_map(|&id| compiled.activity(id))
            .find(|a| a.is_source());
        prop_assert!(source.is_some());

        // follow critical successors that start the moment the current one finishes
        let mut current = source.unwrap();
        prop_assert_eq!(current.timing.unwrap().earliest_start, 0);
        while !current.is_sink() {
            let finish = current.timing.unwrap().earliest_finish;
            let next = current
                .successors
                .iter()
                .filter_map(|&id| compiled.activity(id))
                .find(|s| s.is_critical() && s.timing.unwrap().earliest_start == finish);
            prop_assert!(next.is_some(), "critical chain breaks after {}", current.id());
            current = next.unwrap();
        }
        prop_assert_eq!(current.timing.unwrap().earliest_finish, duration);
    }

    #[test]
    fn compilation_is_deterministic((activities, edges) in network()) {
        let first = build(&activities, &edges);
        let mut shuffled = edges.clone();
        shuffled.reverse();
        let second = build(&activities, &shuffled);
        prop_assert_eq!(first.critical_path(), second.critical_path());
        prop_assert_eq!(first.activities(), second.activities());
        prop_assert_eq!(first, build(&activities, &edges));
    }

    #[test]
    fn business_dates_never_fall_on_weekends(duration in 0i64..400) {
        let regime = CalendarRegime::business_days();
        let date = date_from_duration(start(), duration, &regime).unwrap();
        let calendar = match &regime {
            CalendarRegime::BusinessDays(calendar) => calendar,
            CalendarRegime::CalendarDays => unreachable!(),
        };
        prop_assert!(calendar.is_available(date));
        prop_assert_eq!(calendar.count_available_days(start(), date) - 1, duration);
    }
}
