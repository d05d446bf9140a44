use json_stats::aggregation::{
    AggregationConfig, Aggregator, MergedRow, ObservationKey, ObservationRouter, Operation,
    SlidingWindow, StatsStore,
};
use json_stats::event::{FieldPath, Record};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::num::NonZeroUsize;

fn paths(raw: &[&str]) -> Vec<FieldPath> {
    raw.iter().map(|p| FieldPath::parse(p).unwrap()).collect()
}

fn ingest(config: &AggregationConfig, records: &[serde_json::Value]) -> StatsStore {
    let router = ObservationRouter::new(config);
    let mut store = StatsStore::new(config.window_size);

    for data in records {
        for observation in router.route(&Record::new(data.clone())) {
            store.observe(observation.key, observation.value);
        }
    }
    store
}

#[test]
fn test_window_bound_keeps_most_recent_values() {
    let mut store = StatsStore::new(NonZeroUsize::new(3));
    let key = ObservationKey::undecomposed("latency");

    for value in [10.0, 20.0, 30.0, 40.0, 50.0] {
        store.observe(key.clone(), value);
    }

    assert_eq!(store.count(&key), 3);
    assert_eq!(store.sum(&key), Some(120.0));
    assert_eq!(store.average(&key), Some(40.0));
    assert_eq!(store.median(&key), Some(40.0));
}

#[test]
fn test_unbounded_window_keeps_everything() {
    let mut store = StatsStore::new(None);
    let key = ObservationKey::undecomposed("bytes");

    for value in 1..=1000 {
        store.observe(key.clone(), value as f64);
    }

    assert_eq!(store.count(&key), 1000);
    assert_eq!(store.sum(&key), Some(500500.0));
}

#[test]
fn test_median_odd_and_even() {
    let mut odd = SlidingWindow::unbounded();
    for v in [3.0, 1.0, 2.0] {
        odd.push(v);
    }
    assert_eq!(odd.median(), Some(2.0));

    let mut even = SlidingWindow::unbounded();
    for v in [4.0, 1.0, 3.0, 2.0] {
        even.push(v);
    }
    assert_eq!(even.median(), Some(2.5));
}

#[test]
fn test_empty_window_results_are_undefined() {
    let window = SlidingWindow::unbounded();

    assert_eq!(Operation::Average.apply(&window), None);
    assert_eq!(Operation::Median.apply(&window), None);
    assert_eq!(Operation::Min.apply(&window), None);
    assert_eq!(Operation::Sum.apply(&window), Some(0.0));
    assert_eq!(Operation::Count.apply(&window), Some(0.0));
}

#[test]
fn test_count_mode_groups_by_value() {
    let config = AggregationConfig::new(paths(&["status"]), vec![Operation::Count])
        .with_decomposition(FieldPath::parse("host").unwrap());
    let records: Vec<_> = [200, 200, 404]
        .iter()
        .map(|status| json!({"host": "web-1", "status": status}))
        .collect();

    let store = ingest(&config, &records);
    let rows = Aggregator::new(config.operations.clone()).compute(&store);

    assert_eq!(
        rows,
        vec![
            MergedRow {
                decomposition: Some("web-1".into()),
                metric: "200".into(),
                values: vec![Some(2.0)],
            },
            MergedRow {
                decomposition: Some("web-1".into()),
                metric: "404".into(),
                values: vec![Some(1.0)],
            },
        ]
    );
}

#[test]
fn test_key_order_is_preserved_across_operations() {
    let config = AggregationConfig::new(paths(&["v"]), vec![Operation::Sum, Operation::Median])
        .with_decomposition(FieldPath::parse("k").unwrap());
    let records = vec![
        json!({"k": "k1", "v": 1}),
        json!({"k": "k2", "v": 100}),
        json!({"k": "k3", "v": 7}),
        json!({"k": "k2", "v": 300}),
        json!({"k": "k1", "v": 5}),
    ];

    let store = ingest(&config, &records);
    let rows = Aggregator::new(config.operations.clone()).compute(&store);

    let summary: Vec<(String, Vec<Option<f64>>)> = rows
        .into_iter()
        .map(|row| (row.decomposition.unwrap_or_default(), row.values))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("k1".to_string(), vec![Some(6.0), Some(3.0)]),
            ("k2".to_string(), vec![Some(400.0), Some(200.0)]),
            ("k3".to_string(), vec![Some(7.0), Some(7.0)]),
        ]
    );
}

#[test]
fn test_missing_decomposition_falls_back_to_unknown() {
    let config = AggregationConfig::new(paths(&["latency"]), vec![Operation::Average])
        .with_decomposition(FieldPath::parse("route").unwrap());
    let records = vec![json!({"latency": 10}), json!({"latency": 30, "route": null})];

    let store = ingest(&config, &records);
    let keys: Vec<_> = store.keys().cloned().collect();

    assert_eq!(
        keys,
        vec![
            ObservationKey::new(Some("unknown".into()), "latency"),
            ObservationKey::new(Some("null".into()), "latency"),
        ]
    );
}

#[test]
fn test_nested_paths_and_multiple_metrics() {
    let config = AggregationConfig::new(
        paths(&["req.timers.getMetadata", "res.bytes"]),
        vec![Operation::Max, Operation::Min],
    );
    let records = vec![
        json!({"req": {"timers": {"getMetadata": 12}}, "res": {"bytes": 512}}),
        json!({"req": {"timers": {"getMetadata": 40}}}),
        json!({"req": {"timers": 7}, "res": {"bytes": 128}}),
    ];

    let store = ingest(&config, &records);
    let rows = Aggregator::new(config.operations.clone()).compute(&store);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].metric, "req.timers.getMetadata");
    assert_eq!(rows[0].values, vec![Some(40.0), Some(12.0)]);
    assert_eq!(rows[1].metric, "res.bytes");
    assert_eq!(rows[1].values, vec![Some(512.0), Some(128.0)]);
}

#[test]
fn test_compute_twice_is_identical() {
    let config = AggregationConfig::new(paths(&["v"]), vec![Operation::Average, Operation::Count]);
    let store = ingest(&config, &[json!({"v": 1}), json!({"v": 2}), json!({"v": 4})]);

    let aggregator = Aggregator::new(config.operations.clone());
    let first = aggregator.compute(&store);
    let second = aggregator.compute(&store);

    assert_eq!(first, second);
    assert_eq!(first[0].cells(), vec!["", "v", "2", "3"]);
}
