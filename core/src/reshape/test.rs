use super::*;
use serde_json::json;

fn channel(name: &str, time: &[f64], raw: &[f64], baseline: &[f64]) -> Channel {
    Channel {
        name: name.to_owned(),
        time_values: time.iter().copied().map(Some).collect(),
        raw_values: raw.iter().copied().map(Some).collect(),
        baseline_values: baseline.iter().copied().map(Some).collect(),
        integral_results: Vec::new(),
    }
}

fn result(start: f64, end: f64, area: f64) -> IntegralResult {
    match json!({"start": start, "end": end, "area": area}) {
        Value::Object(map) => IntegralResult::new(map),
        _ => unreachable!(),
    }
}

#[test]
fn test_raw_table_shape() {
    // Prepare
    let channels = vec![
        channel("B", &[0.0, 1.0, 2.0], &[4.0, 5.0, 6.0], &[]),
        channel("A", &[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0], &[]),
    ];

    // Execute
    let table = series_table(&channels, SeriesKind::Raw);

    // Validate
    assert_eq!(vec!["Time/s", "A", "B"], table.header);
    assert_eq!(3, table.rows.len());
    assert_eq!(vec![json!(1.0), json!(2.0), json!(5.0)], table.rows[1]);
}

#[test]
fn test_missing_baseline_values_are_null() {
    // Prepare
    let channels = vec![
        channel("A", &[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0], &[0.5, 0.6, 0.7]),
        channel("B", &[0.0, 1.0, 2.0], &[4.0, 5.0, 6.0], &[0.1]),
    ];

    // Execute
    let table = series_table(&channels, SeriesKind::Baseline);

    // Validate
    assert_eq!(3, table.rows.len());
    assert_eq!(vec![json!(2.0), json!(0.7), Value::Null], table.rows[2]);
}

#[test]
fn test_longest_series_defines_rows() {
    let channels = vec![channel("A", &[0.0], &[1.0, 2.0], &[])];
    let table = series_table(&channels, SeriesKind::Raw);
    assert_eq!(2, table.rows.len());
    assert_eq!(vec![Value::Null, json!(2.0)], table.rows[1]);
}

#[test]
fn test_no_channels() {
    let table = series_table(&[], SeriesKind::Raw);
    assert_eq!(vec!["Time/s"], table.header);
    assert!(table.rows.is_empty());

    let table = summary_table(&[]);
    assert_eq!(vec!["measurement"], table.header);
    assert!(table.rows.is_empty());
}

#[test]
fn test_summary_pads_short_channels() {
    // Prepare
    let mut a = channel("A", &[], &[], &[]);
    a.integral_results = vec![result(1.0, 2.0, 0.5), result(3.0, 4.0, 0.25)];
    let b = channel("B", &[], &[], &[]);

    // Execute
    let table = summary_table(&[b, a]);

    // Validate
    assert_eq!(7, table.header.len());
    assert_eq!("sample2_area", table.header[6]);
    assert_eq!(2, table.rows.len());
    assert_eq!(table.rows[0].len(), table.rows[1].len());
    assert_eq!(json!("A"), table.rows[0][0]);
    assert_eq!(json!(0.25), table.rows[0][6]);
    assert_eq!(json!("B"), table.rows[1][0]);
    assert!(table.rows[1][1..].iter().all(|cell| cell == &json!("nan")));
}

#[test]
fn test_summary_missing_keys() {
    let mut a = channel("A", &[], &[], &[]);
    a.integral_results = vec![match json!({"start": 1.0, "area": null}) {
        Value::Object(map) => IntegralResult::new(map),
        _ => unreachable!(),
    }];
    let table = summary_table(&[a]);
    assert_eq!(
        vec![json!("A"), json!(1.0), json!("nan"), json!("nan")],
        table.rows[0]
    );
}

#[test]
fn test_from_json() {
    let time = json!([0.0, 1.0, 2.0]);
    let raw = json!([1.0, null, "x"]);
    let results = json!([{"start": 0.0}, 5]);
    let channel = Channel::from_json("A".to_owned(), Some(&time), Some(&raw), None, Some(&results));
    assert_eq!(3, channel.time_values.len());
    assert_eq!(vec![Some(1.0), None, None], channel.raw_values);
    assert!(channel.baseline_values.is_empty());
    assert_eq!(1, channel.integral_results.len());
}

#[test]
fn test_serialized_as_rows() {
    let channels = vec![channel("A", &[0.0], &[1.5], &[])];
    let table = series_table(&channels, SeriesKind::Raw);
    let serialized = serde_json::to_value(&table).unwrap();
    assert_eq!(json!([["Time/s", "A"], [0.0, 1.5]]), serialized);
}

#[test]
fn test_csv_rendering() {
    let mut channels = vec![channel("A", &[0.0, 1.0], &[1.5, 2.5], &[0.5])];
    channels[0].name = "ch, 1".to_owned();
    let table = series_table(&channels, SeriesKind::Baseline);
    let csv = table.to_csv().unwrap();
    assert_eq!("Time/s,\"ch, 1\"\n0.0,0.5\n1.0,\n", csv);
}
