//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.

use std::thread;
use std::time::Duration;

use proptest::prelude::*;
use serde_json::{json, Value};
use zicsv::{
    extract_row, render_rows, ZiColumnMeta, ZiCsvConfig, ZiError, ZiFieldDescriptor,
    ZiResolvedSchema, ZiTableMeta, ZiTypeDescriptor,
};

#[derive(Debug, Clone)]
struct Reading {
    id: usize,
    value: Option<f64>,
    delay_us: u64,
}

fn reading_schema() -> ZiResolvedSchema<Reading> {
    let descriptor = ZiTypeDescriptor::builder("Reading")
        .field(
            ZiFieldDescriptor::getter("id", "usize", |r: &Reading| {
                thread::sleep(Duration::from_micros(r.delay_us));
                json!(r.id)
            })
            .column(ZiColumnMeta::new().title("Id")),
        )
        .field(
            ZiFieldDescriptor::getter("value", "f64", |r: &Reading| json!(r.value))
                .column(ZiColumnMeta::new().title("Value").default_value("n/a")),
        )
        .build()
        .unwrap();
    ZiResolvedSchema::resolve(&descriptor, &[]).unwrap()
}

fn parallel_config() -> ZiCsvConfig {
    ZiCsvConfig {
        min_parallel_records: 0,
        max_threads: Some(8),
        ..Default::default()
    }
}

fn precedence_schema(field_default: Option<&str>, global_default: Option<&str>) -> ZiResolvedSchema<Value> {
    let mut column = ZiColumnMeta::new();
    if let Some(default) = field_default {
        column = column.default_value(default);
    }
    let mut table = ZiTableMeta::new();
    if let Some(default) = global_default {
        table = table.default_value(default);
    }
    let descriptor = ZiTypeDescriptor::builder("Cell")
        .table(table)
        .field(ZiFieldDescriptor::getter("v", "json", |r: &Value| r["v"].clone()).column(column))
        .build()
        .unwrap();
    ZiResolvedSchema::resolve(&descriptor, &[]).unwrap()
}

#[test]
fn test_field_default_wins_over_global_default() {
    let schema = precedence_schema(Some("field"), Some("global"));
    assert_eq!(extract_row(&json!({}), 0, &schema).unwrap(), vec![json!("field")]);
}

#[test]
fn test_global_default_used_without_field_default() {
    let schema = precedence_schema(None, Some("global"));
    assert_eq!(extract_row(&json!({}), 0, &schema).unwrap(), vec![json!("global")]);
}

#[test]
fn test_null_without_any_default() {
    let schema = precedence_schema(None, None);
    assert_eq!(extract_row(&json!({}), 0, &schema).unwrap(), vec![Value::Null]);
}

#[test]
fn test_present_value_ignores_defaults() {
    let schema = precedence_schema(Some("field"), Some("global"));
    assert_eq!(extract_row(&json!({"v": 0}), 0, &schema).unwrap(), vec![json!(0)]);
}

#[test]
fn test_row_length_matches_schema() {
    let schema = reading_schema();
    let row = extract_row(&Reading { id: 1, value: None, delay_us: 0 }, 0, &schema).unwrap();
    assert_eq!(row.len(), schema.len());
    assert_eq!(row, vec![json!(1), json!("n/a")]);
}

#[test]
fn test_field_access_fault_aborts_parallel_batch() {
    let descriptor = ZiTypeDescriptor::builder("Fragile")
        .field(
            ZiFieldDescriptor::new("v", "json", |r: &Value| {
                r.get("v")
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("field not readable"))
            })
            .column(ZiColumnMeta::new()),
        )
        .build()
        .unwrap();
    let schema = ZiResolvedSchema::resolve(&descriptor, &[]).unwrap();

    let mut records: Vec<Value> = (0..500).map(|i| json!({"v": i})).collect();
    records[321] = json!({});

    let err = render_rows(&records, &schema, &parallel_config()).unwrap_err();
    assert_eq!(err, ZiError::field_access("v", 321, "field not readable"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_parallel_rows_follow_input_order(delays in proptest::collection::vec(0u64..200, 0..300)) {
        let records: Vec<Reading> = delays
            .iter()
            .enumerate()
            .map(|(id, delay_us)| Reading {
                id,
                value: if id % 3 == 0 { None } else { Some(id as f64 / 2.0) },
                delay_us: *delay_us,
            })
            .collect();

        let rows = render_rows(&records, &reading_schema(), &parallel_config()).unwrap();

        prop_assert_eq!(rows.len(), records.len());
        for (record, row) in records.iter().zip(&rows) {
            prop_assert_eq!(&row[0], &json!(record.id));
            let expected = record.value.map_or(json!("n/a"), |v| json!(v));
            prop_assert_eq!(&row[1], &expected);
        }
    }
}
