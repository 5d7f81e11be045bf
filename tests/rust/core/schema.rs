//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.

use proptest::prelude::*;
use serde_json::Value;
use zicsv::{ZiColumnMeta, ZiFieldDescriptor, ZiResolvedSchema, ZiTableMeta, ZiTypeDescriptor};

fn field(name: &str) -> ZiFieldDescriptor<Value> {
    let key = name.to_string();
    ZiFieldDescriptor::getter(name, "json", move |v: &Value| v[&key].clone())
}

fn names(schema: &ZiResolvedSchema<Value>) -> Vec<String> {
    schema.fields().iter().map(|f| f.name.clone()).collect()
}

fn mixed_type(table: ZiTableMeta) -> ZiTypeDescriptor<Value> {
    ZiTypeDescriptor::builder("Account")
        .table(table)
        .field(field("id").column(ZiColumnMeta::new().title("Id")))
        .field(field("note"))
        .field(field("VERSION").column(ZiColumnMeta::new()).static_field())
        .field(field("secret").column(ZiColumnMeta::new()).excluded())
        .field(field("created").column(ZiColumnMeta::new().title("Created")).inherited())
        .field(field("owner").inherited())
        .build()
        .unwrap()
}

#[test]
fn test_annotated_fields_only_by_default() {
    let schema = ZiResolvedSchema::resolve(&mixed_type(ZiTableMeta::default()), &[]).unwrap();
    assert_eq!(names(&schema), vec!["id", "created"]);
}

#[test]
fn test_exclude_parent_keeps_declared_fields() {
    let table = ZiTableMeta::new().exclude_parent(true);
    let schema = ZiResolvedSchema::resolve(&mixed_type(table), &[]).unwrap();
    assert_eq!(names(&schema), vec!["id"]);
}

#[test]
fn test_include_all_fields() {
    let table = ZiTableMeta::new().include_all_fields(true);
    let schema = ZiResolvedSchema::resolve(&mixed_type(table), &[]).unwrap();
    assert_eq!(names(&schema), vec!["id", "note", "created", "owner"]);

    let table = ZiTableMeta::new().include_all_fields(true).exclude_parent(true);
    let schema = ZiResolvedSchema::resolve(&mixed_type(table), &[]).unwrap();
    assert_eq!(names(&schema), vec!["id", "note"]);
}

#[test]
fn test_static_fields_kept_when_not_ignored() {
    let table = ZiTableMeta::new().ignore_static_fields(false);
    let schema = ZiResolvedSchema::resolve(&mixed_type(table), &[]).unwrap();
    assert_eq!(names(&schema), vec!["id", "VERSION", "created"]);
}

#[test]
fn test_excluded_field_never_exported() {
    let table = ZiTableMeta::new().include_all_fields(true).ignore_static_fields(false);
    let schema = ZiResolvedSchema::resolve(&mixed_type(table), &[]).unwrap();
    assert!(!names(&schema).contains(&"secret".to_string()));
}

#[test]
fn test_group_filtering() {
    let descriptor = ZiTypeDescriptor::builder("Grouped")
        .field(field("ab").column(ZiColumnMeta::new().groups(["A", "B"])))
        .field(field("none").column(ZiColumnMeta::new()))
        .field(field("c").column(ZiColumnMeta::new().groups(["C"])))
        .build()
        .unwrap();

    let schema = ZiResolvedSchema::resolve(&descriptor, &["B", "C"]).unwrap();
    assert_eq!(names(&schema), vec!["ab", "c"]);

    let schema = ZiResolvedSchema::resolve(&descriptor, &["C", "D"]).unwrap();
    assert_eq!(names(&schema), vec!["c"]);

    let schema = ZiResolvedSchema::resolve(&descriptor, &[]).unwrap();
    assert_eq!(names(&schema), vec!["ab", "none", "c"]);
}

#[test]
fn test_padded_group_tags_match_on_both_sides() {
    let descriptor = ZiTypeDescriptor::builder("Padded")
        .field(field("x").column(ZiColumnMeta::new().groups(["x "])))
        .field(field("y").column(ZiColumnMeta::new().groups([" y"])))
        .build()
        .unwrap();

    let schema = ZiResolvedSchema::resolve(&descriptor, &["x "]).unwrap();
    assert_eq!(names(&schema), vec!["x"]);

    let schema = ZiResolvedSchema::resolve(&descriptor, &["y"]).unwrap();
    assert_eq!(names(&schema), vec!["y"]);
}

#[test]
fn test_unannotated_field_dropped_once_groups_requested() {
    let table = ZiTableMeta::new().include_all_fields(true);
    let schema = ZiResolvedSchema::resolve(&mixed_type(table), &["any"]).unwrap();
    assert!(schema.is_empty());
}

#[test]
fn test_titles_fall_back_to_field_name() {
    let table = ZiTableMeta::new().include_all_fields(true).use_field_name_as_title(true);
    let schema = ZiResolvedSchema::resolve(&mixed_type(table), &[]).unwrap();
    let titles: Vec<_> = schema.titles().unwrap().iter().map(|t| t.as_deref()).collect();
    assert_eq!(titles, vec![Some("Id"), Some("note"), Some("Created"), Some("owner")]);
}

#[test]
fn test_titles_keep_nulls_next_to_real_titles() {
    let schema = ZiResolvedSchema::resolve(
        &ZiTypeDescriptor::builder("Partial")
            .field(field("a").column(ZiColumnMeta::new().title("A")))
            .field(field("b").column(ZiColumnMeta::new()))
            .build()
            .unwrap(),
        &[],
    )
    .unwrap();
    assert_eq!(schema.titles().unwrap(), [Some("A".to_string()), None]);
    assert_eq!(schema.titles().unwrap().len(), schema.len());
}

#[test]
fn test_blank_titles_mean_headerless() {
    let descriptor = ZiTypeDescriptor::builder("Blank")
        .field(field("a").column(ZiColumnMeta::new().title("")))
        .field(field("b").column(ZiColumnMeta::new().title("   ")))
        .field(field("c").column(ZiColumnMeta::new()))
        .build()
        .unwrap();
    let schema = ZiResolvedSchema::resolve(&descriptor, &[]).unwrap();
    assert_eq!(schema.len(), 3);
    assert!(schema.titles().is_none());
}

#[test]
fn test_defaults_follow_sorted_positions() {
    let descriptor = ZiTypeDescriptor::builder("Defaults")
        .table(ZiTableMeta::new().default_value("-"))
        .field(field("late").column(ZiColumnMeta::new().order(5).default_value("L")))
        .field(field("early").column(ZiColumnMeta::new().order(1)))
        .build()
        .unwrap();
    let schema = ZiResolvedSchema::resolve(&descriptor, &[]).unwrap();
    assert_eq!(names(&schema), vec!["early", "late"]);
    assert_eq!(schema.default_value(0), None);
    assert_eq!(schema.default_value(1), Some("L"));
    assert_eq!(schema.global_default(), Some("-"));
}

proptest! {
    #[test]
    fn test_sort_is_stable_for_any_orders(orders in proptest::collection::vec(-3i32..3, 0..40)) {
        let mut builder = ZiTypeDescriptor::builder("Random");
        for (i, order) in orders.iter().enumerate() {
            builder = builder.field(field(&format!("f{}", i)).column(ZiColumnMeta::new().order(*order)));
        }
        let schema = ZiResolvedSchema::resolve(&builder.build().unwrap(), &[]).unwrap();

        let mut expected: Vec<usize> = (0..orders.len()).collect();
        expected.sort_by_key(|i| orders[*i]);
        let expected: Vec<String> = expected.into_iter().map(|i| format!("f{}", i)).collect();
        prop_assert_eq!(names(&schema), expected);
    }
}
