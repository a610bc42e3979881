use dynaform::core::config::TransformOptions;
use dynaform::core::merge::MergeError;
use dynaform::core::registry::DispatchError;
use dynaform::core::schema::{ColumnType, TableField, TableSchemaReq};
use dynaform::core::transforms::default_registry;
use dynaform::core::types::Transform;
use serde_json::{json, Value};

fn schema() -> TableSchemaReq {
    TableSchemaReq::new(vec![
        TableField::new("id", ColumnType::Int),
        TableField::new("name", ColumnType::String),
    ])
}

fn options(pairs: &[(&str, Value)]) -> TransformOptions {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn merge_errors(err: DispatchError) -> Vec<MergeError> {
    match err {
        DispatchError::Merge(errors) => errors.errors,
        DispatchError::Registry(err) => panic!("expected merge failure, got {}", err),
    }
}

#[test]
fn field_mapper_merges_a_valid_mapping() {
    let registry = default_registry().expect("registry");
    let user = options(&[
        ("source_column", json!("id")),
        ("target_column", json!("identifier")),
    ]);
    let config = registry
        .merge_config(Transform::FieldMapper, &user, &schema())
        .expect("config");
    assert_eq!(config.get("source_column"), Some(&json!("id")));
    assert_eq!(config.get("target_column"), Some(&json!("identifier")));
}

#[test]
fn field_mapper_rejects_an_unknown_source_column() {
    let registry = default_registry().expect("registry");
    let user = options(&[
        ("source_column", json!("missing")),
        ("target_column", json!("identifier")),
    ]);
    let err = registry
        .merge_config(Transform::FieldMapper, &user, &schema())
        .expect_err("unknown column");
    let errors = merge_errors(err);
    assert!(errors.iter().any(|e| matches!(
        e,
        MergeError::UnknownColumnReference { option, column }
            if option == "source_column" && column == "missing"
    )));
}

#[test]
fn filter_rejects_both_modes_at_once() {
    let registry = default_registry().expect("registry");
    let user = options(&[
        ("include_columns", json!(["id"])),
        ("exclude_columns", json!(["name"])),
    ]);
    let err = registry
        .merge_config(Transform::Filter, &user, &schema())
        .expect_err("conflict");
    let errors = merge_errors(err);
    assert!(errors.iter().any(|e| matches!(
        e,
        MergeError::ExclusiveGroupConflict { group, .. } if group == "mode"
    )));
}

#[test]
fn filter_accepts_exactly_one_mode() {
    let registry = default_registry().expect("registry");
    let user = options(&[("exclude_columns", json!(["name"]))]);
    let config = registry
        .merge_config(Transform::Filter, &user, &schema())
        .expect("config");
    assert_eq!(config.get("exclude_columns"), Some(&json!(["name"])));
    assert!(!config.contains("include_columns"));
}

#[test]
fn filter_without_a_mode_resolves_to_excluding_nothing() {
    let registry = default_registry().expect("registry");
    let config = registry
        .merge_config(Transform::Filter, &TransformOptions::new(), &schema())
        .expect("config");
    // The resolved selection is visible to the execution engine.
    assert_eq!(config.get("exclude_columns"), Some(&json!([])));
    assert!(!config.contains("include_columns"));
}

#[test]
fn filter_rejects_numeric_column_names() {
    let registry = default_registry().expect("registry");
    let user = options(&[("include_columns", json!([5]))]);
    let err = registry
        .merge_config(Transform::Filter, &user, &schema())
        .expect_err("no column named 5");
    assert!(merge_errors(err).iter().any(|e| matches!(
        e,
        MergeError::UnknownColumnReference { option, column }
            if option == "include_columns" && column == "5"
    )));
}

#[test]
fn replace_requires_the_whole_regex_bundle() {
    let registry = default_registry().expect("registry");
    let base = &[
        ("replace_column", json!("name")),
        ("pattern", json!("a")),
        ("replacement", json!("b")),
    ];
    let mut partial = base.to_vec();
    partial.push(("is_regex", json!(true)));
    let err = registry
        .merge_config(Transform::Replace, &options(&partial), &schema())
        .expect_err("partial bundle");
    assert!(merge_errors(err).iter().any(|e| matches!(
        e,
        MergeError::IncompleteBundle { group, .. } if group == "regex"
    )));

    let mut whole = base.to_vec();
    whole.push(("is_regex", json!(true)));
    whole.push(("replace_first", json!("false")));
    let config = registry
        .merge_config(Transform::Replace, &options(&whole), &schema())
        .expect("config");
    // String form input is coerced to a real boolean.
    assert_eq!(config.get("replace_first"), Some(&json!(false)));
}

#[test]
fn replace_rejects_a_non_string_column() {
    let registry = default_registry().expect("registry");
    let user = options(&[
        ("replace_column", json!("id")),
        ("pattern", json!("a")),
        ("replacement", json!("b")),
    ]);
    let err = registry
        .merge_config(Transform::Replace, &user, &schema())
        .expect_err("type mismatch");
    assert!(merge_errors(err).iter().any(|e| matches!(
        e,
        MergeError::SchemaTypeMismatch { option, column, actual, .. }
            if option == "replace_column" && column == "id" && *actual == ColumnType::Int
    )));
}

#[test]
fn split_applies_the_separator_default() {
    let registry = default_registry().expect("registry");
    let user = options(&[
        ("split_column", json!("name")),
        ("output_columns", json!(["first", "last"])),
    ]);
    let config = registry
        .merge_config(Transform::Split, &user, &schema())
        .expect("config");
    assert_eq!(config.get("separator"), Some(&json!(",")));
    assert_eq!(config.get("output_columns"), Some(&json!(["first", "last"])));
}

#[test]
fn sql_base_config_sits_beneath_user_values() {
    let registry = default_registry().expect("registry");
    let user = options(&[("query", json!("select * from t"))]);
    let config = registry
        .merge_config(Transform::Sql, &user, &schema())
        .expect("config");
    assert_eq!(config.get("engine"), Some(&json!("zeta")));
    assert_eq!(config.get("result_table_name"), Some(&json!("transformed")));
    assert_eq!(config.get("query"), Some(&json!("select * from t")));
    // Base entries come first, user-visible options follow rule order.
    let keys: Vec<_> = config.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["engine", "result_table_name", "query"]);
}

#[test]
fn copy_coerces_nested_entries_and_reports_nested_paths() {
    let registry = default_registry().expect("registry");
    let user = options(&[(
        "copies",
        json!([
            {"source_column": "id", "target_column": "id_copy"},
            {"source_column": "name"}
        ]),
    )]);
    let err = registry
        .merge_config(Transform::Copy, &user, &schema())
        .expect_err("missing nested target");
    assert!(merge_errors(err).iter().any(|e| matches!(
        e,
        MergeError::MissingRequiredOption { option } if option == "copies[1].target_column"
    )));

    let user = options(&[(
        "copies",
        json!([{"source_column": "id", "target_column": "id_copy"}]),
    )]);
    let config = registry
        .merge_config(Transform::Copy, &user, &schema())
        .expect("config");
    assert_eq!(
        config.get("copies"),
        Some(&json!([{"source_column": "id", "target_column": "id_copy"}]))
    );
}

#[test]
fn merge_never_returns_a_partial_config() {
    let registry = default_registry().expect("registry");
    // Both a missing required option and a bad column in one submission.
    let user = options(&[("source_column", json!("missing"))]);
    let err = registry
        .merge_config(Transform::FieldMapper, &user, &schema())
        .expect_err("two problems");
    let errors = merge_errors(err);
    assert_eq!(errors.len(), 2);
}

#[test]
fn merge_is_deterministic_across_calls() {
    let registry = default_registry().expect("registry");
    let user = options(&[("query", json!("select 1"))]);
    let first = registry
        .merge_config(Transform::Sql, &user, &schema())
        .expect("first");
    let second = registry
        .merge_config(Transform::Sql, &user, &schema())
        .expect("second");
    assert_eq!(
        serde_json::to_string(&first).expect("json"),
        serde_json::to_string(&second).expect("json")
    );
}

#[test]
fn merge_errors_serialize_field_indexed_for_the_ui() {
    let registry = default_registry().expect("registry");
    let err = registry
        .merge_config(Transform::Sql, &TransformOptions::new(), &schema())
        .expect_err("missing query");
    let errors = merge_errors(err);
    let rendered = serde_json::to_value(&errors).expect("json");
    assert_eq!(
        rendered,
        json!([{"error": "missing_required_option", "option": "query"}])
    );
}
