use crate::core::config::{Config, TransformOptions};
use crate::core::rule::OptionRule;
use crate::core::schema::{column_compatible, ColumnType, TableSchemaReq};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

mod coerce;

pub use coerce::coerce;

/// One merge failure. Serializes field-indexed so the UI can attach the
/// message to the offending form element.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum MergeError {
    #[error("required option {option} is missing and has no default")]
    MissingRequiredOption { option: String },

    #[error("exclusive group {group} allows one selection, got: {}", selected.join(", "))]
    ExclusiveGroupConflict { group: String, selected: Vec<String> },

    #[error("bundle group {group} is incomplete, missing: {}", missing.join(", "))]
    IncompleteBundle {
        group: String,
        present: Vec<String>,
        missing: Vec<String>,
    },

    #[error("option {option} references unknown column {column}")]
    UnknownColumnReference { option: String, column: String },

    #[error(
        "option {option} references column {column} of type {actual}, expected one of [{}]",
        expected.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
    )]
    SchemaTypeMismatch {
        option: String,
        column: String,
        actual: ColumnType,
        expected: Vec<ColumnType>,
    },

    #[error("option {option} expects {expected}, got {value}")]
    ValueCoercionError {
        option: String,
        expected: String,
        value: Value,
    },
}

/// Aggregated merge failure. Every problem found is reported; no partial
/// config is ever produced alongside it.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[error("merge failed with {} error(s): {}", errors.len(), errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
#[serde(transparent)]
pub struct MergeErrors {
    pub errors: Vec<MergeError>,
}

impl MergeErrors {
    pub fn contains(&self, predicate: impl Fn(&MergeError) -> bool) -> bool {
        self.errors.iter().any(predicate)
    }
}

/// Column type compatibility hook; strategies may substitute their own table.
pub type CompatFn<'a> = &'a dyn Fn(&[ColumnType], ColumnType) -> bool;

/// Merge plugin base config, rule defaults, and validated user input into a
/// final execution config, using the default column compatibility table.
pub fn merge(
    base_config: &Config,
    user_options: &TransformOptions,
    rule: &OptionRule,
    schema: &TableSchemaReq,
) -> Result<Config, MergeErrors> {
    merge_with(base_config, user_options, rule, schema, &column_compatible)
}

/// Merge with a plugin-supplied compatibility hook. All-or-nothing: every
/// validation pass runs and every failure is reported before composition.
pub fn merge_with(
    base_config: &Config,
    user_options: &TransformOptions,
    rule: &OptionRule,
    schema: &TableSchemaReq,
    compat: CompatFn<'_>,
) -> Result<Config, MergeErrors> {
    let mut errors = Vec::new();
    let grouped = rule.grouped_member_names();

    for (name, _) in user_options.iter() {
        if rule.option(name).is_none() {
            warn!(option = %name, "ignoring option not declared by the rule");
        }
    }

    // Presence: required ungrouped options need a user value or a default.
    for option in &rule.options {
        if option.required
            && !grouped.contains(option.name.as_str())
            && !user_options.contains(&option.name)
            && option.default.is_none()
        {
            errors.push(MergeError::MissingRequiredOption {
                option: option.name.clone(),
            });
        }
    }

    // Exclusivity: at most one member present; zero falls back to the
    // declared default member.
    let mut group_defaults: Vec<(String, Value)> = Vec::new();
    for group in &rule.exclusive_groups {
        let present: Vec<String> = group
            .members
            .iter()
            .filter(|member| user_options.contains(member))
            .cloned()
            .collect();
        match present.len() {
            0 => match group
                .default_member
                .as_ref()
                .and_then(|m| rule.option(m))
                .and_then(|m| m.default.as_ref().map(|d| (m.name.clone(), d.clone())))
            {
                // The resolved selection always lands in the output config.
                Some(entry) => group_defaults.push(entry),
                None => errors.push(MergeError::MissingRequiredOption {
                    option: group.name.clone(),
                }),
            },
            1 => {}
            _ => errors.push(MergeError::ExclusiveGroupConflict {
                group: group.name.clone(),
                selected: present,
            }),
        }
    }

    // Bundles: all members or none.
    for group in &rule.bundle_groups {
        let (present, missing): (Vec<String>, Vec<String>) = group
            .members
            .iter()
            .cloned()
            .partition(|member| user_options.contains(member));
        if !present.is_empty() && !missing.is_empty() {
            errors.push(MergeError::IncompleteBundle {
                group: group.name.clone(),
                present,
                missing,
            });
        }
    }

    // Coercion: every present value goes through its declared kind.
    let mut coerced: IndexMap<String, Value> = IndexMap::new();
    for option in &rule.options {
        if let Some(raw) = user_options.get(&option.name) {
            if let Some(value) = coerce::coerce(&option.name, &option.kind, raw, &mut errors) {
                coerced.insert(option.name.clone(), value);
            }
        }
    }

    // Schema references: every named column must exist with a compatible
    // declared type. Checked against the coerced value, so a numeric raw
    // input still resolves to a column name and gets validated.
    for option in &rule.options {
        let Some(column_ref) = &option.column_ref else {
            continue;
        };
        let Some(value) = coerced.get(&option.name) else {
            continue;
        };
        for column in referenced_columns(value) {
            match schema.field(column) {
                None => errors.push(MergeError::UnknownColumnReference {
                    option: option.name.clone(),
                    column: column.to_string(),
                }),
                Some(field) => {
                    if !compat(&column_ref.compatible, field.field_type) {
                        errors.push(MergeError::SchemaTypeMismatch {
                            option: option.name.clone(),
                            column: column.to_string(),
                            actual: field.field_type,
                            expected: column_ref.compatible.clone(),
                        });
                    }
                }
            }
        }
    }

    if !errors.is_empty() {
        debug!(count = errors.len(), "merge rejected");
        return Err(MergeErrors { errors });
    }

    // Composition: base config, then rule defaults, then group-resolved
    // defaults, then user values. Always written in rule declaration order
    // so map iteration never leaks into the output.
    let mut config = base_config.clone();
    for option in &rule.options {
        if grouped.contains(option.name.as_str()) {
            continue;
        }
        if let Some(default) = &option.default {
            config.insert(option.name.clone(), default.clone());
        }
    }
    for (name, value) in group_defaults {
        config.insert(name, value);
    }
    for option in &rule.options {
        if let Some(value) = coerced.get(&option.name) {
            config.insert(option.name.clone(), value.clone());
        }
    }

    debug!(entries = config.len(), "merge composed config");
    Ok(config)
}

/// Column names referenced by a coerced option value: a single name or a list.
fn referenced_columns(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => vec![],
    }
}
