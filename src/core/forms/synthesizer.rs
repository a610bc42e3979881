use crate::core::forms::{FormField, FormStructure, SelectChoice};
use crate::core::rule::{OptionDescriptor, OptionRule, ValueKind};
use crate::core::types::InputType;
use serde_json::json;
use std::collections::HashSet;
use tracing::debug;

/// Project an option rule into a renderable form tree.
///
/// Structural and total: every declared option becomes exactly one field in
/// declaration order. Groups render once, at the position of their first
/// member. No live input is consulted; the result describes possible shapes.
pub fn synthesize<T: Into<String>>(name: T, rule: &OptionRule) -> FormStructure {
    let name = name.into();
    let mut forms = Vec::with_capacity(rule.options.len());
    let mut emitted_groups: HashSet<&str> = HashSet::new();

    for option in &rule.options {
        if let Some(group) = rule
            .exclusive_groups
            .iter()
            .find(|g| g.members.contains(&option.name))
        {
            if emitted_groups.insert(group.name.as_str()) {
                let choices = group
                    .members
                    .iter()
                    .filter_map(|member| rule.option(member))
                    .map(|member| SelectChoice {
                        label: member.label.clone(),
                        value: json!(member.name),
                        fields: vec![field_for(member)],
                    })
                    .collect();
                forms.push(FormField::ExclusiveSelect {
                    group: group.name.clone(),
                    label: group.name.clone(),
                    required: group.default_member.is_none(),
                    default_member: group.default_member.clone(),
                    choices,
                });
            }
            continue;
        }

        if let Some(group) = rule
            .bundle_groups
            .iter()
            .find(|g| g.members.contains(&option.name))
        {
            if emitted_groups.insert(group.name.as_str()) {
                let fields = group
                    .members
                    .iter()
                    .filter_map(|member| rule.option(member))
                    .map(field_for)
                    .collect();
                forms.push(FormField::Bundle {
                    group: group.name.clone(),
                    label: group.name.clone(),
                    fields,
                });
            }
            continue;
        }

        forms.push(field_for(option));
    }

    debug!(form = %name, fields = forms.len(), "synthesized form structure");
    FormStructure { name, forms }
}

fn field_for(option: &OptionDescriptor) -> FormField {
    match &option.kind {
        ValueKind::Text => FormField::Input {
            field: option.name.clone(),
            label: option.label.clone(),
            required: option.required,
            default: option.default.clone(),
            input_type: option.input,
        },
        ValueKind::Int | ValueKind::Float => FormField::Input {
            field: option.name.clone(),
            label: option.label.clone(),
            required: option.required,
            default: option.default.clone(),
            input_type: match option.input {
                InputType::Text => InputType::Number,
                other => other,
            },
        },
        ValueKind::Boolean => FormField::Select {
            field: option.name.clone(),
            label: option.label.clone(),
            required: option.required,
            default: option.default.clone(),
            choices: vec![
                SelectChoice::plain("true", json!(true)),
                SelectChoice::plain("false", json!(false)),
            ],
        },
        ValueKind::Enumerated(variants) => FormField::Select {
            field: option.name.clone(),
            label: option.label.clone(),
            required: option.required,
            default: option.default.clone(),
            choices: variants
                .iter()
                .map(|variant| SelectChoice::plain(variant.clone(), json!(variant)))
                .collect(),
        },
        ValueKind::Object(children) => FormField::Object {
            field: option.name.clone(),
            label: option.label.clone(),
            required: option.required,
            fields: children.iter().map(field_for).collect(),
        },
        ValueKind::List(element) => FormField::List {
            field: option.name.clone(),
            label: option.label.clone(),
            required: option.required,
            element: Box::new(field_for(&OptionDescriptor::new(
                "item",
                (**element).clone(),
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rule::{BundleGroup, ColumnRef, ExclusiveGroup};
    use serde_json::json;

    fn descriptor(name: &str, kind: ValueKind) -> OptionDescriptor {
        OptionDescriptor::new(name, kind)
    }

    #[test]
    fn every_option_becomes_one_field_in_order() {
        let rule = OptionRule::builder()
            .required(descriptor("query", ValueKind::Text))
            .optional(descriptor("limit", ValueKind::Int).with_default(json!(10)))
            .optional(descriptor("dry_run", ValueKind::Boolean))
            .build()
            .expect("rule");
        let form = synthesize("SQL", &rule);
        assert_eq!(form.name, "SQL");
        assert_eq!(form.forms.len(), 3);
        let names: Vec<_> = form.option_field_names().into_iter().collect();
        assert_eq!(names, vec!["dry_run", "limit", "query"]);
        match &form.forms[1] {
            FormField::Input {
                field,
                input_type,
                default,
                required,
                ..
            } => {
                assert_eq!(field, "limit");
                assert_eq!(*input_type, InputType::Number);
                assert_eq!(default, &Some(json!(10)));
                assert!(!required);
            }
            other => panic!("expected input, got {:?}", other),
        }
    }

    #[test]
    fn exclusive_group_renders_one_select_with_member_subfields() {
        let rule = OptionRule::builder()
            .optional(
                descriptor("include_columns", ValueKind::List(Box::new(ValueKind::Text)))
                    .with_column_ref(ColumnRef::any())
                    .with_default(json!([])),
            )
            .optional(
                descriptor("exclude_columns", ValueKind::List(Box::new(ValueKind::Text)))
                    .with_column_ref(ColumnRef::any()),
            )
            .exclusive(ExclusiveGroup {
                name: "mode".to_string(),
                members: vec!["include_columns".to_string(), "exclude_columns".to_string()],
                default_member: Some("include_columns".to_string()),
            })
            .build()
            .expect("rule");
        let form = synthesize("FILTER", &rule);
        assert_eq!(form.forms.len(), 1);
        match &form.forms[0] {
            FormField::ExclusiveSelect {
                group,
                required,
                default_member,
                choices,
                ..
            } => {
                assert_eq!(group, "mode");
                assert!(!required);
                assert_eq!(default_member.as_deref(), Some("include_columns"));
                assert_eq!(choices.len(), 2);
                assert_eq!(choices[0].value, json!("include_columns"));
                assert_eq!(choices[0].fields.len(), 1);
            }
            other => panic!("expected exclusive select, got {:?}", other),
        }
        let names: Vec<_> = form.option_field_names().into_iter().collect();
        assert_eq!(names, vec!["exclude_columns", "include_columns"]);
    }

    #[test]
    fn bundle_group_renders_members_together() {
        let rule = OptionRule::builder()
            .required(descriptor("pattern", ValueKind::Text))
            .optional(descriptor("is_regex", ValueKind::Boolean))
            .optional(descriptor("replace_first", ValueKind::Boolean))
            .bundled(BundleGroup {
                name: "regex".to_string(),
                members: vec!["is_regex".to_string(), "replace_first".to_string()],
            })
            .build()
            .expect("rule");
        let form = synthesize("REPLACE", &rule);
        assert_eq!(form.forms.len(), 2);
        match &form.forms[1] {
            FormField::Bundle { group, fields, .. } => {
                assert_eq!(group, "regex");
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected bundle, got {:?}", other),
        }
    }

    #[test]
    fn enumerated_and_object_options_synthesize() {
        let rule = OptionRule::builder()
            .required(descriptor(
                "format",
                ValueKind::Enumerated(vec!["json".to_string(), "csv".to_string()]),
            ))
            .optional(descriptor(
                "mapping",
                ValueKind::Object(vec![
                    descriptor("source", ValueKind::Text),
                    descriptor("target", ValueKind::Text),
                ]),
            ))
            .build()
            .expect("rule");
        let form = synthesize("COPY", &rule);
        match &form.forms[0] {
            FormField::Select { choices, .. } => assert_eq!(choices.len(), 2),
            other => panic!("expected select, got {:?}", other),
        }
        match &form.forms[1] {
            FormField::Object { fields, .. } => assert_eq!(fields.len(), 2),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn synthesis_is_deterministic() {
        let rule = OptionRule::builder()
            .required(descriptor("query", ValueKind::Text))
            .optional(descriptor("limit", ValueKind::Int))
            .build()
            .expect("rule");
        let first = serde_json::to_string(&synthesize("SQL", &rule)).expect("json");
        let second = serde_json::to_string(&synthesize("SQL", &rule)).expect("json");
        assert_eq!(first, second);
    }
}
