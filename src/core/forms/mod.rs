use crate::core::types::InputType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

mod synthesizer;

pub use synthesizer::synthesize;

/// UI-renderable form tree derived from an option rule. The web console
/// consumes the serialized JSON to build page form elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormStructure {
    pub name: String,
    pub forms: Vec<FormField>,
}

impl FormStructure {
    /// Set of option names represented in the tree. Group nodes contribute
    /// their member fields, not the group label.
    pub fn option_field_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_names(&self.forms, &mut names);
        names
    }
}

fn collect_names(fields: &[FormField], names: &mut BTreeSet<String>) {
    for field in fields {
        match field {
            FormField::Input { field, .. }
            | FormField::Select { field, .. }
            | FormField::List { field, .. }
            | FormField::Object { field, .. } => {
                names.insert(field.clone());
            }
            FormField::ExclusiveSelect { choices, .. } => {
                for choice in choices {
                    collect_names(&choice.fields, names);
                }
            }
            FormField::Bundle { fields, .. } => collect_names(fields, names),
        }
    }
}

/// One renderable field. `type`-tagged so the UI can switch on the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormField {
    Input {
        field: String,
        label: String,
        required: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<Value>,
        input_type: InputType,
    },
    Select {
        field: String,
        label: String,
        required: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<Value>,
        choices: Vec<SelectChoice>,
    },
    List {
        field: String,
        label: String,
        required: bool,
        element: Box<FormField>,
    },
    /// Nested-object option rendered as one titled sub-form.
    Object {
        field: String,
        label: String,
        required: bool,
        fields: Vec<FormField>,
    },
    /// Exclusive group: a single-select whose choices carry the selected
    /// member's own sub-fields.
    ExclusiveSelect {
        group: String,
        label: String,
        required: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        default_member: Option<String>,
        choices: Vec<SelectChoice>,
    },
    /// Bundle group: members render together or not at all.
    Bundle {
        group: String,
        label: String,
        fields: Vec<FormField>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectChoice {
    pub label: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FormField>,
}

impl SelectChoice {
    pub fn plain<T: Into<String>>(label: T, value: Value) -> Self {
        SelectChoice {
            label: label.into(),
            value,
            fields: vec![],
        }
    }
}
