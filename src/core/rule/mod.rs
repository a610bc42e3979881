#![allow(clippy::result_large_err)] // Rule building returns AppError to preserve structured validation context without boxing.

use crate::core::error::AppError;
use crate::core::schema::ColumnType;
use crate::core::types::{ErrorCategory, InputType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Declared value kind of a configuration option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "detail")]
pub enum ValueKind {
    Text,
    Int,
    Float,
    Boolean,
    Enumerated(Vec<String>),
    Object(Vec<OptionDescriptor>),
    List(Box<ValueKind>),
}

/// Marks an option as a reference to an upstream input column.
/// An empty compatibility list accepts any declared column type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub compatible: Vec<ColumnType>,
}

impl ColumnRef {
    pub fn any() -> Self {
        ColumnRef { compatible: vec![] }
    }

    pub fn of(compatible: Vec<ColumnType>) -> Self {
        ColumnRef { compatible }
    }
}

/// A single declared configuration option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    pub name: String,
    pub label: String,
    pub kind: ValueKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub input: InputType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_ref: Option<ColumnRef>,
}

impl OptionDescriptor {
    pub fn new<T: Into<String>>(name: T, kind: ValueKind) -> Self {
        let name = name.into();
        OptionDescriptor {
            label: name.clone(),
            name,
            kind,
            required: false,
            default: None,
            input: InputType::default(),
            column_ref: None,
        }
    }

    pub fn with_label<T: Into<String>>(mut self, label: T) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_input(mut self, input: InputType) -> Self {
        self.input = input;
        self
    }

    pub fn with_column_ref(mut self, column_ref: ColumnRef) -> Self {
        self.column_ref = Some(column_ref);
        self
    }
}

/// Exactly one member of an exclusive group may be present in a resolved
/// configuration. Zero present resolves to the declared default member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusiveGroup {
    pub name: String,
    pub members: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_member: Option<String>,
}

/// Members of a bundle group appear together or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleGroup {
    pub name: String,
    pub members: Vec<String>,
}

/// Declarative schema of a plugin's configuration surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionRule {
    pub options: Vec<OptionDescriptor>,
    #[serde(default)]
    pub exclusive_groups: Vec<ExclusiveGroup>,
    #[serde(default)]
    pub bundle_groups: Vec<BundleGroup>,
}

impl OptionRule {
    pub fn builder() -> OptionRuleBuilder {
        OptionRuleBuilder::default()
    }

    pub fn option(&self, name: &str) -> Option<&OptionDescriptor> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Names of options that belong to some exclusive or bundle group.
    pub fn grouped_member_names(&self) -> HashSet<&str> {
        let mut names = HashSet::new();
        for group in &self.exclusive_groups {
            names.extend(group.members.iter().map(String::as_str));
        }
        for group in &self.bundle_groups {
            names.extend(group.members.iter().map(String::as_str));
        }
        names
    }
}

/// Builder used by plugins to declare their option rule.
#[derive(Debug, Default)]
pub struct OptionRuleBuilder {
    options: Vec<OptionDescriptor>,
    exclusive_groups: Vec<ExclusiveGroup>,
    bundle_groups: Vec<BundleGroup>,
}

impl OptionRuleBuilder {
    pub fn required(mut self, mut descriptor: OptionDescriptor) -> Self {
        descriptor.required = true;
        self.options.push(descriptor);
        self
    }

    pub fn optional(mut self, mut descriptor: OptionDescriptor) -> Self {
        descriptor.required = false;
        self.options.push(descriptor);
        self
    }

    pub fn exclusive(mut self, group: ExclusiveGroup) -> Self {
        self.exclusive_groups.push(group);
        self
    }

    pub fn bundled(mut self, group: BundleGroup) -> Self {
        self.bundle_groups.push(group);
        self
    }

    /// Validate and freeze the rule. A failure here is a registration-time
    /// programming error, not a runtime condition.
    pub fn build(self) -> Result<OptionRule, AppError> {
        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.name.as_str()) {
                return Err(AppError::new(
                    ErrorCategory::RuleError,
                    format!("duplicate option name: {}", option.name),
                ));
            }
            validate_descriptor(option)?;
        }

        let mut group_names = HashSet::new();
        let mut grouped_members: HashSet<&str> = HashSet::new();
        let exclusive = self.exclusive_groups.iter().map(|g| (&g.name, &g.members));
        let bundled = self.bundle_groups.iter().map(|g| (&g.name, &g.members));
        for (name, members) in exclusive.chain(bundled) {
            if !group_names.insert(name.as_str()) || seen.contains(name.as_str()) {
                return Err(AppError::new(
                    ErrorCategory::RuleError,
                    format!("group name is not unique: {}", name),
                ));
            }
            if members.is_empty() {
                return Err(AppError::new(
                    ErrorCategory::RuleError,
                    format!("group {} has no members", name),
                ));
            }
            for member in members {
                if !seen.contains(member.as_str()) {
                    return Err(AppError::new(
                        ErrorCategory::RuleError,
                        format!("group {} references unknown option: {}", name, member),
                    ));
                }
                if !grouped_members.insert(member.as_str()) {
                    return Err(AppError::new(
                        ErrorCategory::RuleError,
                        format!("option {} belongs to more than one group", member),
                    ));
                }
            }
        }

        for group in &self.exclusive_groups {
            if let Some(default_member) = &group.default_member {
                if !group.members.contains(default_member) {
                    return Err(AppError::new(
                        ErrorCategory::RuleError,
                        format!(
                            "group {} default member {} is not a member",
                            group.name, default_member
                        ),
                    ));
                }
                // The default member resolves the zero-selection case, so it
                // must carry a value to resolve to.
                let has_default = self
                    .options
                    .iter()
                    .any(|o| o.name == *default_member && o.default.is_some());
                if !has_default {
                    return Err(AppError::new(
                        ErrorCategory::RuleError,
                        format!(
                            "group {} default member {} has no default value",
                            group.name, default_member
                        ),
                    ));
                }
            }
        }

        Ok(OptionRule {
            options: self.options,
            exclusive_groups: self.exclusive_groups,
            bundle_groups: self.bundle_groups,
        })
    }
}

fn validate_descriptor(descriptor: &OptionDescriptor) -> Result<(), AppError> {
    if descriptor.name.trim().is_empty() {
        return Err(AppError::new(
            ErrorCategory::RuleError,
            "option name must not be empty",
        ));
    }
    if descriptor.column_ref.is_some() {
        let refers_to_columns = matches!(descriptor.kind, ValueKind::Text)
            || matches!(&descriptor.kind, ValueKind::List(elem) if **elem == ValueKind::Text);
        if !refers_to_columns {
            return Err(AppError::new(
                ErrorCategory::RuleError,
                format!(
                    "column-ref option {} must be text or a list of text",
                    descriptor.name
                ),
            ));
        }
    }
    if let ValueKind::Enumerated(variants) = &descriptor.kind {
        if variants.is_empty() {
            return Err(AppError::new(
                ErrorCategory::RuleError,
                format!("enumerated option {} has no variants", descriptor.name),
            ));
        }
    }
    if let ValueKind::Object(nested) = &descriptor.kind {
        let mut nested_seen = HashSet::new();
        for child in nested {
            if !nested_seen.insert(child.name.as_str()) {
                return Err(AppError::new(
                    ErrorCategory::RuleError,
                    format!(
                        "duplicate option name {} inside {}",
                        child.name, descriptor.name
                    ),
                ));
            }
            validate_descriptor(child)?;
        }
    }
    Ok(())
}
