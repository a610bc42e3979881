use crate::core::error::AppError;
use crate::core::registry::TransformStrategy;
use crate::core::rule::{ColumnRef, ExclusiveGroup, OptionDescriptor, OptionRule, ValueKind};
use crate::core::types::Transform;

/// Keeps or drops a set of upstream columns. Include and exclude lists are
/// mutually exclusive; submitting neither resolves to an empty exclude list,
/// so every column passes through.
pub struct FilterStrategy;

impl TransformStrategy for FilterStrategy {
    fn transform(&self) -> Transform {
        Transform::Filter
    }

    fn option_rule(&self) -> Result<OptionRule, AppError> {
        OptionRule::builder()
            .optional(
                OptionDescriptor::new("include_columns", ValueKind::List(Box::new(ValueKind::Text)))
                    .with_label("Columns to keep")
                    .with_column_ref(ColumnRef::any()),
            )
            .optional(
                OptionDescriptor::new("exclude_columns", ValueKind::List(Box::new(ValueKind::Text)))
                    .with_label("Columns to drop")
                    .with_column_ref(ColumnRef::any())
                    .with_default(serde_json::json!([])),
            )
            .exclusive(ExclusiveGroup {
                name: "mode".to_string(),
                members: vec!["include_columns".to_string(), "exclude_columns".to_string()],
                default_member: Some("exclude_columns".to_string()),
            })
            .build()
    }
}
