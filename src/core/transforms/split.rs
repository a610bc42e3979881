use crate::core::error::AppError;
use crate::core::registry::TransformStrategy;
use crate::core::rule::{ColumnRef, OptionDescriptor, OptionRule, ValueKind};
use crate::core::schema::ColumnType;
use crate::core::types::Transform;

/// Splits one string column into several output columns on a separator.
pub struct SplitStrategy;

impl TransformStrategy for SplitStrategy {
    fn transform(&self) -> Transform {
        Transform::Split
    }

    fn option_rule(&self) -> Result<OptionRule, AppError> {
        OptionRule::builder()
            .required(
                OptionDescriptor::new("split_column", ValueKind::Text)
                    .with_label("Column to split")
                    .with_column_ref(ColumnRef::of(vec![ColumnType::String])),
            )
            .required(
                OptionDescriptor::new("separator", ValueKind::Text)
                    .with_label("Separator")
                    .with_default(serde_json::json!(",")),
            )
            // Output columns are created by the transform, so they are not
            // schema references.
            .required(
                OptionDescriptor::new("output_columns", ValueKind::List(Box::new(ValueKind::Text)))
                    .with_label("Output columns"),
            )
            .build()
    }
}
