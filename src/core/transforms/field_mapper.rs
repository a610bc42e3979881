use crate::core::error::AppError;
use crate::core::registry::TransformStrategy;
use crate::core::rule::{ColumnRef, OptionDescriptor, OptionRule, ValueKind};
use crate::core::types::Transform;

/// Maps one upstream column to a new output name.
pub struct FieldMapperStrategy;

impl TransformStrategy for FieldMapperStrategy {
    fn transform(&self) -> Transform {
        Transform::FieldMapper
    }

    fn option_rule(&self) -> Result<OptionRule, AppError> {
        OptionRule::builder()
            .required(
                OptionDescriptor::new("source_column", ValueKind::Text)
                    .with_label("Source column")
                    .with_column_ref(ColumnRef::any()),
            )
            .required(
                OptionDescriptor::new("target_column", ValueKind::Text)
                    .with_label("Target column"),
            )
            .build()
    }
}
