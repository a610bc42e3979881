use crate::core::error::AppError;
use crate::core::registry::TransformStrategy;
use crate::core::rule::{OptionDescriptor, OptionRule, ValueKind};
use crate::core::types::Transform;

/// Duplicates upstream columns under new names.
pub struct CopyStrategy;

impl TransformStrategy for CopyStrategy {
    fn transform(&self) -> Transform {
        Transform::Copy
    }

    fn option_rule(&self) -> Result<OptionRule, AppError> {
        let entry = ValueKind::Object(vec![
            {
                let mut source = OptionDescriptor::new("source_column", ValueKind::Text)
                    .with_label("Source column");
                source.required = true;
                source
            },
            {
                let mut target = OptionDescriptor::new("target_column", ValueKind::Text)
                    .with_label("Target column");
                target.required = true;
                target
            },
        ]);
        OptionRule::builder()
            .required(
                OptionDescriptor::new("copies", ValueKind::List(Box::new(entry)))
                    .with_label("Copies"),
            )
            .build()
    }
}
