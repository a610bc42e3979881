use crate::core::error::AppError;
use crate::core::registry::TransformStrategy;
use crate::core::rule::{BundleGroup, ColumnRef, OptionDescriptor, OptionRule, ValueKind};
use crate::core::schema::ColumnType;
use crate::core::types::Transform;

/// Rewrites matching substrings in one string column. The regex flags form a
/// bundle: either both are submitted or plain substring replacement is used.
pub struct ReplaceStrategy;

impl TransformStrategy for ReplaceStrategy {
    fn transform(&self) -> Transform {
        Transform::Replace
    }

    fn option_rule(&self) -> Result<OptionRule, AppError> {
        OptionRule::builder()
            .required(
                OptionDescriptor::new("replace_column", ValueKind::Text)
                    .with_label("Column to rewrite")
                    .with_column_ref(ColumnRef::of(vec![ColumnType::String])),
            )
            .required(OptionDescriptor::new("pattern", ValueKind::Text).with_label("Pattern"))
            .required(
                OptionDescriptor::new("replacement", ValueKind::Text).with_label("Replacement"),
            )
            .optional(
                OptionDescriptor::new("is_regex", ValueKind::Boolean).with_label("Treat as regex"),
            )
            .optional(
                OptionDescriptor::new("replace_first", ValueKind::Boolean)
                    .with_label("Replace first match only"),
            )
            .bundled(BundleGroup {
                name: "regex".to_string(),
                members: vec!["is_regex".to_string(), "replace_first".to_string()],
            })
            .build()
    }
}
