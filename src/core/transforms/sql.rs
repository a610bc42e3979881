use crate::core::config::Config;
use crate::core::error::AppError;
use crate::core::registry::TransformStrategy;
use crate::core::rule::{OptionDescriptor, OptionRule, ValueKind};
use crate::core::types::{InputType, Transform};
use serde_json::json;

/// Runs a free-form SQL statement over the upstream dataset.
pub struct SqlStrategy;

impl TransformStrategy for SqlStrategy {
    fn transform(&self) -> Transform {
        Transform::Sql
    }

    fn option_rule(&self) -> Result<OptionRule, AppError> {
        OptionRule::builder()
            .required(
                OptionDescriptor::new("query", ValueKind::Text)
                    .with_label("Query")
                    .with_input(InputType::Textarea),
            )
            .optional(
                OptionDescriptor::new("result_table_name", ValueKind::Text)
                    .with_label("Result table name")
                    .with_default(json!("transformed")),
            )
            .build()
    }

    fn base_config(&self) -> Config {
        [("engine".to_string(), json!("zeta"))].into_iter().collect()
    }
}
