#![allow(clippy::result_large_err)] // Registry APIs return AppError directly for structured diagnostics without boxing.

use crate::core::config::{Config, TransformOptions};
use crate::core::error::AppError;
use crate::core::forms::{synthesize, FormStructure};
use crate::core::merge::{merge_with, MergeErrors};
use crate::core::rule::OptionRule;
use crate::core::schema::{self, ColumnType, TableSchemaReq};
use crate::core::types::{ErrorCategory, Transform};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

/// Per-plugin strategy: supplies the option rule, the engine base config,
/// and optionally a custom column compatibility table. The merge engine
/// itself never special-cases a transform variant.
pub trait TransformStrategy: Send + Sync + 'static {
    /// Variant this strategy is registered for.
    fn transform(&self) -> Transform;

    /// Declarative option rule for this plugin.
    fn option_rule(&self) -> Result<OptionRule, AppError>;

    /// Engine defaults merged beneath rule defaults and user values.
    fn base_config(&self) -> Config {
        Config::new()
    }

    /// Column type compatibility for schema-referencing options.
    fn column_compatible(&self, expected: &[ColumnType], actual: ColumnType) -> bool {
        schema::column_compatible(expected, actual)
    }
}

/// Request-level dispatch failure: either no plugin is bound to the variant
/// or the merge itself rejected the submitted options.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Registry(#[from] AppError),
    #[error(transparent)]
    Merge(#[from] MergeErrors),
}

/// Builder used to register strategies during plugin discovery.
pub struct TransformRegistryBuilder {
    strategies: IndexMap<Transform, Arc<dyn TransformStrategy>>,
}

impl Default for TransformRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformRegistryBuilder {
    pub fn new() -> Self {
        Self {
            strategies: IndexMap::new(),
        }
    }

    /// Bind a strategy to its variant. Registering the same variant twice is
    /// a startup programming error.
    pub fn register<T: TransformStrategy>(&mut self, strategy: T) -> Result<&mut Self, AppError> {
        let transform = strategy.transform();
        if self.strategies.contains_key(&transform) {
            let mut error = AppError::new(
                ErrorCategory::RegistryError,
                format!("duplicate registration for transform {}", transform),
            );
            error.add_context("transform", &transform.to_string());
            return Err(error);
        }
        debug!(%transform, "registered transform strategy");
        self.strategies.insert(transform, Arc::new(strategy));
        Ok(self)
    }

    /// Replace any existing binding for the variant.
    pub fn register_replacing<T: TransformStrategy>(&mut self, strategy: T) -> &mut Self {
        let transform = strategy.transform();
        debug!(%transform, "registered transform strategy (replacing)");
        self.strategies.insert(transform, Arc::new(strategy));
        self
    }

    pub fn build(self) -> TransformRegistry {
        TransformRegistry {
            inner: Arc::new(self.strategies),
        }
    }
}

/// Immutable catalog of transform strategies. Cheap to clone and safe for
/// concurrent reads; runtime re-registration builds a new registry and swaps
/// the handle so in-flight resolves never see a partial table.
#[derive(Clone)]
pub struct TransformRegistry {
    inner: Arc<IndexMap<Transform, Arc<dyn TransformStrategy>>>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformRegistry {
    pub fn new() -> Self {
        TransformRegistryBuilder::new().build()
    }

    pub fn builder() -> TransformRegistryBuilder {
        TransformRegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn transforms(&self) -> impl Iterator<Item = Transform> + '_ {
        self.inner.keys().copied()
    }

    /// Pure lookup; fails when no plugin is bound to the variant.
    pub fn resolve(&self, transform: Transform) -> Result<Arc<dyn TransformStrategy>, AppError> {
        self.inner.get(&transform).cloned().ok_or_else(|| {
            let mut error = AppError::new(
                ErrorCategory::RegistryError,
                format!("no strategy registered for transform {}", transform),
            );
            error.add_context("transform", &transform.to_string());
            error
        })
    }

    /// Resolve the variant's rule and synthesize its renderable form.
    pub fn form_structure(&self, transform: Transform) -> Result<FormStructure, AppError> {
        let strategy = self.resolve(transform)?;
        let rule = strategy.option_rule()?;
        Ok(synthesize(transform.to_string(), &rule))
    }

    /// Resolve the variant's strategy and run the schema-aware merge.
    pub fn merge_config(
        &self,
        transform: Transform,
        user_options: &TransformOptions,
        input_schema: &TableSchemaReq,
    ) -> Result<Config, DispatchError> {
        let strategy = self.resolve(transform)?;
        let rule = strategy.option_rule()?;
        let base = strategy.base_config();
        let compat = |expected: &[ColumnType], actual: ColumnType| {
            strategy.column_compatible(expected, actual)
        };
        let config = merge_with(&base, user_options, &rule, input_schema, &compat)?;
        Ok(config)
    }
}
