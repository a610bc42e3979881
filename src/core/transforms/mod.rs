#![allow(clippy::result_large_err)] // Strategy construction returns AppError for structured diagnostics.

use crate::core::error::AppError;
use crate::core::registry::TransformRegistry;

mod copy;
mod field_mapper;
mod filter;
mod replace;
mod split;
mod sql;

pub use copy::CopyStrategy;
pub use field_mapper::FieldMapperStrategy;
pub use filter::FilterStrategy;
pub use replace::ReplaceStrategy;
pub use split::SplitStrategy;
pub use sql::SqlStrategy;

/// Registry with every built-in transform strategy bound, the way the
/// plugin-loading subsystem wires it at startup.
pub fn default_registry() -> Result<TransformRegistry, AppError> {
    let mut builder = TransformRegistry::builder();
    builder
        .register(CopyStrategy)?
        .register(FieldMapperStrategy)?
        .register(FilterStrategy)?
        .register(ReplaceStrategy)?
        .register(SplitStrategy)?
        .register(SqlStrategy)?;
    Ok(builder.build())
}
