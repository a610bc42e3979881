pub mod config;
pub mod error;
pub mod forms;
pub mod merge;
pub mod registry;
pub mod rule;
pub mod schema;
pub mod transforms;
pub mod types;

pub use config::{Config, TransformOptions};
pub use error::AppError;
pub use forms::{synthesize, FormField, FormStructure, SelectChoice};
pub use merge::{merge, MergeError, MergeErrors};
pub use registry::{DispatchError, TransformRegistry, TransformRegistryBuilder, TransformStrategy};
pub use rule::{BundleGroup, ColumnRef, ExclusiveGroup, OptionDescriptor, OptionRule, ValueKind};
pub use schema::{ColumnType, TableField, TableSchemaReq};
pub use transforms::default_registry;
pub use types::*;
