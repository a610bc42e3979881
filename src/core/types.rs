use serde::{Deserialize, Serialize};

/// Transform kind enumeration. Closed set of plugin identifiers; new plugins
/// register a strategy for an existing variant rather than subclassing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Transform {
    Copy,
    FieldMapper,
    Filter,
    Replace,
    Split,
    Sql,
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Transform::Copy => "COPY",
            Transform::FieldMapper => "FIELDMAPPER",
            Transform::Filter => "FILTER",
            Transform::Replace => "REPLACE",
            Transform::Split => "SPLIT",
            Transform::Sql => "SQL",
        };
        write!(f, "{}", tag)
    }
}

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    RegistryError,
    RuleError,
    ValidationError,
    SerializationError,
    InternalError,
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error severity enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Error,
    Warning,
    Info,
    Debug,
}

/// Rendering hint for text inputs, mirrored into synthesized form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Text,
    Password,
    Textarea,
    Number,
}
