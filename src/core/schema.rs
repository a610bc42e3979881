use serde::{Deserialize, Serialize};

/// Declared type of an upstream table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal,
    Date,
    Time,
    Timestamp,
    Bytes,
}

impl ColumnType {
    /// Whether a column declared as `actual` satisfies an option expecting
    /// `self`. The table is explicit: exact matches plus a small set of
    /// declared widenings. Anything else is incompatible.
    pub fn accepts(self, actual: ColumnType) -> bool {
        if self == actual {
            return true;
        }
        match self {
            ColumnType::BigInt => matches!(
                actual,
                ColumnType::TinyInt | ColumnType::SmallInt | ColumnType::Int
            ),
            ColumnType::Int => matches!(actual, ColumnType::TinyInt | ColumnType::SmallInt),
            ColumnType::Double => matches!(actual, ColumnType::Float),
            _ => false,
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnType::String => "string",
            ColumnType::Boolean => "boolean",
            ColumnType::TinyInt => "tinyint",
            ColumnType::SmallInt => "smallint",
            ColumnType::Int => "int",
            ColumnType::BigInt => "bigint",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::Decimal => "decimal",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Bytes => "bytes",
        };
        write!(f, "{}", name)
    }
}

/// Default column compatibility check for schema-referencing options.
/// An empty expectation list accepts any declared column type.
pub fn column_compatible(expected: &[ColumnType], actual: ColumnType) -> bool {
    expected.is_empty() || expected.iter().any(|e| e.accepts(actual))
}

/// A single column of the upstream dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: ColumnType,
}

impl TableField {
    pub fn new<T: Into<String>>(name: T, field_type: ColumnType) -> Self {
        TableField {
            name: name.into(),
            field_type,
        }
    }
}

/// Ordered upstream table schema supplied by the caller per request.
/// Read-only to this crate; column names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchemaReq {
    pub fields: Vec<TableField>,
}

impl TableSchemaReq {
    pub fn new(fields: Vec<TableField>) -> Self {
        TableSchemaReq { fields }
    }

    pub fn field(&self, name: &str) -> Option<&TableField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}
