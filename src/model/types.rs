//! Model types and traits

use super::naming::{quote_ident, to_column_name};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

// ============================================================================
// Values
// ============================================================================

/// A scalar value of a paging key
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Field type this value belongs to (None for null)
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(FieldType::Bool),
            Value::Int(_) => Some(FieldType::Int),
            Value::Float(_) => Some(FieldType::Float),
            Value::Text(_) => Some(FieldType::Text),
            Value::Timestamp(_) => Some(FieldType::Timestamp),
        }
    }

    /// Convert to JSON.
    ///
    /// Returns `None` for non-finite floats, which JSON cannot represent.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;

        let json = match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::Number((*i).into()),
            Value::Float(f) => Json::Number(serde_json::Number::from_f64(*f)?),
            Value::Text(s) => Json::String(s.clone()),
            Value::Timestamp(ts) => Json::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        };
        Some(json)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// ============================================================================
// Field Types
// ============================================================================

/// Scalar type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Text,
    Timestamp,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => write!(f, "bool"),
            FieldType::Int => write!(f, "int"),
            FieldType::Float => write!(f, "float"),
            FieldType::Text => write!(f, "text"),
            FieldType::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// What a field holds
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A scalar column
    Scalar {
        /// Scalar type
        field_type: FieldType,
        /// Whether the column may hold NULL
        nullable: bool,
    },
    /// An embedded record stored in its own table (composed/joined models)
    Embedded(ModelSchema),
}

/// Field definition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Logical field name, as used in paging keys
    pub name: String,
    /// Explicit column name; derived from `name` when absent
    pub column: Option<String>,
    /// Field contents
    pub kind: FieldKind,
}

impl FieldDef {
    /// Create a non-nullable scalar field
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            column: None,
            kind: FieldKind::Scalar {
                field_type,
                nullable: false,
            },
        }
    }

    /// Create a nullable scalar field
    pub fn nullable(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            column: None,
            kind: FieldKind::Scalar {
                field_type,
                nullable: true,
            },
        }
    }

    /// Create an embedded sub-record field
    pub fn embedded(name: impl Into<String>, schema: ModelSchema) -> Self {
        Self {
            name: name.into(),
            column: None,
            kind: FieldKind::Embedded(schema),
        }
    }

    /// Override the storage column name
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Storage column name: the override, or the snake_case field name
    pub fn column_name(&self) -> String {
        self.column
            .clone()
            .unwrap_or_else(|| to_column_name(&self.name))
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Schema of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    storage_name: String,
    fields: Vec<FieldDef>,
}

/// A dotted field path resolved against a schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedField<'a> {
    /// The scalar field the path ends at
    pub field: &'a FieldDef,
    /// Its scalar type
    pub field_type: FieldType,
    /// Whether it may hold NULL
    pub nullable: bool,
    /// Storage name of the (sub-)schema owning the field
    pub storage_name: &'a str,
}

impl ResolvedField<'_> {
    /// Qualified column reference: `<table>.<column>`, quoting the column
    /// when it is not a plain identifier
    pub fn column_ref(&self) -> String {
        format!("{}.{}", self.storage_name, quote_ident(&self.field.column_name()))
    }
}

impl ModelSchema {
    /// Create an empty schema stored under the given table name
    pub fn new(storage_name: impl Into<String>) -> Self {
        Self {
            storage_name: storage_name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Registered storage (table) name
    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    /// All top-level fields
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a top-level field by name
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolve a field path such as `createdAt` or `order.createdAt`.
    ///
    /// Every segment but the last must name an embedded field; the last must
    /// name a scalar field. The owning table is the storage name of the
    /// innermost embedded schema.
    pub fn resolve(&self, path: &str) -> Option<ResolvedField<'_>> {
        let mut segments = path.split('.').peekable();
        let mut current = self;

        while let Some(segment) = segments.next() {
            let field = current.get_field(segment)?;
            match (&field.kind, segments.peek().is_some()) {
                (FieldKind::Embedded(schema), true) => current = schema,
                (
                    FieldKind::Scalar {
                        field_type,
                        nullable,
                    },
                    false,
                ) => {
                    return Some(ResolvedField {
                        field,
                        field_type: *field_type,
                        nullable: *nullable,
                        storage_name: &current.storage_name,
                    });
                }
                _ => return None,
            }
        }

        None
    }
}

// ============================================================================
// Traits
// ============================================================================

/// A fetched row whose paging key values can be read back
pub trait Record {
    /// Value at a field path, or `None` if the path is not part of the record
    fn value(&self, path: &str) -> Option<Value>;
}

/// A statically-shaped record type with a fixed schema
pub trait Model: Record {
    /// Schema describing this record type
    fn schema() -> ModelSchema;
}
