//! Schema-driven rows
//!
//! `DynamicRecord` holds one row of a table known only at runtime. Its
//! columns are the scalar fields of a `ModelSchema`, read in field order.

use super::engine::{read_value, DuckDbQuery};
use crate::model::{FieldKind, ModelSchema, Record, Value};
use duckdb::{Connection, Row};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A row as ordered `(field, value)` pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRecord {
    columns: Vec<(String, Value)>,
}

impl DynamicRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push((name.into(), value.into()));
        self
    }

    /// Value of a column
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// All columns, in select order
    pub fn columns(&self) -> &[(String, Value)] {
        &self.columns
    }

    /// Select every scalar field of `schema` from its table
    pub fn select<'conn>(conn: &'conn Connection, schema: &ModelSchema) -> DuckDbQuery<'conn, Self> {
        let fields: Vec<(String, String)> = schema
            .fields()
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::Scalar { .. }))
            .map(|f| (f.name.clone(), f.column_name()))
            .collect();

        let select_list = fields
            .iter()
            .map(|(_, column)| {
                format!("{}.\"{}\"", schema.storage_name(), column.replace('"', "\"\""))
            })
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT {select_list} FROM {}", schema.storage_name());

        let names: Vec<String> = fields.into_iter().map(|(name, _)| name).collect();
        DuckDbQuery::with_mapper(conn, sql, move |row| Self::from_row(row, &names))
    }

    fn from_row(row: &Row<'_>, names: &[String]) -> duckdb::Result<Self> {
        let columns = names
            .iter()
            .enumerate()
            .map(|(idx, name)| Ok((name.clone(), read_value(row, idx)?)))
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(Self { columns })
    }
}

impl Record for DynamicRecord {
    fn value(&self, path: &str) -> Option<Value> {
        self.get(path).cloned()
    }
}

impl Serialize for DynamicRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            // non-finite floats have no JSON form
            map.serialize_entry(name, &value.to_json().unwrap_or(serde_json::Value::Null))?;
        }
        map.end()
    }
}
