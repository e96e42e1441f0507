//! Runtime schema introspection
//!
//! Builds a `ModelSchema` for a table from `information_schema.columns`, so
//! tables without a Rust model can still be paginated. Field names are the
//! column names as stored.
//!
//! Only columns whose values survive a token round trip become fields.
//! `UBIGINT`/`HUGEINT` may exceed `i64`, and types such as `DECIMAL`, `TIME`,
//! `UUID` or `BLOB` have no key value that binds back to the column, so those
//! columns are left out of the schema (and of `DynamicRecord` rows).

use crate::error::{Error, Result};
use crate::model::{FieldDef, FieldType, ModelSchema};
use duckdb::Connection;

/// Describe `table` (optionally `schema.table`)
pub fn table_schema(conn: &Connection, table: &str) -> Result<ModelSchema> {
    let (schema_name, table_name) = match table.split_once('.') {
        Some((schema, name)) => (Some(schema), name),
        None => (None, table),
    };

    let mut sql = String::from(
        "SELECT column_name, data_type, is_nullable \
         FROM information_schema.columns \
         WHERE table_name = ?",
    );
    let mut params = vec![table_name];
    if let Some(schema_name) = schema_name {
        sql.push_str(" AND table_schema = ?");
        params.push(schema_name);
    }
    sql.push_str(" ORDER BY ordinal_position");

    let mut stmt = conn.prepare(&sql)?;
    let columns = stmt
        .query_map(duckdb::params_from_iter(params), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<duckdb::Result<Vec<_>>>()?;

    if columns.is_empty() {
        return Err(Error::config(format!("Table '{table}' not found")));
    }

    tracing::debug!("Table {} has {} columns", table, columns.len());

    let mut schema = ModelSchema::new(table);
    for (name, data_type, nullable) in columns {
        let Some(field_type) = field_type_of(&data_type) else {
            tracing::debug!("Skipping column {}.{} of type {}", table, name, data_type);
            continue;
        };
        let field = if nullable.eq_ignore_ascii_case("YES") {
            FieldDef::nullable(name.clone(), field_type)
        } else {
            FieldDef::new(name.clone(), field_type)
        };
        schema = schema.field(field.with_column(name));
    }

    Ok(schema)
}

/// Map a DuckDB type name to a key type, or `None` when values of that type
/// cannot be carried in a token
pub fn field_type_of(data_type: &str) -> Option<FieldType> {
    let upper = data_type.to_ascii_uppercase();
    let base = upper.split('(').next().unwrap_or_default().trim();

    match base {
        "BOOLEAN" | "BOOL" => Some(FieldType::Bool),
        "TINYINT" | "SMALLINT" | "INTEGER" | "INT" | "BIGINT" | "UTINYINT" | "USMALLINT"
        | "UINTEGER" => Some(FieldType::Int),
        "FLOAT" | "REAL" | "DOUBLE" => Some(FieldType::Float),
        "VARCHAR" | "TEXT" | "STRING" | "CHAR" | "BPCHAR" => Some(FieldType::Text),
        "DATE" => Some(FieldType::Timestamp),
        t if t.starts_with("TIMESTAMP") => Some(FieldType::Timestamp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("BIGINT", Some(FieldType::Int))]
    #[test_case("integer", Some(FieldType::Int))]
    #[test_case("UINTEGER", Some(FieldType::Int))]
    #[test_case("DOUBLE", Some(FieldType::Float))]
    #[test_case("BOOLEAN", Some(FieldType::Bool))]
    #[test_case("TIMESTAMP", Some(FieldType::Timestamp))]
    #[test_case("TIMESTAMP WITH TIME ZONE", Some(FieldType::Timestamp))]
    #[test_case("DATE", Some(FieldType::Timestamp))]
    #[test_case("VARCHAR", Some(FieldType::Text))]
    #[test_case("UBIGINT", None)]
    #[test_case("HUGEINT", None)]
    #[test_case("DECIMAL(18,3)", None)]
    #[test_case("TIME", None)]
    #[test_case("UUID", None)]
    #[test_case("BLOB", None)]
    fn test_field_type_of(data_type: &str, expected: Option<FieldType>) {
        assert_eq!(field_type_of(data_type), expected);
    }

    #[test]
    fn test_table_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE events (id BIGINT NOT NULL, createdAt TIMESTAMP NOT NULL, label VARCHAR);",
        )
        .unwrap();

        let schema = table_schema(&conn, "events").unwrap();
        assert_eq!(schema.storage_name(), "events");

        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "createdAt", "label"]);

        let created = schema.resolve("createdAt").unwrap();
        assert_eq!(created.field_type, FieldType::Timestamp);
        assert!(!created.nullable);
        assert_eq!(created.column_ref(), "events.createdAt");

        let label = schema.resolve("label").unwrap();
        assert_eq!(label.field_type, FieldType::Text);
        assert!(label.nullable);
    }

    #[test]
    fn test_table_schema_skips_unsupported_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE prices (id INTEGER NOT NULL, big UBIGINT, price DECIMAL(18,3), \"at\" TIME, sku VARCHAR);",
        )
        .unwrap();

        let schema = table_schema(&conn, "prices").unwrap();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "sku"]);
        assert!(schema.resolve("price").is_none());
        assert!(schema.resolve("big").is_none());
    }

    #[test]
    fn test_table_schema_quotes_unusual_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE people (\"display name\" VARCHAR);")
            .unwrap();

        let schema = table_schema(&conn, "people").unwrap();
        let field = schema.resolve("display name").unwrap();
        assert_eq!(field.column_ref(), "people.\"display name\"");
    }

    #[test]
    fn test_table_schema_qualified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE things (id INTEGER);").unwrap();

        let schema = table_schema(&conn, "main.things").unwrap();
        assert_eq!(schema.fields().len(), 1);
    }

    #[test]
    fn test_table_schema_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        let err = table_schema(&conn, "nothing").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
