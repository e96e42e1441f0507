//! Database support via DuckDB
//!
//! This module runs paginated statements on a DuckDB connection and
//! describes tables at runtime for callers without a compiled model.

mod engine;
mod record;
mod schema;

pub use engine::{
    from_duckdb_value, read_optional_timestamp, read_timestamp, read_value, to_duckdb_value,
    DuckDbQuery, FromRow,
};
pub use record::DynamicRecord;
pub use schema::{field_type_of, table_schema};
