//! DuckDB-backed statement
//!
//! `DuckDbQuery` is a SELECT that the paginator narrows with a keyset
//! predicate, an ORDER BY and a LIMIT before running it against a DuckDB
//! connection. The base SQL may join and alias tables freely but must not
//! carry its own WHERE, ORDER BY or LIMIT; add extra conditions with
//! [`Statement::filter`] instead.

use crate::error::Result;
use crate::model::Value;
use crate::pagination::Statement;
use chrono::{DateTime, NaiveDate, Utc};
use duckdb::types::{TimeUnit, Type, Value as DuckValue};
use duckdb::{Connection, Row};
use std::fmt;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Build a value from one result row
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> duckdb::Result<Self>;
}

type RowMapper<'conn, T> = Box<dyn Fn(&Row<'_>) -> duckdb::Result<T> + 'conn>;

/// A SELECT statement bound to a DuckDB connection
pub struct DuckDbQuery<'conn, T> {
    conn: &'conn Connection,
    base: String,
    filters: Vec<String>,
    args: Vec<Value>,
    order_by: Option<String>,
    limit: Option<usize>,
    mapper: RowMapper<'conn, T>,
}

impl<'conn, T: FromRow + 'conn> DuckDbQuery<'conn, T> {
    /// Query from a base SELECT, mapping rows with `FromRow`
    pub fn select(conn: &'conn Connection, sql: impl Into<String>) -> Self {
        Self::with_mapper(conn, sql, T::from_row)
    }

    /// `SELECT * FROM table`
    pub fn table(conn: &'conn Connection, table: &str) -> Self {
        Self::select(conn, format!("SELECT * FROM {table}"))
    }
}

impl<'conn, T> DuckDbQuery<'conn, T> {
    /// Query from a base SELECT, mapping rows with a closure
    pub fn with_mapper(
        conn: &'conn Connection,
        sql: impl Into<String>,
        mapper: impl Fn(&Row<'_>) -> duckdb::Result<T> + 'conn,
    ) -> Self {
        Self {
            conn,
            base: sql.into(),
            filters: Vec::new(),
            args: Vec::new(),
            order_by: None,
            limit: None,
            mapper: Box::new(mapper),
        }
    }

    /// Full SQL text with `?` placeholders
    pub fn to_sql(&self) -> String {
        let mut sql = self.base.trim().to_string();

        if !self.filters.is_empty() {
            let predicate = self
                .filters
                .iter()
                .map(|f| format!("({f})"))
                .collect::<Vec<_>>()
                .join(" AND ");
            sql.push_str(" WHERE ");
            sql.push_str(&predicate);
        }

        if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        sql
    }

    /// Bound arguments, in placeholder order
    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

impl<T> Statement for DuckDbQuery<'_, T> {
    type Row = T;

    fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn order_by(mut self, clause: &str) -> Self {
        self.order_by = Some(clause.to_string());
        self
    }

    fn filter(mut self, predicate: &str, args: Vec<Value>) -> Self {
        self.filters.push(predicate.to_string());
        self.args.extend(args);
        self
    }

    fn fetch(self) -> Result<Vec<T>> {
        let sql = self.to_sql();
        tracing::debug!("Executing query: {}", sql);

        let params: Vec<DuckValue> = self.args.iter().map(to_duckdb_value).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(duckdb::params_from_iter(params), |row| (self.mapper)(row))?
            .collect::<duckdb::Result<Vec<T>>>()?;

        tracing::debug!("Fetched {} rows", rows.len());
        Ok(rows)
    }
}

impl<T> fmt::Debug for DuckDbQuery<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuckDbQuery")
            .field("sql", &self.to_sql())
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Value conversion
// ============================================================================

/// Convert a key value to a DuckDB parameter
pub fn to_duckdb_value(value: &Value) -> DuckValue {
    match value {
        Value::Null => DuckValue::Null,
        Value::Bool(b) => DuckValue::Boolean(*b),
        Value::Int(i) => DuckValue::BigInt(*i),
        Value::Float(f) => DuckValue::Double(*f),
        Value::Text(s) => DuckValue::Text(s.clone()),
        Value::Timestamp(ts) => DuckValue::Timestamp(TimeUnit::Microsecond, ts.timestamp_micros()),
    }
}

/// Convert a DuckDB value to a key value.
///
/// Integers that do not fit `i64` and types without a key counterpart
/// become text. Such text is for display only; `table_schema` never offers
/// those columns as keys.
pub fn from_duckdb_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(i) => Value::Int(i.into()),
        DuckValue::SmallInt(i) => Value::Int(i.into()),
        DuckValue::Int(i) => Value::Int(i.into()),
        DuckValue::BigInt(i) => Value::Int(i),
        DuckValue::UTinyInt(i) => Value::Int(i.into()),
        DuckValue::USmallInt(i) => Value::Int(i.into()),
        DuckValue::UInt(i) => Value::Int(i.into()),
        DuckValue::UBigInt(i) => i64::try_from(i).map_or_else(|_| Value::Text(i.to_string()), Value::Int),
        DuckValue::HugeInt(i) => i64::try_from(i).map_or_else(|_| Value::Text(i.to_string()), Value::Int),
        DuckValue::Float(f) => Value::Float(f64::from(f)),
        DuckValue::Double(f) => Value::Float(f),
        DuckValue::Text(s) => Value::Text(s),
        DuckValue::Blob(b) => Value::Text(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            b,
        )),
        DuckValue::Timestamp(unit, raw) => {
            timestamp_from_raw(unit, raw).map_or(Value::Int(raw), Value::Timestamp)
        }
        DuckValue::Date32(days) => NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map_or(Value::Int(days.into()), |dt| Value::Timestamp(dt.and_utc())),
        DuckValue::Time64(unit, raw) => Value::Text(time_of_day(unit, raw)),
        other => Value::Text(format!("{other:?}")),
    }
}

/// `HH:MM:SS.ffffff` from a time-of-day offset
fn time_of_day(unit: TimeUnit, raw: i64) -> String {
    let micros = match unit {
        TimeUnit::Second => raw.saturating_mul(1_000_000),
        TimeUnit::Millisecond => raw.saturating_mul(1_000),
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    };
    let secs = micros / 1_000_000;
    format!(
        "{:02}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        micros % 1_000_000
    )
}

fn timestamp_from_raw(unit: TimeUnit, raw: i64) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Second => DateTime::from_timestamp(raw, 0),
        TimeUnit::Millisecond => DateTime::from_timestamp_millis(raw),
        TimeUnit::Microsecond => DateTime::from_timestamp_micros(raw),
        TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(raw)),
    }
}

/// Read a column as a key value
pub fn read_value(row: &Row<'_>, idx: usize) -> duckdb::Result<Value> {
    let raw: DuckValue = row.get(idx)?;
    Ok(from_duckdb_value(raw))
}

/// Read a TIMESTAMP column
pub fn read_timestamp(row: &Row<'_>, idx: usize) -> duckdb::Result<DateTime<Utc>> {
    match read_value(row, idx)? {
        Value::Timestamp(ts) => Ok(ts),
        other => Err(duckdb::Error::FromSqlConversionFailure(
            idx,
            Type::Timestamp,
            format!("expected a timestamp, found {other:?}").into(),
        )),
    }
}

/// Read a nullable TIMESTAMP column
pub fn read_optional_timestamp(row: &Row<'_>, idx: usize) -> duckdb::Result<Option<DateTime<Utc>>> {
    match read_value(row, idx)? {
        Value::Null => Ok(None),
        Value::Timestamp(ts) => Ok(Some(ts)),
        other => Err(duckdb::Error::FromSqlConversionFailure(
            idx,
            Type::Timestamp,
            format!("expected a timestamp, found {other:?}").into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    struct Pair {
        id: i64,
        name: String,
    }

    impl FromRow for Pair {
        fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
            Ok(Self {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        }
    }

    fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE pairs (id BIGINT, name VARCHAR, seen TIMESTAMP);
             INSERT INTO pairs VALUES
                (1, 'one', TIMESTAMP '2024-01-01 00:00:00'),
                (2, 'two', NULL),
                (3, 'three', TIMESTAMP '2024-01-03 12:30:00.5');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_to_sql_plain() {
        let conn = memory();
        let query = DuckDbQuery::<Pair>::table(&conn, "pairs");
        assert_eq!(query.to_sql(), "SELECT * FROM pairs");
        assert!(query.args().is_empty());
    }

    #[test]
    fn test_to_sql_composed() {
        let conn = memory();
        let query = DuckDbQuery::<Pair>::select(&conn, "SELECT id, name FROM pairs ")
            .filter("name <> ?", vec![Value::from("two")])
            .filter("(id < ?) OR (id = ? AND name > ?)", vec![
                Value::Int(3),
                Value::Int(3),
                Value::from("a"),
            ])
            .order_by("id DESC")
            .limit(11);

        assert_eq!(
            query.to_sql(),
            "SELECT id, name FROM pairs \
             WHERE (name <> ?) AND ((id < ?) OR (id = ? AND name > ?)) \
             ORDER BY id DESC LIMIT 11"
        );
        assert_eq!(query.args().len(), 4);
    }

    #[test]
    fn test_fetch_binds_args() {
        let conn = memory();
        let rows = DuckDbQuery::<Pair>::select(&conn, "SELECT id, name FROM pairs")
            .filter("id > ?", vec![Value::Int(1)])
            .order_by("id ASC")
            .limit(5)
            .fetch()
            .unwrap();

        assert_eq!(
            rows,
            vec![
                Pair {
                    id: 2,
                    name: "two".to_string()
                },
                Pair {
                    id: 3,
                    name: "three".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_fetch_binds_timestamps() {
        let conn = memory();
        let cutoff = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        let rows = DuckDbQuery::with_mapper(&conn, "SELECT id, seen FROM pairs", |row| {
            Ok((row.get::<_, i64>(0)?, read_optional_timestamp(row, 1)?))
        })
        .filter("seen > ?", vec![Value::Timestamp(cutoff)])
        .fetch()
        .unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 1, 3, 12, 30, 0).unwrap()
            + chrono::Duration::milliseconds(500);
        assert_eq!(rows, vec![(3, Some(expected))]);
    }

    #[test]
    fn test_fetch_reports_sql_errors() {
        let conn = memory();
        let err = DuckDbQuery::<Pair>::table(&conn, "missing_table")
            .fetch()
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Database(_)));
    }

    #[test]
    fn test_read_timestamp_rejects_other_types() {
        let conn = memory();
        let err = DuckDbQuery::with_mapper(&conn, "SELECT name FROM pairs", |row| {
            read_timestamp(row, 0)
        })
        .fetch()
        .unwrap_err();
        assert!(matches!(err, crate::error::Error::Database(_)));
    }

    #[test]
    fn test_to_duckdb_value() {
        assert_eq!(to_duckdb_value(&Value::Null), DuckValue::Null);
        assert_eq!(to_duckdb_value(&Value::Int(7)), DuckValue::BigInt(7));
        assert_eq!(to_duckdb_value(&Value::Bool(true)), DuckValue::Boolean(true));
        assert_eq!(
            to_duckdb_value(&Value::from("x")),
            DuckValue::Text("x".to_string())
        );

        let ts = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(
            to_duckdb_value(&Value::Timestamp(ts)),
            DuckValue::Timestamp(TimeUnit::Microsecond, 1_000_000)
        );
    }

    #[test]
    fn test_from_duckdb_value() {
        assert_eq!(from_duckdb_value(DuckValue::Null), Value::Null);
        assert_eq!(from_duckdb_value(DuckValue::Int(42)), Value::Int(42));
        assert_eq!(from_duckdb_value(DuckValue::UTinyInt(3)), Value::Int(3));
        assert_eq!(
            from_duckdb_value(DuckValue::UBigInt(u64::MAX)),
            Value::Text(u64::MAX.to_string())
        );
        assert_eq!(from_duckdb_value(DuckValue::Double(1.5)), Value::Float(1.5));
        assert_eq!(
            from_duckdb_value(DuckValue::Text("hello".to_string())),
            Value::Text("hello".to_string())
        );
        assert_eq!(
            from_duckdb_value(DuckValue::Timestamp(TimeUnit::Millisecond, 1_500)),
            Value::Timestamp(Utc.timestamp_millis_opt(1_500).unwrap())
        );
        assert_eq!(
            from_duckdb_value(DuckValue::Date32(1)),
            Value::Timestamp(Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(
            from_duckdb_value(DuckValue::Blob(vec![1, 2, 3])),
            Value::Text("AQID".to_string())
        );
        assert_eq!(
            from_duckdb_value(DuckValue::Time64(TimeUnit::Microsecond, 45_296_000_250)),
            Value::Text("12:34:56.000250".to_string())
        );
    }
}
