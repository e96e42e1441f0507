//! Pagination module
//!
//! Cursor-based ("keyset") pagination over ordered query results.
//!
//! # Overview
//!
//! Given ordering rules and an opaque position token, the paginator computes
//! the WHERE/ORDER BY parts needed to fetch the next or previous page, runs
//! the statement, and returns new tokens for traversal in either direction.
//!
//! - `rules` - validates rules and resolves keys to column references
//! - `query` - builds the lexicographic tie-break predicate and order clause
//! - `paginator` - orchestrates one fetch and shapes the result
//! - `config` - settings with explicit defaults

mod config;
mod paginator;
mod query;
mod rules;
mod types;

pub use config::{Config, DEFAULT_KEY, DEFAULT_LIMIT, DEFAULT_ORDER};
pub use paginator::Paginator;
pub use query::{order_sql, predicate_args, predicate_sql, KeysetQuery, Predicate};
pub use rules::resolve_rules;
pub use types::{Cursor, Page, ResolvedRule, Rule, Statement};
