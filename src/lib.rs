// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Solidafy Paginator
//!
//! Cursor-based ("keyset") pagination over ordered SQL query results.
//!
//! Instead of OFFSET, each page is located by the key values of the last (or
//! first) row of the previous page, carried between requests as an opaque
//! URL-safe token. Pages stay stable under concurrent inserts and cost the
//! same at any depth.
//!
//! ## Features
//!
//! - **Multi-key ordering**: Lexicographic tie-break across any number of keys,
//!   each ascending or descending
//! - **Both directions**: `after` and `before` tokens, with `after` winning
//! - **Typed tokens**: Timestamps, integers, floats, text, booleans and NULLs
//!   survive the round trip
//! - **Joins and aliases**: Keys on embedded models or explicit SQL column
//!   references
//! - **DuckDB engine**: Statements run on DuckDB; tables without a Rust model
//!   are described at runtime
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_paginator::database::DuckDbQuery;
//! use solidafy_paginator::{Config, Paginator, Result};
//!
//! fn first_page(conn: &duckdb::Connection) -> Result<()> {
//!     let paginator = Paginator::new(Config::new().with_keys(["createdAt", "id"]).with_limit(20));
//!
//!     let page = paginator.paginate(DuckDbQuery::<Order>::table(conn, "orders"))?;
//!     if let Some(after) = page.cursor.after {
//!         // hand `after` to the client for the next page
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Paginator                              │
//! │  config + tokens → validate → decode → query → fetch → shape    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┼───────────────┬──────────────────┐
//! │    Rules     │    Cursor     │     Query     │    Statement     │
//! ├──────────────┼───────────────┼───────────────┼──────────────────┤
//! │ Key → column │ base64(JSON)  │ ORDER BY      │ DuckDbQuery      │
//! │ Default order│ Typed decode  │ Tie-break OR  │ DynamicRecord    │
//! │ Duplicates   │ Size limit    │ limit + 1     │ table_schema     │
//! └──────────────┴───────────────┴───────────────┴──────────────────┘
//!                                │
//!                     ┌──────────┴──────────┐
//!                     │  Model (schema of   │
//!                     │  paginated records) │
//!                     └─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the paginator
pub mod error;

/// Sort order and scan direction
pub mod types;

/// Record schemas and key values
pub mod model;

/// Opaque position tokens
pub mod cursor;

/// Keyset pagination
pub mod pagination;

/// Statement execution via DuckDB
pub mod database;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use cursor::CursorError;
pub use model::{FieldDef, FieldType, Model, ModelSchema, Record, Value};
pub use pagination::{Config, Cursor, Page, Paginator, Rule, Statement};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
