//! CLI module
//!
//! Command-line interface for paging through DuckDB tables.
//!
//! # Commands
//!
//! - `page` - Fetch one page of a table and print the next/previous tokens
//! - `schema` - List the fields a table can be paged by

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, PageArgs};
pub use runner::Runner;
