//! CLI commands and argument parsing

use crate::pagination::{Config, Rule};
use crate::types::Order;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy Paginator CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-paginator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// DuckDB database file
    #[arg(short, long, global = true, default_value = ":memory:")]
    pub database: PathBuf,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page of a table
    Page(PageArgs),

    /// Show the pageable fields of a table
    Schema {
        /// Table name (optionally schema-qualified)
        #[arg(short, long)]
        table: String,
    },
}

/// Arguments of the `page` command.
///
/// Flags override the YAML config file, which overrides the defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Table name (optionally schema-qualified)
    #[arg(short, long)]
    pub table: String,

    /// Paging config file (YAML)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Paging key, `name` or `name:asc|desc` (repeatable, in priority order)
    #[arg(short, long = "key")]
    pub keys: Vec<Rule>,

    /// Page size
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Default order for keys without their own
    #[arg(short, long)]
    pub order: Option<Order>,

    /// Token of the page to continue after
    #[arg(long)]
    pub after: Option<String>,

    /// Token of the page to continue before
    #[arg(long)]
    pub before: Option<String>,
}

impl PageArgs {
    /// Settings given on the command line
    pub fn to_config(&self) -> Config {
        Config {
            rules: self.keys.clone(),
            keys: Vec::new(),
            limit: self.limit,
            order: self.order,
            after: self.after.clone(),
            before: self.before.clone(),
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}
