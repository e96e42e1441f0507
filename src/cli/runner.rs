//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, PageArgs};
use crate::database::{table_schema, DynamicRecord};
use crate::error::{Result, ResultExt};
use crate::model::FieldKind;
use crate::pagination::{Config, Paginator};
use duckdb::Connection;
use serde_json::{json, Value};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and print its output
    pub fn run(&self) -> Result<()> {
        let output = self.execute()?;
        self.output_message(&output);
        Ok(())
    }

    /// Run the CLI command
    pub fn execute(&self) -> Result<Value> {
        match &self.cli.command {
            Commands::Page(args) => self.page(args),
            Commands::Schema { table } => self.schema(table),
        }
    }

    /// Fetch one page
    pub fn page(&self, args: &PageArgs) -> Result<Value> {
        let file_config = match &args.config {
            Some(path) => Config::from_yaml_file(path)?,
            None => Config::new(),
        };
        let paginator = Paginator::new(file_config.merge(args.to_config()));

        let conn = self.open()?;
        let schema = table_schema(&conn, &args.table)?;

        tracing::info!(
            "Paging {} (limit {}, {:?})",
            args.table,
            paginator.limit(),
            paginator.direction()
        );

        let page = paginator.paginate_with_schema(DynamicRecord::select(&conn, &schema), &schema)?;

        tracing::info!("Fetched {} rows from {}", page.items.len(), args.table);

        Ok(json!({
            "type": "PAGE",
            "table": args.table,
            "items": page.items,
            "cursor": page.cursor,
        }))
    }

    /// Describe a table's pageable fields
    pub fn schema(&self, table: &str) -> Result<Value> {
        let conn = self.open()?;
        let schema = table_schema(&conn, table)?;

        let fields: Vec<Value> = schema
            .fields()
            .iter()
            .filter_map(|field| match &field.kind {
                FieldKind::Scalar {
                    field_type,
                    nullable,
                } => Some(json!({
                    "name": field.name,
                    "column": field.column_name(),
                    "type": field_type.to_string(),
                    "nullable": nullable,
                })),
                FieldKind::Embedded(_) => None,
            })
            .collect();

        Ok(json!({
            "type": "SCHEMA",
            "table": schema.storage_name(),
            "fields": fields,
        }))
    }

    fn open(&self) -> Result<Connection> {
        let path = &self.cli.database;
        tracing::debug!("Opening database {}", path.display());

        if path.as_os_str() == ":memory:" {
            return Connection::open_in_memory().context("Failed to open in-memory database");
        }
        Connection::open(path)
            .with_context(|| format!("Failed to open database '{}'", path.display()))
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
