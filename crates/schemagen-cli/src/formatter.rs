//! Output formatters for derived schemas.

use crate::error::CliError;
use clap::ValueEnum;
use comfy_table::{Cell, Table};
use schemagen_core::{DdlEmitter, DerivedSchema, GeneratorConfig, MysqlEmitter};

/// Output format for the derived schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// MySQL DDL script
    Sql,
    /// Indented JSON
    Json,
    /// ASCII table summary
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Sql => write!(f, "sql"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format a derived schema.
    fn format_schema(&self, schema: &DerivedSchema) -> Result<String, CliError>;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat, config: GeneratorConfig) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Sql => Box::new(SqlFormatter { config }),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

/// DDL formatter.
pub struct SqlFormatter {
    config: GeneratorConfig,
}

impl Formatter for SqlFormatter {
    fn format_schema(&self, schema: &DerivedSchema) -> Result<String, CliError> {
        Ok(MysqlEmitter.render(schema, &self.config))
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_schema(&self, schema: &DerivedSchema) -> Result<String, CliError> {
        let mut json = schema.to_json()?;
        json.push('\n');
        Ok(json)
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_schema(&self, schema: &DerivedSchema) -> Result<String, CliError> {
        let mut table = Table::new();
        table.set_header(vec!["#", "Table", "Columns", "Primary Key", "Foreign Keys"]);

        for (i, t) in schema.ordered_tables().enumerate() {
            let foreign_keys: Vec<String> = t
                .foreign_keys
                .iter()
                .map(|fk| {
                    format!(
                        "({}) -> {}({}) {}",
                        fk.source_columns.join(", "),
                        fk.ref_table,
                        fk.ref_columns.join(", "),
                        fk.on_delete
                    )
                })
                .collect();

            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(&t.name),
                Cell::new(t.fields.len()),
                Cell::new(t.primary_keys.join(", ")),
                Cell::new(foreign_keys.join("\n")),
            ]);
        }

        Ok(format!("{}\n", table))
    }
}
