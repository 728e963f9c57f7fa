//! MySQL `CREATE TABLE` emission.

use super::DdlEmitter;
use crate::config::GeneratorConfig;
use crate::derive::DerivedSchema;
use crate::model::{Field, Table};

/// Emits MySQL DDL.
///
/// Each main table is followed by its bridge tables and a blank line. Column
/// lines are padded into aligned columns unless alignment is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlEmitter;

impl DdlEmitter for MysqlEmitter {
    fn render(&self, schema: &DerivedSchema, config: &GeneratorConfig) -> String {
        let mut out = String::new();

        if config.drop_existing {
            let tables: Vec<&Table> = schema.ordered_tables().collect();
            for table in tables.iter().rev() {
                out.push_str(&format!("DROP TABLE IF EXISTS {};", table.name));
                out.push_str(&config.eol);
            }
            out.push_str(&config.eol);
        }

        for main in &schema.tables {
            out.push_str(&create_table(&main.table, config));
            for aux in &main.aux_tables {
                out.push_str(&create_table(aux, config));
            }
            out.push_str(&config.eol);
        }
        out
    }
}

/// Render one `CREATE TABLE` statement, terminated by an end-of-line.
pub fn create_table(table: &Table, config: &GeneratorConfig) -> String {
    let mut lines = column_lines(&table.fields, config.align_columns);

    if !table.primary_keys.is_empty() {
        lines.push(format!("PRIMARY KEY ({})", table.primary_keys.join(", ")));
    }
    for (name, columns) in &table.unique_keys {
        lines.push(format!("UNIQUE KEY `{}` ({})", name, columns.join(", ")));
    }
    for (name, columns) in &table.composite_keys {
        lines.push(format!("KEY `{}` ({})", name, columns.join(", ")));
    }
    for fk in &table.foreign_keys {
        lines.push(format!(
            "FOREIGN KEY ({}) REFERENCES {}({}) ON UPDATE {} ON DELETE {}",
            fk.source_columns.join(", "),
            fk.ref_table,
            fk.ref_columns.join(", "),
            fk.on_update,
            fk.on_delete,
        ));
    }

    let eol = config.eol.as_str();
    let mut out = String::from("CREATE TABLE ");
    if config.if_not_exists {
        out.push_str("IF NOT EXISTS ");
    }
    out.push_str(&table.name);
    out.push_str(" (");

    if !lines.is_empty() {
        let separator = format!(",{}{}", eol, config.indent);
        out.push_str(eol);
        out.push_str(&config.indent);
        out.push_str(&lines.join(&separator));
    }

    out.push_str(eol);
    out.push(')');
    if let Some(options) = &config.table_options {
        out.push(' ');
        out.push_str(options);
    }
    out.push(';');
    out.push_str(eol);
    out
}

/// Column definitions as `name type [NOT NULL] [AUTO_INCREMENT]`.
///
/// When aligned, every piece is padded to the widest entry in its column plus
/// one space and the line is trimmed on the right.
fn column_lines(fields: &[Field], align: bool) -> Vec<String> {
    let rows: Vec<[&str; 4]> = fields
        .iter()
        .map(|f| {
            [
                f.name.as_str(),
                f.column_type.as_str(),
                if f.nullable { "" } else { "NOT NULL" },
                if f.auto_increment { "AUTO_INCREMENT" } else { "" },
            ]
        })
        .collect();

    if !align {
        return rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|piece| !piece.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
    }

    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, piece) in widths.iter_mut().zip(row) {
            *width = (*width).max(piece.len());
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (piece, width) in row.iter().zip(widths) {
                line.push_str(&format!("{:<width$} ", piece, width = width));
            }
            line.trim_end().to_string()
        })
        .collect()
}
