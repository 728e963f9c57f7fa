//! DDL emission for derived schemas.

pub mod mysql;

pub use mysql::MysqlEmitter;

use crate::config::GeneratorConfig;
use crate::derive::DerivedSchema;
use std::io;

/// Renders a derived schema as a DDL script.
pub trait DdlEmitter {
    /// Render `schema` with the given settings.
    fn render(&self, schema: &DerivedSchema, config: &GeneratorConfig) -> String;

    /// Render `schema` into a writer.
    fn write_to(
        &self,
        schema: &DerivedSchema,
        config: &GeneratorConfig,
        out: &mut dyn io::Write,
    ) -> io::Result<()> {
        out.write_all(self.render(schema, config).as_bytes())
    }
}
