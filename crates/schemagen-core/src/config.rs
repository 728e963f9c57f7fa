//! DDL generator configuration.

/// Default end-of-line sequence.
pub const DEFAULT_EOL: &str = "\n";

/// Default indentation unit for column and key lines.
pub const DEFAULT_INDENT: &str = "\t";

/// DDL generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Line terminator.
    pub eol: String,

    /// Indentation for lines inside a `CREATE TABLE` body.
    pub indent: String,

    /// Pad column names and types into aligned columns.
    pub align_columns: bool,

    /// Suffix after the closing parenthesis (e.g., "ENGINE=InnoDB").
    pub table_options: Option<String>,

    /// Emit `CREATE TABLE IF NOT EXISTS`.
    pub if_not_exists: bool,

    /// Prefix the script with `DROP TABLE IF EXISTS` for every table, in
    /// reverse creation order.
    pub drop_existing: bool,
}

impl GeneratorConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            eol: DEFAULT_EOL.to_string(),
            indent: DEFAULT_INDENT.to_string(),
            align_columns: true,
            table_options: None,
            if_not_exists: false,
            drop_existing: false,
        }
    }

    /// Set the line terminator.
    pub fn with_eol(mut self, eol: impl Into<String>) -> Self {
        self.eol = eol.into();
        self
    }

    /// Set the indentation unit.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Enable or disable column alignment.
    pub fn with_align_columns(mut self, align: bool) -> Self {
        self.align_columns = align;
        self
    }

    /// Set the table options suffix.
    pub fn with_table_options(mut self, options: impl Into<String>) -> Self {
        self.table_options = Some(options.into());
        self
    }

    /// Emit `IF NOT EXISTS` on every `CREATE TABLE`.
    pub fn with_if_not_exists(mut self, enabled: bool) -> Self {
        self.if_not_exists = enabled;
        self
    }

    /// Emit a `DROP TABLE IF EXISTS` preamble.
    pub fn with_drop_existing(mut self, enabled: bool) -> Self {
        self.drop_existing = enabled;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}
