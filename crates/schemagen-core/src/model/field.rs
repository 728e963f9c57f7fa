//! Column definitions.

use super::compound_name;
use serde::Serialize;

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Resolved storage type.
    #[serde(rename = "type")]
    pub column_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Whether the column is auto-increment.
    pub auto_increment: bool,
}

impl Field {
    /// Create a non-nullable column.
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            nullable: false,
            auto_increment: false,
        }
    }

    /// Allow NULL.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark as auto-increment.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// A copy of this column for use in another table, named
    /// `<owner>_<name>` and never auto-increment.
    pub fn copied_from(&self, owner: &str) -> Self {
        Self {
            name: compound_name(owner, &self.name),
            column_type: self.column_type.clone(),
            nullable: self.nullable,
            auto_increment: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copied_from() {
        let id = Field::new("id", "BIGINT UNSIGNED").auto_increment();
        let copy = id.copied_from("User");

        assert_eq!(copy.name, "User_id");
        assert_eq!(copy.column_type, "BIGINT UNSIGNED");
        assert!(!copy.auto_increment);
        assert!(!copy.nullable);
    }

    #[test]
    fn test_copy_keeps_nullability() {
        let code = Field::new("code", "CHAR(2)").nullable();
        assert!(code.copied_from("Country").nullable);
    }
}
