//! Field role tags.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marks a pointer field as a reference to the entity that embeds this one.
pub const PARENT: &str = "parent";
/// Makes the field part of the primary key.
pub const PRIMARY_KEY: &str = "primaryKey";
/// `unique:<group>` adds the field to a named unique key.
pub const UNIQUE: &str = "unique";
/// `composite:<group>` adds the field to a named secondary key.
pub const COMPOSITE: &str = "composite";
/// Allows NULL in the column.
pub const NULLABLE: &str = "nullable";
/// Marks a primary-key column as auto-increment.
pub const AUTO_INCREMENT: &str = "autoIncrement";
/// Fixed-width string column.
pub const FIXED: &str = "fixed";
/// `width:<n>` sets the string column width.
pub const WIDTH: &str = "width";
/// `text:<tiny|small|medium|long>` makes the string a text column.
pub const TEXT: &str = "text";

/// The key a field participates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRole {
    /// Primary key member.
    Primary,
    /// Member of the named unique key.
    Unique(String),
    /// Member of the named secondary key.
    Composite(String),
}

/// Tags attached to a declared field.
///
/// Serialized as a list of `name` or `name:value` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FieldTags {
    entries: BTreeMap<String, String>,
}

impl FieldTags {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag tag.
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.entries.insert(name.into(), String::new());
        self
    }

    /// Add a tag with a value.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Value of a tag, if present. Flag tags yield an empty string.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Check whether a tag is present.
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The key role, with `primaryKey` taking precedence over `unique`, and
    /// `unique` over `composite`.
    pub fn key_role(&self) -> Option<KeyRole> {
        if self.has(PRIMARY_KEY) {
            Some(KeyRole::Primary)
        } else if let Some(group) = self.lookup(UNIQUE) {
            Some(KeyRole::Unique(group.to_string()))
        } else {
            self.lookup(COMPOSITE)
                .map(|group| KeyRole::Composite(group.to_string()))
        }
    }

    /// Check whether the tag set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<String>> for FieldTags {
    fn from(raw: Vec<String>) -> Self {
        let entries = raw
            .into_iter()
            .map(|tag| match tag.split_once(':') {
                Some((name, value)) => (name.trim().to_string(), value.trim().to_string()),
                None => (tag.trim().to_string(), String::new()),
            })
            .collect();
        Self { entries }
    }
}

impl From<FieldTags> for Vec<String> {
    fn from(tags: FieldTags) -> Self {
        tags.entries
            .into_iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    name
                } else {
                    format!("{}:{}", name, value)
                }
            })
            .collect()
    }
}
