//! Structural type descriptors for declared fields.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primitive kinds that map directly to a storage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Boolean value.
    Bool,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 8-bit unsigned integer.
    Uint8,
    /// 16-bit unsigned integer.
    Uint16,
    /// 32-bit unsigned integer.
    Uint32,
    /// 64-bit unsigned integer.
    Uint64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
    /// Point in time.
    Timestamp,
}

impl PrimitiveKind {
    const ALL: [PrimitiveKind; 13] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Uint8,
        PrimitiveKind::Uint16,
        PrimitiveKind::Uint32,
        PrimitiveKind::Uint64,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
        PrimitiveKind::String,
        PrimitiveKind::Timestamp,
    ];

    /// Name used in type references.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::String => "string",
            PrimitiveKind::Timestamp => "timestamp",
        }
    }

    /// Look up a primitive kind by its reference name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The element type behind any pointer or slice wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A primitive value.
    Primitive(PrimitiveKind),
    /// A complex entity, by name.
    Complex(String),
}

/// A field's declared type: an element kind, optionally behind a pointer,
/// optionally in a slice.
///
/// The textual form is `[]` (slice) followed by `*` (pointer) followed by the
/// element name, e.g. `[]*Post`, `*User`, `Address`, `int64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    /// Element kind.
    pub kind: TypeKind,
    /// Whether the element is held by pointer.
    pub pointer: bool,
    /// Whether the field holds a sequence of elements.
    pub slice: bool,
}

impl TypeRef {
    /// A primitive scalar.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self {
            kind: TypeKind::Primitive(kind),
            pointer: false,
            slice: false,
        }
    }

    /// An entity held by value.
    pub fn entity(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Complex(name.into()),
            pointer: false,
            slice: false,
        }
    }

    /// A pointer to an entity.
    pub fn pointer(name: impl Into<String>) -> Self {
        Self::entity(name).as_pointer()
    }

    /// A slice of entities held by value.
    pub fn slice(name: impl Into<String>) -> Self {
        Self::entity(name).as_slice()
    }

    /// A slice of pointers to entities.
    pub fn pointer_slice(name: impl Into<String>) -> Self {
        Self::entity(name).as_pointer().as_slice()
    }

    /// Wrap the element in a pointer.
    pub fn as_pointer(mut self) -> Self {
        self.pointer = true;
        self
    }

    /// Wrap the (possibly pointer) element in a slice.
    pub fn as_slice(mut self) -> Self {
        self.slice = true;
        self
    }

    /// The entity name if the element is complex.
    pub fn complex_name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Complex(name) => Some(name),
            TypeKind::Primitive(_) => None,
        }
    }

    /// The primitive kind if the element is primitive.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(kind) => Some(kind),
            TypeKind::Complex(_) => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slice {
            f.write_str("[]")?;
        }
        if self.pointer {
            f.write_str("*")?;
        }
        match &self.kind {
            TypeKind::Primitive(kind) => f.write_str(kind.name()),
            TypeKind::Complex(name) => f.write_str(name),
        }
    }
}

impl FromStr for TypeRef {
    type Err = CatalogError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| CatalogError::InvalidTypeRef {
            text: text.to_string(),
            reason,
        };

        let trimmed = text.trim();
        let (slice, rest) = match trimmed.strip_prefix("[]") {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (pointer, name) = match rest.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };

        if name.is_empty() {
            return Err(invalid("missing element type"));
        }
        if name.starts_with("[]") || name.starts_with('*') {
            return Err(invalid("only `[]`, `*` and `[]*` wrappings are supported"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("element type must be an identifier"));
        }

        let kind = match PrimitiveKind::from_name(name) {
            Some(kind) => TypeKind::Primitive(kind),
            None => TypeKind::Complex(name.to_string()),
        };

        Ok(Self {
            kind,
            pointer,
            slice,
        })
    }
}

impl TryFrom<String> for TypeRef {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}
