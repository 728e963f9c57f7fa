//! Primitive-to-column type mapping.

use super::tags::{FieldTags, FIXED, TEXT, WIDTH};
use super::types::PrimitiveKind;
use crate::error::TypeMappingError;

/// Maps a primitive field and its tags to a storage column type string.
pub trait ColumnTypeMapper {
    /// Resolve the column type, failing if the tags are inconsistent.
    fn column_type(
        &self,
        kind: PrimitiveKind,
        tags: &FieldTags,
    ) -> Result<String, TypeMappingError>;
}

/// MySQL column types.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlTypes;

impl ColumnTypeMapper for MysqlTypes {
    fn column_type(
        &self,
        kind: PrimitiveKind,
        tags: &FieldTags,
    ) -> Result<String, TypeMappingError> {
        let ty = match kind {
            PrimitiveKind::Bool => "BOOL",
            PrimitiveKind::Int8 => "TINYINT SIGNED",
            PrimitiveKind::Int16 => "SMALLINT SIGNED",
            PrimitiveKind::Int32 => "INT SIGNED",
            PrimitiveKind::Int64 => "BIGINT SIGNED",
            PrimitiveKind::Uint8 => "TINYINT UNSIGNED",
            PrimitiveKind::Uint16 => "SMALLINT UNSIGNED",
            PrimitiveKind::Uint32 => "INT UNSIGNED",
            PrimitiveKind::Uint64 => "BIGINT UNSIGNED",
            PrimitiveKind::Float32 => "FLOAT",
            PrimitiveKind::Float64 => "DOUBLE",
            PrimitiveKind::Timestamp => "TIMESTAMP",
            PrimitiveKind::String => return string_type(tags),
        };
        Ok(ty.to_string())
    }
}

fn string_type(tags: &FieldTags) -> Result<String, TypeMappingError> {
    let fixed = tags.has(FIXED);

    if let Some(width) = tags.lookup(WIDTH) {
        let valid = width.parse::<u32>().map(|w| w > 0).unwrap_or(false);
        if !valid {
            return Err(TypeMappingError::InvalidWidth {
                width: width.to_string(),
            });
        }
        let base = if fixed { "CHAR" } else { "VARCHAR" };
        return Ok(format!("{}({})", base, width));
    }

    if let Some(size) = tags.lookup(TEXT) {
        if fixed {
            return Err(TypeMappingError::FixedText);
        }
        let ty = match size {
            "tiny" => "TINYTEXT",
            "" | "small" => "TEXT",
            "medium" => "MEDIUMTEXT",
            "long" => "LONGTEXT",
            other => {
                return Err(TypeMappingError::UnknownTextSize {
                    size: other.to_string(),
                })
            }
        };
        return Ok(ty.to_string());
    }

    Err(TypeMappingError::MissingStringWidth)
}
