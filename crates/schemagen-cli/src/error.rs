//! CLI error type.

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced to the user by the `schemagen` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading the catalog or deriving the schema failed.
    #[error(transparent)]
    Schema(#[from] schemagen_core::Error),

    /// A `--seed` argument is not a valid type reference.
    #[error("invalid seed {seed:?}: {source}")]
    InvalidSeed {
        seed: String,
        #[source]
        source: schemagen_core::CatalogError,
    },

    /// Neither the command line nor the catalog names anything to derive.
    #[error("catalog declares no entities")]
    EmptyCatalog,

    /// JSON export failed.
    #[error("failed to serialize schema: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the output failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<schemagen_core::CatalogError> for CliError {
    fn from(err: schemagen_core::CatalogError) -> Self {
        CliError::Schema(err.into())
    }
}
