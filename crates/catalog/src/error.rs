//! Error types for the catalog crate.

use thiserror::Error;

/// Errors that can occur while loading or validating the sign catalog
/// and the demo table.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog or demo document is not valid JSON for the expected shape
    #[error("Failed to parse {document}: {source}")]
    Parse {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    /// The catalog has no signs at all
    #[error("Catalog contains no signs")]
    Empty,

    /// Two signs share the same name
    #[error("Duplicate sign name: {0}")]
    DuplicateSign(String),

    /// A field had a value outside its allowed range
    #[error("Invalid value for {field} on sign '{sign}': {value}")]
    InvalidValue {
        sign: String,
        field: String,
        value: String,
    },

    /// A demo entry points at a sign that is not in the catalog
    #[error("Demo entry '{key}' references unknown sign '{sign}'")]
    UnknownDemoSign { key: String, sign: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
