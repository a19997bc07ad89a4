//! Error types for property mapping and XML handling.

use thiserror::Error;

use crate::dav::parse::ParseError;

/// Errors raised while declaring schemas, building request bodies or
/// decoding response bodies.
#[derive(Error, Debug)]
pub enum DavError {
    #[error("Prefix {prefix:?} is bound to {existing:?}, cannot rebind it to {requested:?}")]
    NamespaceConflict {
        prefix: String,
        existing: String,
        requested: String,
    },

    #[error("Unknown namespace prefix {0:?}")]
    UnknownNamespace(String),

    #[error("{prefix}:{xml_name} is already named {existing:?}, cannot rename it to {requested:?}")]
    RenameConflict {
        prefix: String,
        xml_name: String,
        existing: String,
        requested: String,
    },

    #[error("Duplicate attribute {attr:?} in {kind} schema")]
    DuplicateAttribute { kind: String, attr: String },

    #[error("Attribute {attr:?} is not declared by the {kind} schema")]
    UnknownAttribute { kind: String, attr: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("XML serialization failed: {0}")]
    Serialize(String),
}

impl From<std::io::Error> for DavError {
    fn from(err: std::io::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

pub type DavResult<T> = std::result::Result<T, DavError>;
