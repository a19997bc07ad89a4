//! Response body parsing.
//!
//! Bodies are parsed into a generic [`XmlNode`](crate::dav::core::XmlNode)
//! tree with `quick-xml`, then mapped onto entities through a schema.

mod error;
mod multistatus;
mod tree;
pub mod value;


pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use multistatus::{
    EntityFilter, MultistatusOptions, SUCCESS_STATUS, first_property_text, parse_multistatus,
};
pub use tree::parse_document;
