//! Namespaces, property descriptors, schemas and entities.
//!
//! These types describe how namespaced `WebDAV` properties map onto entity
//! attributes. Parsing and request building live in the sibling modules.

mod descriptor;
mod entity;
mod fields;
mod namespace;
mod schema;
mod xml;

pub use descriptor::{DefaultValue, PropertyDescriptor, PropertyOptions, ValueParser};
pub use entity::{Entity, Origin};
pub use fields::{FieldSelection, PropertyValues, RuleValue};
pub use namespace::{
    DAV_NS, NEXTCLOUD_NS, Namespace, NamespaceRegistry, NamingConvention, OWNCLOUD_NS, QName,
};
pub use schema::EntitySchema;
pub use xml::XmlNode;
