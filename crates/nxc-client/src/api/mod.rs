//! Built-in capability modules.
//!
//! Each module declares its API prefix and success policy next to a typed
//! wrapper. The wrapper also implements
//! [`Provider`](crate::capability::Provider) so that the facade can dispatch
//! its operations by name.

pub mod apps;
pub mod capabilities;
pub mod sharee;
pub mod systemtags;
pub mod trashbin;
pub mod users;
pub mod webdav;

use std::sync::Arc;

use nxc_dav::dav::core::{Entity, EntitySchema, FieldSelection, PropertyValues, RuleValue};
use serde_json::{Map, Value};

pub use apps::Apps;
pub use capabilities::Capabilities;
pub use sharee::{Sharee, ShareeQuery};
pub use systemtags::{FileRef, SystemTags, SystemTagsRelation, Tag, TagRef};
pub use trashbin::{TrashFile, WebDavTrash};
pub use users::Users;
pub use webdav::{Download, File, ListOptions, WebDav};

use crate::capability::CapabilityDecl;
use crate::error::{ClientError, ClientResult};
use crate::requester::Requester;
use crate::session::Session;

fn unknown_operation(requester: &Requester, operation: &str) -> ClientError {
    tracing::debug!(operation, module = requester.decl().name, "Operation not provided");
    ClientError::UnknownOperation(operation.to_owned())
}

/// Joins `path` below the user's root, `//` collapsed.
fn user_path(user: &str, path: &str) -> String {
    if path.is_empty() {
        user.to_owned()
    } else {
        format!("{user}/{path}").replace("//", "/")
    }
}

/// Requester for `decl` over the session an entity was decoded from.
fn bound(entity: &Entity, decl: &'static CapabilityDecl) -> ClientResult<Arc<Requester>> {
    let session = entity.origin::<Session>().ok_or(ClientError::Detached)?;
    Ok(Arc::new(Requester::new(session, decl, false)))
}

/// Path of an entity relative to the user's root below `requester`'s prefix.
fn remote_path(entity: &Entity, requester: &Requester) -> ClientResult<String> {
    let root = format!(
        "{}/{}/",
        requester.decl().api_url.unwrap_or_default(),
        requester.user()
    );
    let href = entity.href();
    if let Some(start) = href.find(&root) {
        return Ok(href[start + root.len()..].to_owned());
    }
    if href.ends_with(root.trim_end_matches('/')) {
        return Ok(String::new());
    }
    Err(ClientError::InvalidArgument(format!(
        "{href} is not below {root}"
    )))
}

/// Integer attribute, accepting numeric text as the server sends it.
fn entity_id(entity: &Entity, attr: &str) -> Option<i64> {
    entity.get(attr).and_then(|value| {
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

/// Resolves `prefix:name` or bare names against `schema`.
///
/// Bare names are looked up as attribute names first, then as XML names.
fn field_selection(schema: &EntitySchema, names: &[String]) -> ClientResult<FieldSelection> {
    let mut fields = FieldSelection::new();
    for name in names {
        if let Some((prefix, local)) = name.split_once(':') {
            fields.push(prefix, local);
            continue;
        }
        let descriptor = schema
            .by_attr_name(name)
            .or_else(|| schema.by_xml_name(name))
            .ok_or_else(|| {
                ClientError::InvalidArgument(format!("{name:?} is not a {} property", schema.kind()))
            })?;
        fields.push(descriptor.prefix(), descriptor.xml_name());
    }
    Ok(fields)
}

/// Converts `{"prefix": {"name": value}}` into property values.
fn property_values(rules: &Map<String, Value>) -> ClientResult<PropertyValues> {
    let mut values = PropertyValues::new();
    for (prefix, group) in rules {
        let group = group.as_object().ok_or_else(|| {
            ClientError::InvalidArgument(format!("rules for {prefix:?} must be an object"))
        })?;
        for (name, value) in group {
            let value = match value {
                Value::String(text) => RuleValue::Text(text.clone()),
                Value::Bool(flag) => RuleValue::Bool(*flag),
                Value::Number(number) => number.as_i64().map(RuleValue::Integer).ok_or_else(|| {
                    ClientError::InvalidArgument(format!("{prefix}:{name} must be an integer"))
                })?,
                _ => {
                    return Err(ClientError::InvalidArgument(format!(
                        "{prefix}:{name} must be a string, integer or boolean"
                    )));
                }
            };
            values.insert(prefix, name, value);
        }
    }
    Ok(values)
}
