//! Decoded entity instances.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use serde_json::{Map, Value};

/// Non-owning handle to whatever produced an entity.
pub type Origin = Weak<dyn Any + Send + Sync>;

/// One resource decoded from a multistatus response.
///
/// Holds only schema-declared attributes plus the resource `href`.
/// Attributes are set by the multistatus decoder or
/// [`EntitySchema::entity`](super::EntitySchema::entity). The
/// optional origin lets convenience methods issue follow-up requests
/// without keeping the producer alive.
#[derive(Clone)]
pub struct Entity {
    kind: String,
    href: String,
    attrs: BTreeMap<String, Value>,
    origin: Option<Origin>,
}

impl Entity {
    /// Creates an entity of `kind` without attributes.
    #[must_use]
    pub fn new(kind: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            href: href.into(),
            attrs: BTreeMap::new(),
            origin: None,
        }
    }

    /// Attaches the producer handle.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub(crate) fn set(&mut self, attr: &str, value: Value) {
        self.attrs.insert(attr.to_owned(), value);
    }

    /// Entity kind (`file`, `tag`, ...).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Resource href as sent by the server.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.attrs.get(attr)
    }

    /// Returns an attribute as a string slice.
    #[must_use]
    pub fn get_str(&self, attr: &str) -> Option<&str> {
        self.attrs.get(attr).and_then(Value::as_str)
    }

    /// Returns whether the attribute is present, even if `null`.
    #[must_use]
    pub fn has(&self, attr: &str) -> bool {
        self.attrs.contains_key(attr)
    }

    /// Iterates attributes in name order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the attributes as a JSON object.
    #[must_use]
    pub fn as_dict(&self) -> Map<String, Value> {
        self.attrs
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Upgrades the origin handle and downcasts it to `T`.
    #[must_use]
    pub fn origin<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.origin
            .as_ref()
            .and_then(Weak::upgrade)
            .and_then(|origin| origin.downcast::<T>().ok())
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &self.kind)
            .field("href", &self.href)
            .field("attrs", &self.attrs)
            .field("has_origin", &self.origin.is_some())
            .finish()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.href == other.href && self.attrs == other.attrs
    }
}
