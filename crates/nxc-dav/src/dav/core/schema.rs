//! Entity schemas.

use serde_json::{Map, Value};

use super::descriptor::PropertyDescriptor;
use super::entity::Entity;
use super::fields::FieldSelection;
use crate::error::{DavError, DavResult};

/// Ordered list of property descriptors bound to one entity kind.
///
/// Attribute names are unique within a schema. Schemas are read-only once
/// built and shared by every entity of their kind.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    kind: String,
    descriptors: Vec<PropertyDescriptor>,
}

impl EntitySchema {
    /// Builds a schema.
    ///
    /// ## Errors
    /// Returns `DavError::DuplicateAttribute` when two descriptors share an
    /// attribute name.
    pub fn new(
        kind: impl Into<String>,
        descriptors: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> DavResult<Self> {
        let mut schema = Self {
            kind: kind.into(),
            descriptors: Vec::new(),
        };
        for descriptor in descriptors {
            schema.push(descriptor)?;
        }
        Ok(schema)
    }

    /// Builds a new schema of `kind` from this one plus `more` descriptors.
    ///
    /// ## Errors
    /// Returns `DavError::DuplicateAttribute` on a clashing attribute name.
    pub fn extend(
        &self,
        kind: impl Into<String>,
        more: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> DavResult<Self> {
        Self::new(kind, self.descriptors.iter().cloned().chain(more))
    }

    fn push(&mut self, descriptor: PropertyDescriptor) -> DavResult<()> {
        if self.by_attr_name(descriptor.attr_name()).is_some() {
            return Err(DavError::DuplicateAttribute {
                kind: self.kind.clone(),
                attr: descriptor.attr_name().to_owned(),
            });
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Entity kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Descriptors in declaration order.
    #[must_use]
    pub fn descriptors(&self) -> &[PropertyDescriptor] {
        &self.descriptors
    }

    /// Attribute names in declaration order.
    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(PropertyDescriptor::attr_name)
    }

    /// Finds the descriptor of an XML local name.
    #[must_use]
    pub fn by_xml_name(&self, xml_name: &str) -> Option<&PropertyDescriptor> {
        self.descriptors.iter().find(|d| d.xml_name() == xml_name)
    }

    /// Finds the descriptor of an attribute name.
    #[must_use]
    pub fn by_attr_name(&self, attr_name: &str) -> Option<&PropertyDescriptor> {
        self.descriptors.iter().find(|d| d.attr_name() == attr_name)
    }

    /// Creates an entity of this kind at `href` holding `attrs`.
    ///
    /// ## Errors
    /// Returns `DavError::UnknownAttribute` for an attribute the schema does
    /// not declare.
    pub fn entity<'a>(
        &self,
        href: &str,
        attrs: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> DavResult<Entity> {
        let mut entity = Entity::new(self.kind.as_str(), href);
        for (attr, value) in attrs {
            if self.by_attr_name(attr).is_none() {
                return Err(DavError::UnknownAttribute {
                    kind: self.kind.clone(),
                    attr: attr.to_owned(),
                });
            }
            entity.set(attr, value);
        }
        Ok(entity)
    }

    /// Every property of the schema, grouped by prefix.
    #[must_use]
    pub fn fields(&self) -> FieldSelection {
        let mut fields = FieldSelection::new();
        for descriptor in &self.descriptors {
            fields.push(descriptor.prefix(), descriptor.xml_name());
        }
        fields
    }

    /// Builds a JSON payload from the attributes that carry a JSON alias.
    ///
    /// ## Summary
    /// `overrides` is keyed by attribute name. Attributes without an
    /// override take their default, produced afresh on every call.
    #[must_use]
    pub fn default_values(&self, overrides: &Map<String, Value>) -> Map<String, Value> {
        self.descriptors
            .iter()
            .filter_map(|descriptor| {
                let alias = descriptor.json_alias()?;
                let value = overrides
                    .get(descriptor.attr_name())
                    .cloned()
                    .unwrap_or_else(|| descriptor.default_value());
                Some((alias.to_owned(), value))
            })
            .collect()
    }
}
