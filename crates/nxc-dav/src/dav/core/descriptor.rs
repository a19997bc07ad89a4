//! Property descriptors.
//!
//! A descriptor ties one XML property (`oc:favorite`) to an entity attribute
//! (`favorite`), optionally with a JSON alias used in request payloads, a
//! default and a custom value parser.

use serde_json::Value;

use super::namespace::{Namespace, NamespaceRegistry, QName};
use super::xml::XmlNode;
use crate::error::{DavError, DavResult};

/// Custom conversion from a property element to its attribute value.
pub type ValueParser = fn(&XmlNode) -> Value;

/// Default of an attribute that is absent from a response.
#[derive(Debug, Clone, Default)]
pub enum DefaultValue {
    /// `null`.
    #[default]
    Null,
    /// A fixed value, cloned on every use.
    Value(Value),
    /// A factory invoked on every use.
    Factory(fn() -> Value),
}

impl DefaultValue {
    /// Produces the default. Factories run on every call.
    #[must_use]
    pub fn produce(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Value(value) => value.clone(),
            Self::Factory(factory) => factory(),
        }
    }
}

/// Options accepted by [`NamespaceRegistry::describe_property`].
#[derive(Debug, Clone, Default)]
pub struct PropertyOptions {
    attr_name: Option<String>,
    json_alias: Option<String>,
    default: DefaultValue,
    parser: Option<ValueParser>,
}

impl PropertyOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the derived attribute name.
    #[must_use]
    pub fn attr(mut self, attr_name: impl Into<String>) -> Self {
        self.attr_name = Some(attr_name.into());
        self
    }

    /// Sets the key used for this attribute in JSON payloads.
    #[must_use]
    pub fn json(mut self, alias: impl Into<String>) -> Self {
        self.json_alias = Some(alias.into());
        self
    }

    /// Sets a fixed default.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = DefaultValue::Value(value.into());
        self
    }

    /// Sets a default factory.
    #[must_use]
    pub fn default_with(mut self, factory: fn() -> Value) -> Self {
        self.default = DefaultValue::Factory(factory);
        self
    }

    /// Sets a custom value parser.
    #[must_use]
    pub fn parser(mut self, parser: ValueParser) -> Self {
        self.parser = Some(parser);
        self
    }
}

/// Describes one property of an entity schema.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    prefix: String,
    namespace: Namespace,
    xml_name: String,
    attr_name: String,
    json_alias: Option<String>,
    default: DefaultValue,
    parser: Option<ValueParser>,
}

impl PropertyDescriptor {
    /// Namespace prefix (`d`, `oc`, ...).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Namespace of the XML element.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// XML local name.
    #[must_use]
    pub fn xml_name(&self) -> &str {
        &self.xml_name
    }

    /// Entity attribute name.
    #[must_use]
    pub fn attr_name(&self) -> &str {
        &self.attr_name
    }

    /// Key used in JSON payloads, if any.
    #[must_use]
    pub fn json_alias(&self) -> Option<&str> {
        self.json_alias.as_deref()
    }

    /// Qualified XML name.
    #[must_use]
    pub fn qname(&self) -> QName {
        QName::new(self.namespace.clone(), self.xml_name.clone())
    }

    /// Produces a fresh default value.
    #[must_use]
    pub fn default_value(&self) -> Value {
        self.default.produce()
    }

    /// Decodes the attribute value from its XML element.
    ///
    /// Without a custom parser the text content is used, `null` for an
    /// empty element.
    #[must_use]
    pub fn value_from(&self, node: &XmlNode) -> Value {
        match self.parser {
            Some(parser) => parser(node),
            None => node
                .text()
                .map_or(Value::Null, |text| Value::String(text.to_owned())),
        }
    }
}

impl NamespaceRegistry {
    /// Declares a property of `prefix`.
    ///
    /// ## Summary
    /// The attribute name is derived through the namespace's renaming table
    /// unless `options` overrides it, in which case the override is
    /// registered so both translation directions agree.
    ///
    /// ## Errors
    /// Returns `DavError::UnknownNamespace` for an unbound prefix and
    /// `DavError::RenameConflict` when the override contradicts an earlier
    /// one.
    pub fn describe_property(
        &mut self,
        prefix: &str,
        xml_name: &str,
        options: PropertyOptions,
    ) -> DavResult<PropertyDescriptor> {
        let namespace = self
            .namespace(prefix)
            .cloned()
            .ok_or_else(|| DavError::UnknownNamespace(prefix.to_owned()))?;

        let attr_name = match options.attr_name {
            Some(attr) => {
                self.rename(prefix, xml_name, &attr)?;
                attr
            }
            None => self.xml_to_attr(prefix, xml_name)?,
        };

        Ok(PropertyDescriptor {
            prefix: prefix.to_owned(),
            namespace,
            xml_name: xml_name.to_owned(),
            attr_name,
            json_alias: options.json_alias,
            default: options.default,
            parser: options.parser,
        })
    }
}
