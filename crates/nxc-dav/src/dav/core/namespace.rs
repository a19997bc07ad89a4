//! XML namespaces, qualified names and the prefix registry.
//!
//! The registry maps short prefixes (`d`, `oc`, `nc`) to namespace URIs and
//! owns one renaming table per prefix. The tables translate XML local names
//! (`getetag`) to entity attribute names (`etag`) and back; anything not in
//! a table falls back to swapping `-` and `_`.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::{DavError, DavResult};

/// `DAV:` namespace URI.
pub const DAV_NS: &str = "DAV:";

/// ownCloud namespace URI.
pub const OWNCLOUD_NS: &str = "http://owncloud.org/ns";

/// Nextcloud namespace URI.
pub const NEXTCLOUD_NS: &str = "http://nextcloud.org/ns";

/// An XML namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(pub Cow<'static, str>);

impl Namespace {
    /// `DAV:` namespace.
    pub const DAV: Self = Self(Cow::Borrowed(DAV_NS));

    /// ownCloud namespace.
    pub const OWNCLOUD: Self = Self(Cow::Borrowed(OWNCLOUD_NS));

    /// Nextcloud namespace.
    pub const NEXTCLOUD: Self = Self(Cow::Borrowed(NEXTCLOUD_NS));

    /// Creates a new namespace from a string.
    #[must_use]
    pub fn new(uri: impl Into<Cow<'static, str>>) -> Self {
        Self(uri.into())
    }

    /// Returns the namespace URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the conventional prefix for this namespace.
    #[must_use]
    pub fn default_prefix(&self) -> Option<&'static str> {
        match self.0.as_ref() {
            DAV_NS => Some("d"),
            OWNCLOUD_NS => Some("oc"),
            NEXTCLOUD_NS => Some("nc"),
            _ => None,
        }
    }
}

impl From<&'static str> for Namespace {
    fn from(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }
}

impl From<String> for Namespace {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

/// A qualified XML name (namespace + local name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// The namespace URI.
    pub namespace: Namespace,
    /// The local name.
    pub local_name: Cow<'static, str>,
}

impl QName {
    /// Creates a new qualified name.
    #[must_use]
    pub fn new(namespace: impl Into<Namespace>, local_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }

    /// Creates a `DAV:` qualified name.
    #[must_use]
    pub fn dav(local_name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Namespace::DAV, local_name)
    }

    /// Creates an ownCloud qualified name.
    #[must_use]
    pub fn oc(local_name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Namespace::OWNCLOUD, local_name)
    }

    /// Creates a Nextcloud qualified name.
    #[must_use]
    pub fn nc(local_name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Namespace::NEXTCLOUD, local_name)
    }

    /// Returns the local name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns the namespace URI.
    #[must_use]
    pub fn namespace_uri(&self) -> &str {
        self.namespace.as_str()
    }

    /// Returns whether this is a DAV: element.
    #[must_use]
    pub fn is_dav(&self) -> bool {
        self.namespace == Namespace::DAV
    }

    /// Returns whether the name is `local` in the namespace `uri`.
    #[must_use]
    pub fn is(&self, uri: &str, local: &str) -> bool {
        self.namespace.as_str() == uri && self.local_name == local
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}{}", self.namespace.as_str(), self.local_name)
    }
}

/// Per-namespace translation between XML local names and attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingConvention {
    xml_to_attr: BTreeMap<String, String>,
    attr_to_xml: BTreeMap<String, String>,
}

impl NamingConvention {
    /// Builds a convention from `(xml name, attribute name)` overrides.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut convention = Self::default();
        for (xml, attr) in pairs {
            convention.insert(xml, attr);
        }
        convention
    }

    fn insert(&mut self, xml_name: &str, attr_name: &str) {
        self.xml_to_attr
            .insert(xml_name.to_owned(), attr_name.to_owned());
        self.attr_to_xml
            .insert(attr_name.to_owned(), xml_name.to_owned());
    }

    /// Returns the explicit override for `xml_name`, if any.
    #[must_use]
    pub fn override_for(&self, xml_name: &str) -> Option<&str> {
        self.xml_to_attr.get(xml_name).map(String::as_str)
    }

    /// Translates an XML local name into an attribute name.
    #[must_use]
    pub fn attr_name(&self, xml_name: &str) -> String {
        self.xml_to_attr
            .get(xml_name)
            .cloned()
            .unwrap_or_else(|| xml_name.replace('-', "_"))
    }

    /// Translates an attribute name back into an XML local name.
    #[must_use]
    pub fn xml_name(&self, attr_name: &str) -> String {
        self.attr_to_xml
            .get(attr_name)
            .cloned()
            .unwrap_or_else(|| attr_name.replace('_', "-"))
    }
}

#[derive(Debug, Clone)]
struct Binding {
    prefix: String,
    namespace: Namespace,
    convention: NamingConvention,
}

/// Prefix → namespace table with one renaming table per prefix.
///
/// Bindings keep their registration order, which is also the order of the
/// `xmlns:` declarations written into request bodies.
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    bindings: Vec<Binding>,
}

impl NamespaceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with `d`, `oc` and `nc` and their renaming tables.
    #[must_use]
    pub fn with_defaults() -> Self {
        let dav = NamingConvention::from_pairs(&[
            ("getlastmodified", "last_modified"),
            ("getetag", "etag"),
            ("getcontenttype", "content_type"),
            ("resourcetype", "resource_type"),
            ("getcontentlength", "content_length"),
        ]);
        let owncloud =
            NamingConvention::from_pairs(&[("fileid", "file_id"), ("checksums", "check_sums")]);

        Self {
            bindings: vec![
                Binding {
                    prefix: "d".to_owned(),
                    namespace: Namespace::DAV,
                    convention: dav,
                },
                Binding {
                    prefix: "oc".to_owned(),
                    namespace: Namespace::OWNCLOUD,
                    convention: owncloud,
                },
                Binding {
                    prefix: "nc".to_owned(),
                    namespace: Namespace::NEXTCLOUD,
                    convention: NamingConvention::default(),
                },
            ],
        }
    }

    /// Binds `prefix` to `uri`.
    ///
    /// ## Errors
    /// Returns `DavError::NamespaceConflict` if the prefix is already bound
    /// to a different URI. Binding the same pair twice is a no-op.
    pub fn register_namespace(
        &mut self,
        prefix: &str,
        uri: impl Into<Cow<'static, str>>,
    ) -> DavResult<()> {
        let namespace = Namespace::new(uri);
        if let Some(existing) = self.binding(prefix) {
            if existing.namespace == namespace {
                return Ok(());
            }
            return Err(DavError::NamespaceConflict {
                prefix: prefix.to_owned(),
                existing: existing.namespace.as_str().to_owned(),
                requested: namespace.as_str().to_owned(),
            });
        }

        tracing::debug!(prefix, uri = namespace.as_str(), "Registering namespace");
        self.bindings.push(Binding {
            prefix: prefix.to_owned(),
            namespace,
            convention: NamingConvention::default(),
        });
        Ok(())
    }

    /// Adds an explicit `xml_name ↔ attr_name` override to `prefix`'s table.
    ///
    /// ## Errors
    /// Returns `DavError::UnknownNamespace` for an unbound prefix and
    /// `DavError::RenameConflict` when `xml_name` already maps to another
    /// attribute name.
    pub fn rename(&mut self, prefix: &str, xml_name: &str, attr_name: &str) -> DavResult<()> {
        let binding = self
            .bindings
            .iter_mut()
            .find(|b| b.prefix == prefix)
            .ok_or_else(|| DavError::UnknownNamespace(prefix.to_owned()))?;

        match binding.convention.override_for(xml_name) {
            Some(existing) if existing == attr_name => Ok(()),
            Some(existing) => Err(DavError::RenameConflict {
                prefix: prefix.to_owned(),
                xml_name: xml_name.to_owned(),
                existing: existing.to_owned(),
                requested: attr_name.to_owned(),
            }),
            None => {
                binding.convention.insert(xml_name, attr_name);
                Ok(())
            }
        }
    }

    fn binding(&self, prefix: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.prefix == prefix)
    }

    /// Returns the namespace bound to `prefix`.
    #[must_use]
    pub fn namespace(&self, prefix: &str) -> Option<&Namespace> {
        self.binding(prefix).map(|b| &b.namespace)
    }

    /// Returns the renaming table of `prefix`.
    #[must_use]
    pub fn convention(&self, prefix: &str) -> Option<&NamingConvention> {
        self.binding(prefix).map(|b| &b.convention)
    }

    /// Returns the prefix bound to the namespace `uri`.
    #[must_use]
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.namespace.as_str() == uri)
            .map(|b| b.prefix.as_str())
    }

    /// Returns whether `prefix` is bound.
    #[must_use]
    pub fn contains(&self, prefix: &str) -> bool {
        self.binding(prefix).is_some()
    }

    /// Iterates `(prefix, namespace)` pairs in registration order.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &Namespace)> {
        self.bindings
            .iter()
            .map(|b| (b.prefix.as_str(), &b.namespace))
    }

    /// Translates an XML local name of `prefix` into an attribute name.
    ///
    /// ## Errors
    /// Returns `DavError::UnknownNamespace` for an unbound prefix.
    pub fn xml_to_attr(&self, prefix: &str, xml_name: &str) -> DavResult<String> {
        self.convention(prefix)
            .map(|c| c.attr_name(xml_name))
            .ok_or_else(|| DavError::UnknownNamespace(prefix.to_owned()))
    }

    /// Translates an attribute name back into an XML local name of `prefix`.
    ///
    /// ## Errors
    /// Returns `DavError::UnknownNamespace` for an unbound prefix.
    pub fn attr_to_xml(&self, prefix: &str, attr_name: &str) -> DavResult<String> {
        self.convention(prefix)
            .map(|c| c.xml_name(attr_name))
            .ok_or_else(|| DavError::UnknownNamespace(prefix.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qname_display() {
        let qname = QName::dav("getetag");
        assert_eq!(qname.to_string(), "{DAV:}getetag");
    }

    #[test]
    fn qname_is() {
        let qname = QName::oc("favorite");
        assert!(qname.is(OWNCLOUD_NS, "favorite"));
        assert!(!qname.is(NEXTCLOUD_NS, "favorite"));
        assert!(!qname.is_dav());
    }

    #[test]
    fn namespace_prefix() {
        assert_eq!(Namespace::DAV.default_prefix(), Some("d"));
        assert_eq!(Namespace::OWNCLOUD.default_prefix(), Some("oc"));
        assert_eq!(Namespace::new("urn:other").default_prefix(), None);
    }

    #[test]
    fn default_conventions() {
        let registry = NamespaceRegistry::with_defaults();
        assert_eq!(registry.xml_to_attr("d", "getetag").unwrap(), "etag");
        assert_eq!(registry.xml_to_attr("oc", "fileid").unwrap(), "file_id");
        assert_eq!(
            registry.xml_to_attr("oc", "owner-display-name").unwrap(),
            "owner_display_name"
        );
        assert_eq!(registry.attr_to_xml("d", "last_modified").unwrap(), "getlastmodified");
        assert_eq!(registry.attr_to_xml("nc", "has_preview").unwrap(), "has-preview");
    }

    #[test]
    fn registered_names_round_trip() {
        let registry = NamespaceRegistry::with_defaults();
        for (prefix, xml_name) in [
            ("d", "getlastmodified"),
            ("d", "getcontentlength"),
            ("oc", "checksums"),
            ("oc", "comments-unread"),
            ("nc", "trashbin-original-location"),
        ] {
            let attr = registry.xml_to_attr(prefix, xml_name).unwrap();
            let xml = registry.attr_to_xml(prefix, &attr).unwrap();
            assert_eq!(xml, xml_name);
            assert_eq!(registry.xml_to_attr(prefix, &xml).unwrap(), attr);
        }
    }

    #[test]
    fn register_same_uri_twice_is_noop() {
        let mut registry = NamespaceRegistry::with_defaults();
        registry.register_namespace("oc", OWNCLOUD_NS).unwrap();
        assert_eq!(registry.prefixes().count(), 3);
    }

    #[test]
    fn register_conflicting_uri_fails() {
        let mut registry = NamespaceRegistry::with_defaults();
        let err = registry
            .register_namespace("oc", "http://example.com/ns")
            .unwrap_err();
        assert!(matches!(err, DavError::NamespaceConflict { .. }));
    }

    #[test]
    fn register_new_prefix_keeps_order() {
        let mut registry = NamespaceRegistry::with_defaults();
        registry
            .register_namespace("x", "http://example.com/ns")
            .unwrap();
        let prefixes: Vec<_> = registry.prefixes().map(|(p, _)| p).collect();
        assert_eq!(prefixes, ["d", "oc", "nc", "x"]);
        assert_eq!(registry.prefix_for("http://example.com/ns"), Some("x"));
    }

    #[test]
    fn rename_conflict_is_rejected() {
        let mut registry = NamespaceRegistry::with_defaults();
        registry.rename("nc", "has-preview", "previewable").unwrap();
        registry.rename("nc", "has-preview", "previewable").unwrap();
        let err = registry.rename("nc", "has-preview", "preview").unwrap_err();
        assert!(matches!(err, DavError::RenameConflict { .. }));
    }

    #[test]
    fn unknown_prefix_is_reported() {
        let registry = NamespaceRegistry::with_defaults();
        assert!(matches!(
            registry.xml_to_attr("zz", "foo"),
            Err(DavError::UnknownNamespace(_))
        ));
    }
}
