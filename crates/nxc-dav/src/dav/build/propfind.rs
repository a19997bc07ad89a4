//! PROPFIND and filter REPORT bodies.

use super::{finish_document, is_writable, start_document, write_empty, write_end, write_start, write_text_element};
use crate::dav::core::{EntitySchema, FieldSelection, NamespaceRegistry, PropertyValues};
use crate::error::DavResult;

/// Root element of a plain `PROPFIND`.
pub const PROPFIND_INSTRUCTION: &str = "d:propfind";

/// Root element of a filter `REPORT`.
pub const FILTER_FILES_INSTRUCTION: &str = "oc:filter-files";

/// Options of [`build_propfind_body`].
#[derive(Debug, Clone, Default)]
pub struct PropfindOptions {
    /// Root element, `d:propfind` when unset.
    pub instruction: Option<String>,
    /// Rules written under `oc:filter-rules`.
    pub filter_rules: PropertyValues,
    /// Request every schema property when `fields` is empty.
    pub use_all_schema_fields: bool,
    /// Explicitly requested properties.
    pub fields: FieldSelection,
}

impl PropfindOptions {
    /// Requests every property of the schema.
    #[must_use]
    pub fn all_fields() -> Self {
        Self {
            use_all_schema_fields: true,
            ..Self::default()
        }
    }

    /// Builds a filter `REPORT` with `rules`, requesting every schema field.
    #[must_use]
    pub fn filter(rules: PropertyValues) -> Self {
        Self {
            instruction: Some(FILTER_FILES_INSTRUCTION.to_owned()),
            filter_rules: rules,
            use_all_schema_fields: true,
            fields: FieldSelection::new(),
        }
    }
}

/// Builds a `PROPFIND` or filter `REPORT` body.
///
/// ## Summary
/// Requested properties go under `d:prop`: the explicit `fields`, or every
/// descriptor of `schema` when `use_all_schema_fields` is set and no field
/// was given. Properties under an unregistered prefix are dropped, and
/// `d:prop` is omitted when none is left. Filter rules go under
/// `oc:filter-rules`, omitted when empty.
///
/// ## Errors
/// Returns `DavError::Serialize` if writing the XML fails.
pub fn build_propfind_body(
    registry: &NamespaceRegistry,
    schema: Option<&EntitySchema>,
    options: &PropfindOptions,
) -> DavResult<String> {
    let root = options.instruction.as_deref().unwrap_or(PROPFIND_INSTRUCTION);

    let fields = match schema {
        Some(schema) if options.fields.is_empty() && options.use_all_schema_fields => schema.fields(),
        _ => options.fields.clone(),
    };

    let props: Vec<String> = fields
        .groups()
        .filter(|(prefix, _)| is_writable(registry, prefix))
        .flat_map(|(prefix, names)| names.iter().map(move |name| format!("{prefix}:{name}")))
        .collect();

    let mut writer = start_document(registry, root)?;

    // An empty d:prop asks for nothing, while no d:prop asks for everything.
    if !props.is_empty() {
        write_start(&mut writer, "d:prop")?;
        for prop in &props {
            write_empty(&mut writer, prop)?;
        }
        write_end(&mut writer, "d:prop")?;
    }

    if !options.filter_rules.is_empty() {
        write_start(&mut writer, "oc:filter-rules")?;
        for (prefix, rules) in options.filter_rules.groups() {
            if !is_writable(registry, prefix) {
                continue;
            }
            for (name, value) in rules {
                write_text_element(&mut writer, &format!("{prefix}:{name}"), &value.to_string())?;
            }
        }
        write_end(&mut writer, "oc:filter-rules")?;
    }

    finish_document(writer, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dav::core::{DAV_NS, OWNCLOUD_NS, PropertyOptions};
    use crate::dav::parse::parse_document;

    fn registry() -> NamespaceRegistry {
        NamespaceRegistry::with_defaults()
    }

    #[test]
    fn declares_every_namespace() {
        let body = build_propfind_body(&registry(), None, &PropfindOptions::default()).unwrap();
        assert!(body.starts_with("<?xml"));
        assert!(body.contains(r#"xmlns:d="DAV:""#));
        assert!(body.contains(r#"xmlns:oc="http://owncloud.org/ns""#));
        assert!(body.contains(r#"xmlns:nc="http://nextcloud.org/ns""#));

        let root = parse_document(&body).unwrap();
        assert!(root.name.is(DAV_NS, "propfind"));
        assert!(root.children.is_empty());
    }

    #[test]
    fn all_schema_fields() {
        let mut registry = registry();
        let schema = EntitySchema::new(
            "file",
            [
                registry.describe_property("d", "getetag", PropertyOptions::new()).unwrap(),
                registry.describe_property("oc", "fileid", PropertyOptions::new()).unwrap(),
            ],
        )
        .unwrap();

        let body =
            build_propfind_body(&registry, Some(&schema), &PropfindOptions::all_fields()).unwrap();
        let root = parse_document(&body).unwrap();
        let prop = root.child(DAV_NS, "prop").unwrap();
        assert!(prop.child(DAV_NS, "getetag").is_some());
        assert!(prop.child(OWNCLOUD_NS, "fileid").is_some());
    }

    #[test]
    fn explicit_fields_win_over_schema() {
        let mut registry = registry();
        let schema = EntitySchema::new(
            "file",
            [registry.describe_property("d", "getetag", PropertyOptions::new()).unwrap()],
        )
        .unwrap();
        let options = PropfindOptions {
            fields: FieldSelection::new().with("oc", "favorite").with("x", "ignored"),
            ..PropfindOptions::all_fields()
        };

        let body = build_propfind_body(&registry, Some(&schema), &options).unwrap();
        let root = parse_document(&body).unwrap();
        let prop = root.child(DAV_NS, "prop").unwrap();
        assert_eq!(prop.children.len(), 1);
        assert!(prop.child(OWNCLOUD_NS, "favorite").is_some());
        assert!(!body.contains("ignored"));
    }

    #[test]
    fn unregistered_fields_leave_no_prop_element() {
        let options = PropfindOptions {
            fields: FieldSelection::new().with("x", "colour").with("y", "size"),
            ..PropfindOptions::default()
        };
        let body = build_propfind_body(&registry(), None, &options).unwrap();
        assert!(!body.contains("d:prop"));

        let root = parse_document(&body).unwrap();
        assert!(root.name.is(DAV_NS, "propfind"));
        assert!(root.children.is_empty());
    }

    #[test]
    fn filter_rules_render_integers() {
        let options = PropfindOptions::filter(PropertyValues::new().with("oc", "favorite", 1));
        let body = build_propfind_body(&registry(), None, &options).unwrap();

        let root = parse_document(&body).unwrap();
        assert!(root.name.is(OWNCLOUD_NS, "filter-files"));
        let favorite = root
            .child(OWNCLOUD_NS, "filter-rules")
            .and_then(|rules| rules.child(OWNCLOUD_NS, "favorite"))
            .unwrap();
        assert_eq!(favorite.text(), Some("1"));
    }

    #[test]
    fn filter_rule_text_is_escaped() {
        let options = PropfindOptions::filter(PropertyValues::new().with("oc", "systemtag", "a&b"));
        let body = build_propfind_body(&registry(), None, &options).unwrap();
        assert!(body.contains("a&amp;b"));
        let root = parse_document(&body).unwrap();
        let tag = root
            .child(OWNCLOUD_NS, "filter-rules")
            .and_then(|rules| rules.child(OWNCLOUD_NS, "systemtag"))
            .unwrap();
        assert_eq!(tag.text(), Some("a&b"));
    }
}
