//! Multistatus response decoding.

use super::error::{ParseError, ParseResult};
use super::tree::parse_document;
use crate::dav::core::{DAV_NS, Entity, EntitySchema, Origin, QName, XmlNode};

/// Status line of a propstat whose properties are applied.
pub const SUCCESS_STATUS: &str = "HTTP/1.1 200 OK";

/// Entity predicate used to filter decoded entities.
pub type EntityFilter<'a> = &'a dyn Fn(&Entity) -> bool;

/// Options of [`parse_multistatus`].
#[derive(Default, Clone)]
pub struct MultistatusOptions<'a> {
    /// Pre-populate every schema attribute with its default.
    pub init_missing_to_default: bool,
    /// Keep only entities accepted by this predicate.
    pub filter: Option<EntityFilter<'a>>,
    /// Producer handle attached to every entity.
    pub origin: Option<Origin>,
}

impl std::fmt::Debug for MultistatusOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultistatusOptions")
            .field("init_missing_to_default", &self.init_missing_to_default)
            .field("filter", &self.filter.is_some())
            .field("origin", &self.origin.is_some())
            .finish()
    }
}

/// Decodes a multistatus body into entities of `schema`.
///
/// ## Summary
/// Every `d:response` becomes one entity. Properties are taken only from
/// propstats whose status is [`SUCCESS_STATUS`]; other propstats are
/// ignored. Properties are matched to descriptors by local name, unknown
/// ones are skipped.
///
/// ## Errors
/// Returns an error if the body is not well-formed XML, the root is not
/// `d:multistatus` or a response has no `d:href`.
#[tracing::instrument(skip(xml, schema, options), fields(xml_len = xml.as_ref().len(), kind = schema.kind()))]
pub fn parse_multistatus(
    xml: impl AsRef<[u8]>,
    schema: &EntitySchema,
    options: &MultistatusOptions<'_>,
) -> ParseResult<Vec<Entity>> {
    let root = parse_document(xml)?;
    if !root.name.is(DAV_NS, "multistatus") {
        return Err(ParseError::unexpected_element(&root.name.to_string()));
    }

    let mut entities = Vec::new();
    for response in root.children_named(DAV_NS, "response") {
        let entity = decode_response(response, schema, options)?;
        if options.filter.is_none_or(|keep| keep(&entity)) {
            entities.push(entity);
        }
    }

    tracing::debug!(count = entities.len(), "Decoded multistatus entities");
    Ok(entities)
}

fn decode_response(
    response: &XmlNode,
    schema: &EntitySchema,
    options: &MultistatusOptions<'_>,
) -> ParseResult<Entity> {
    let href = response
        .child(DAV_NS, "href")
        .and_then(XmlNode::text)
        .ok_or_else(|| ParseError::missing_element("href"))?;

    let mut entity = Entity::new(schema.kind(), href.trim());
    if let Some(origin) = &options.origin {
        entity = entity.with_origin(origin.clone());
    }

    if options.init_missing_to_default {
        for descriptor in schema.descriptors() {
            entity.set(descriptor.attr_name(), descriptor.default_value());
        }
    }

    for prop in successful_props(response) {
        for property in &prop.children {
            match schema.by_xml_name(property.local_name()) {
                Some(descriptor) => {
                    entity.set(descriptor.attr_name(), descriptor.value_from(property));
                }
                None => tracing::trace!(property = %property.name, "Ignoring unknown property"),
            }
        }
    }

    Ok(entity)
}

fn successful_props(response: &XmlNode) -> impl Iterator<Item = &XmlNode> {
    response
        .children_named(DAV_NS, "propstat")
        .filter(|propstat| {
            let status = propstat.child(DAV_NS, "status").and_then(XmlNode::text);
            let ok = status.is_some_and(|s| s.trim() == SUCCESS_STATUS);
            if !ok {
                tracing::trace!(status = ?status, "Skipping propstat");
            }
            ok
        })
        .flat_map(|propstat| propstat.children_named(DAV_NS, "prop"))
}

/// Returns the text of `property` in the first response of a multistatus.
///
/// ## Errors
/// Returns an error if the body is not well-formed XML.
pub fn first_property_text(xml: impl AsRef<[u8]>, property: &QName) -> ParseResult<Option<String>> {
    let root = parse_document(xml)?;
    let value = root
        .children_named(DAV_NS, "response")
        .next()
        .into_iter()
        .flat_map(successful_props)
        .flat_map(|prop| prop.children.iter())
        .find(|node| node.name == *property)
        .and_then(|node| node.text.clone());
    Ok(value)
}
