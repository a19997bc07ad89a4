//! File and trash bin entries.

use crate::dav::core::{EntitySchema, NamespaceRegistry, PropertyDescriptor, PropertyOptions};
use crate::dav::parse::value::resource_type;
use crate::error::DavResult;

/// Entity kind of files and folders.
pub const FILE_KIND: &str = "file";

/// Entity kind of trash bin entries.
pub const TRASH_FILE_KIND: &str = "trash_file";

/// `resource_type` value of folders.
pub const COLLECTION: &str = "collection";

const PLAIN_PROPERTIES: &[(&str, &str)] = &[
    ("d", "getlastmodified"),
    ("d", "getetag"),
    ("d", "getcontenttype"),
];

const TRAILING_PROPERTIES: &[(&str, &str)] = &[
    ("d", "getcontentlength"),
    ("oc", "id"),
    ("oc", "fileid"),
    ("oc", "favorite"),
    ("oc", "comments-href"),
    ("oc", "comments-count"),
    ("oc", "comments-unread"),
    ("oc", "owner-id"),
    ("oc", "owner-display-name"),
    ("oc", "share-types"),
    ("oc", "checksums"),
    ("oc", "size"),
    ("oc", "href"),
    ("nc", "has-preview"),
];

fn describe_all(
    registry: &mut NamespaceRegistry,
    properties: &[(&str, &str)],
) -> DavResult<Vec<PropertyDescriptor>> {
    properties
        .iter()
        .map(|(prefix, name)| registry.describe_property(prefix, name, PropertyOptions::new()))
        .collect()
}

/// Builds the schema of files and folders.
///
/// ## Errors
/// Fails if `registry` lacks the `d`, `oc` or `nc` prefix.
pub fn file_schema(registry: &mut NamespaceRegistry) -> DavResult<EntitySchema> {
    let mut descriptors = describe_all(registry, PLAIN_PROPERTIES)?;
    descriptors.push(registry.describe_property(
        "d",
        "resourcetype",
        PropertyOptions::new().parser(resource_type),
    )?);
    descriptors.extend(describe_all(registry, TRAILING_PROPERTIES)?);
    EntitySchema::new(FILE_KIND, descriptors)
}

/// Builds the schema of trash bin entries from the file schema.
///
/// ## Errors
/// Fails if `registry` lacks the `nc` prefix.
pub fn trash_file_schema(
    registry: &mut NamespaceRegistry,
    file: &EntitySchema,
) -> DavResult<EntitySchema> {
    let extra = describe_all(
        registry,
        &[
            ("nc", "trashbin-filename"),
            ("nc", "trashbin-original-location"),
            ("nc", "trashbin-deletion-time"),
        ],
    )?;
    file.extend(TRASH_FILE_KIND, extra)
}
