//! System tags.

use crate::dav::core::{EntitySchema, NamespaceRegistry, PropertyOptions};
use crate::dav::parse::value::boolean;
use crate::error::DavResult;

/// Entity kind of system tags.
pub const TAG_KIND: &str = "tag";

/// Display name given to tags created without one.
pub const DEFAULT_TAG_NAME: &str = "default_tag_name";

/// Builds the system tag schema.
///
/// ## Errors
/// Fails if `registry` lacks the `oc` prefix.
pub fn tag_schema(registry: &mut NamespaceRegistry) -> DavResult<EntitySchema> {
    EntitySchema::new(
        TAG_KIND,
        [
            registry.describe_property("oc", "id", PropertyOptions::new())?,
            registry.describe_property(
                "oc",
                "display-name",
                PropertyOptions::new().json("name").default_value(DEFAULT_TAG_NAME),
            )?,
            registry.describe_property(
                "oc",
                "user-visible",
                PropertyOptions::new()
                    .json("userVisible")
                    .default_value(true)
                    .parser(boolean),
            )?,
            registry.describe_property(
                "oc",
                "can-assign",
                PropertyOptions::new()
                    .json("canAssign")
                    .default_value(true)
                    .parser(boolean),
            )?,
            registry.describe_property(
                "oc",
                "user-assignable",
                PropertyOptions::new()
                    .json("userAssignable")
                    .default_value(true)
                    .parser(boolean),
            )?,
        ],
    )
}
