//! PROPPATCH bodies.

use super::{finish_document, is_writable, start_document, write_end, write_start, write_text_element};
use crate::dav::core::{NamespaceRegistry, PropertyValues};
use crate::error::DavResult;

const PROPERTYUPDATE: &str = "d:propertyupdate";

/// Builds a `d:propertyupdate` body setting every value in `values`.
///
/// ## Summary
/// Values are written as `d:set/d:prop/<prefix:name>`. Without values the
/// body holds only the root element.
///
/// ## Errors
/// Returns `DavError::Serialize` if writing the XML fails.
pub fn build_propupdate_body(registry: &NamespaceRegistry, values: &PropertyValues) -> DavResult<String> {
    let mut writer = start_document(registry, PROPERTYUPDATE)?;

    if !values.is_empty() {
        write_start(&mut writer, "d:set")?;
        write_start(&mut writer, "d:prop")?;
        for (prefix, entries) in values.groups() {
            if !is_writable(registry, prefix) {
                continue;
            }
            for (name, value) in entries {
                write_text_element(&mut writer, &format!("{prefix}:{name}"), &value.to_string())?;
            }
        }
        write_end(&mut writer, "d:prop")?;
        write_end(&mut writer, "d:set")?;
    }

    finish_document(writer, PROPERTYUPDATE)
}
