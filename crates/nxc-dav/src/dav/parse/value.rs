//! Value parsers for individual properties.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::dav::core::XmlNode;

/// Format of `DAV:getlastmodified`, e.g. `Wed, 20 Jul 2022 05:12:23 GMT`.
pub const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parses `DAV:resourcetype`: the local name of the first child element.
///
/// Collections yield `"collection"`, plain files have no child and yield
/// `null`.
#[must_use]
pub fn resource_type(node: &XmlNode) -> Value {
    node.first_child()
        .map_or(Value::Null, |child| Value::String(child.local_name().to_owned()))
}

/// Parses a boolean flag sent as `true`/`false` or `1`/`0`.
///
/// Other text is kept as a string, an empty element is `null`.
#[must_use]
pub fn boolean(node: &XmlNode) -> Value {
    match node.text().map(str::trim) {
        None | Some("") => Value::Null,
        Some("true" | "1") => Value::Bool(true),
        Some("false" | "0") => Value::Bool(false),
        Some(other) => Value::String(other.to_owned()),
    }
}

/// Converts an RFC 1123 date to seconds since the Unix epoch.
///
/// Returns `None` when `value` does not match [`RFC1123_FORMAT`].
#[must_use]
pub fn rfc1123_to_epoch(value: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(value.trim(), RFC1123_FORMAT)
        .inspect_err(|err| tracing::debug!(%value, error = %err, "Invalid RFC 1123 date"))
        .ok()
        .map(|naive| naive.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dav::core::QName;

    #[test]
    fn resource_type_collection() {
        let node = XmlNode::new(QName::dav("resourcetype"))
            .with_child(XmlNode::new(QName::dav("collection")));
        assert_eq!(resource_type(&node), json!("collection"));
    }

    #[test]
    fn resource_type_file() {
        let node = XmlNode::new(QName::dav("resourcetype"));
        assert_eq!(resource_type(&node), Value::Null);
    }

    #[test]
    fn boolean_flags() {
        let flag = |text: &str| XmlNode::new(QName::dav("flag")).with_text(text);
        assert_eq!(boolean(&flag("true")), json!(true));
        assert_eq!(boolean(&flag("0")), json!(false));
        assert_eq!(boolean(&flag("maybe")), json!("maybe"));
        assert_eq!(boolean(&XmlNode::new(QName::dav("flag"))), Value::Null);
    }

    #[test]
    fn epoch_from_rfc1123() {
        assert_eq!(
            rfc1123_to_epoch("Wed, 20 Jul 2022 05:12:23 GMT"),
            Some(1_658_293_943)
        );
        assert_eq!(rfc1123_to_epoch("Thu, 01 Jan 1970 00:00:00 GMT"), Some(0));
    }

    #[test]
    fn epoch_rejects_garbage() {
        assert_eq!(rfc1123_to_epoch("2022-07-20T05:12:23Z"), None);
        assert_eq!(rfc1123_to_epoch(""), None);
    }
}
