//! Generic XML document parsing.

use quick_xml::NsReader;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::name::ResolveResult;

use super::error::{ParseError, ParseResult};
use crate::dav::core::{QName, XmlNode};

/// An element whose end tag has not been read yet.
struct OpenElement {
    node: XmlNode,
    text: String,
}

impl OpenElement {
    fn close(mut self) -> XmlNode {
        if !self.text.trim().is_empty() {
            self.node.text = Some(self.text);
        }
        self.node
    }
}

/// Parses an XML document into an element tree.
///
/// ## Summary
/// Element names are resolved against the `xmlns` declarations in scope.
/// An encoding declared in the prolog is honoured. Character and predefined
/// entity references are expanded into the surrounding text.
///
/// ## Errors
/// Returns `ParseErrorKind::XmlError` for malformed or truncated documents,
/// `ParseErrorKind::UnboundPrefix` for prefixes without a declaration and
/// `ParseErrorKind::EncodingError` for undecodable text.
#[tracing::instrument(skip(xml), fields(xml_len = xml.as_ref().len()))]
pub fn parse_document(xml: impl AsRef<[u8]>) -> ParseResult<XmlNode> {
    let xml = xml.as_ref();
    let mut reader = NsReader::from_reader(xml);

    let mut buf = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_resolved_event_into(&mut buf)? {
            (ns, Event::Start(e)) => {
                let name = qualified_name(&ns, &e)?;
                ensure_single_root(&stack, root.as_ref(), &name)?;
                stack.push(OpenElement {
                    node: XmlNode::new(name),
                    text: String::new(),
                });
            }
            (ns, Event::Empty(e)) => {
                let name = qualified_name(&ns, &e)?;
                ensure_single_root(&stack, root.as_ref(), &name)?;
                attach(&mut stack, &mut root, XmlNode::new(name));
            }
            (_, Event::End(_)) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| ParseError::xml("end tag without matching start tag"))?;
                attach(&mut stack, &mut root, open.close());
            }
            (_, Event::Text(e)) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&e.decode()?);
                }
            }
            (_, Event::CData(e)) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&e.decode()?);
                }
            }
            (_, Event::GeneralRef(e)) => {
                let expanded = expand_reference(&e)?;
                if let Some(open) = stack.last_mut() {
                    open.text.push(expanded);
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::xml(format!(
            "unexpected end of document inside {}",
            open.node.name
        )));
    }

    root.ok_or_else(|| ParseError::missing_element("document root"))
}

fn qualified_name(ns: &ResolveResult<'_>, e: &BytesStart<'_>) -> ParseResult<QName> {
    let local = std::str::from_utf8(e.local_name().as_ref())?.to_owned();
    let uri = match ns {
        ResolveResult::Bound(namespace) => std::str::from_utf8(namespace.0)?.to_owned(),
        ResolveResult::Unbound => String::new(),
        ResolveResult::Unknown(prefix) => {
            return Err(ParseError::unbound_prefix(&String::from_utf8_lossy(prefix)));
        }
    };
    Ok(QName::new(uri, local))
}

fn ensure_single_root(
    stack: &[OpenElement],
    root: Option<&XmlNode>,
    name: &QName,
) -> ParseResult<()> {
    if stack.is_empty() && root.is_some() {
        return Err(ParseError::xml(format!(
            "second root element {name} after document root"
        )));
    }
    Ok(())
}

fn attach(stack: &mut [OpenElement], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.node.children.push(node),
        None => *root = Some(node),
    }
}

fn expand_reference(e: &BytesRef<'_>) -> ParseResult<char> {
    if let Some(ch) = e.resolve_char_ref()? {
        return Ok(ch);
    }
    match e.decode()?.as_ref() {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        other => Err(ParseError::invalid_value(format!(
            "unknown entity &{other};"
        ))),
    }
}
