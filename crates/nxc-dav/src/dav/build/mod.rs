//! Request body serialization.
//!
//! Builds `PROPFIND`, `REPORT` (`oc:filter-files`) and `PROPPATCH` bodies
//! from schemas, field selections and property values.

mod propfind;
mod proppatch;

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::dav::core::NamespaceRegistry;
use crate::error::{DavError, DavResult};

pub use propfind::{FILTER_FILES_INSTRUCTION, PROPFIND_INSTRUCTION, PropfindOptions, build_propfind_body};
pub use proppatch::build_propupdate_body;

/// Starts a document: XML declaration plus the root element carrying an
/// `xmlns:` declaration for every registered prefix.
fn start_document(registry: &NamespaceRegistry, root: &str) -> io::Result<Writer<Vec<u8>>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut elem = BytesStart::new(root);
    for (prefix, namespace) in registry.prefixes() {
        elem.push_attribute((format!("xmlns:{prefix}").as_str(), namespace.as_str()));
    }
    writer.write_event(Event::Start(elem))?;
    Ok(writer)
}

fn finish_document(mut writer: Writer<Vec<u8>>, root: &str) -> DavResult<String> {
    writer.write_event(Event::End(BytesEnd::new(root)))?;
    String::from_utf8(writer.into_inner()).map_err(|e| {
        tracing::error!("Generated invalid UTF-8 in request body: {}", e);
        DavError::Serialize("invalid UTF-8 in XML output".to_owned())
    })
}

fn write_start<W: io::Write>(writer: &mut Writer<W>, name: &str) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))
}

fn write_end<W: io::Write>(writer: &mut Writer<W>, name: &str) -> io::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))
}

fn write_empty<W: io::Write>(writer: &mut Writer<W>, name: &str) -> io::Result<()> {
    writer.write_event(Event::Empty(BytesStart::new(name)))
}

/// Writes a text element with escaped content.
fn write_text_element<W: io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> io::Result<()> {
    write_start(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    write_end(writer, name)
}

/// Returns whether `prefix` may be written; unregistered prefixes are skipped.
fn is_writable(registry: &NamespaceRegistry, prefix: &str) -> bool {
    let known = registry.contains(prefix);
    if !known {
        tracing::debug!(prefix, "Skipping properties of unregistered prefix");
    }
    known
}
