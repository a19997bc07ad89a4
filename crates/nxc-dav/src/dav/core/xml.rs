//! Generic XML element tree.

use super::namespace::QName;

/// One element of a parsed XML document.
///
/// `text` holds the element's character data when it carries any
/// non-whitespace content; whitespace between child elements is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// Qualified name of the element.
    pub name: QName,
    /// Character data, `None` for empty or whitespace-only elements.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Creates an element without text or children.
    #[must_use]
    pub fn new(name: QName) -> Self {
        Self {
            name,
            text: None,
            children: Vec::new(),
        }
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the local name of the element.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name.local_name()
    }

    /// Returns the text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the first child named `local` in the namespace `uri`.
    #[must_use]
    pub fn child(&self, uri: &str, local: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name.is(uri, local))
    }

    /// Iterates the children named `local` in the namespace `uri`.
    pub fn children_named<'a>(
        &'a self,
        uri: &'a str,
        local: &'a str,
    ) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name.is(uri, local))
    }

    /// Returns the first child element, if any.
    #[must_use]
    pub fn first_child(&self) -> Option<&XmlNode> {
        self.children.first()
    }
}
