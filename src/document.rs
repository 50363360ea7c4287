//! Document tree abstraction.
//!
//! The validation engine never parses anything itself; it only needs a small
//! query surface over an already-parsed tree. [`DocumentNode`] is that
//! surface, and [`Element`] is the owned in-memory implementation used by
//! tests and by callers that assemble trees by hand. Adapters over other
//! tree libraries only have to implement the four trait methods.

use std::collections::BTreeMap;

/// Minimal read-only capability interface the engine requires from a tree.
///
/// Absolute selectors treat the node handed to the engine as the document
/// root; the first segment of an absolute path names that root element
/// itself. Implementations must not mutate the tree while a validation call
/// is in flight.
pub trait DocumentNode {
    /// Element name of this node.
    fn name(&self) -> &str;

    /// Text content of this node, if any.
    fn text(&self) -> Option<&str>;

    /// Child elements, in document order.
    fn children(&self) -> Vec<&Self>;

    /// Value of the named attribute, if present.
    fn attribute(&self, name: &str) -> Option<&str>;
}

/// An owned, immutable-once-built tree node.
///
/// # Examples
///
/// ```rust
/// use cardinal::document::{DocumentNode, Element};
///
/// let attic = Element::new("Attic")
///     .with_child(Element::new("Roofs").with_child(Element::leaf("Roof", "")))
///     .with_attribute("id", "attic1");
/// assert_eq!(attic.children().len(), 1);
/// assert_eq!(attic.attribute("id"), Some("attic1"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    text: Option<String>,
    attributes: BTreeMap<String, String>,
    children: Vec<Element>,
}

impl Element {
    /// Creates an empty element with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Creates a leaf element carrying only text content.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cardinal::document::Element;
    /// use cardinal::document::DocumentNode;
    ///
    /// let year = Element::leaf("YearBuilt", "1987");
    /// assert_eq!(year.text(), Some("1987"));
    /// ```
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    /// Sets the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Appends every element in the iterator as a child.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }
}

impl DocumentNode for Element {
    fn name(&self) -> &str {
        &self.name
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn children(&self) -> Vec<&Self> {
        self.children.iter().collect()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
