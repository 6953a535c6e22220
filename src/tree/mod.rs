//! In-memory XML tree with typed navigation.
//!
//! The tree is built once by [`parse_str`] or [`parse_bytes`] and is
//! read-only afterwards. Lookups are by element role (local name and
//! attribute values), never by child index:
//!
//! ```
//! use untei::tree::parse_str;
//!
//! let tree = parse_str(r#"<TEI><teiHeader><title type="main">On Trees</title></teiHeader></TEI>"#)?;
//! let title = tree
//!     .root
//!     .find_where("title", |e| e.attr("type") == Some("main"))
//!     .map(|e| e.text());
//! assert_eq!(title.as_deref(), Some("On Trees"));
//! # Ok::<(), untei::Error>(())
//! ```

mod reader;

pub use reader::{parse_bytes, parse_str, MAX_DEPTH};

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlTree {
    /// The root element
    pub root: Element,
}

/// An XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Local name (without namespace prefix)
    pub name: String,

    /// Namespace prefix, if any
    pub prefix: Option<String>,

    /// Attributes in source order
    pub attributes: Vec<Attribute>,

    /// Child nodes in source order
    pub children: Vec<Node>,
}

/// An attribute of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Local name (without namespace prefix)
    pub name: String,

    /// Namespace prefix (e.g. "xml" in `xml:id`)
    pub prefix: Option<String>,

    /// Unescaped value
    pub value: String,
}

/// A child node: an element or a run of character data.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A child element
    Element(Element),
    /// Character data (text or CDATA), unescaped
    Text(String),
}

impl Node {
    /// Get the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }
}

impl Element {
    /// Create a new element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Check the local name.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Get an attribute value by local name, ignoring any prefix.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Get the `xml:id` attribute.
    pub fn xml_id(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == "id" && a.prefix.as_deref() == Some("xml"))
            .map(|a| a.value.as_str())
    }

    /// Iterate over child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First direct child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(name))
    }

    /// Direct child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.is(name))
    }

    /// All descendant elements in document order (pre-order, excluding self).
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// First descendant element with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.is(name))
    }

    /// First descendant element with the given name matching a predicate.
    pub fn find_where<F>(&self, name: &str, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.descendants().find(|e| e.is(name) && predicate(e))
    }

    /// All descendant elements with the given name, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.descendants().filter(move |e| e.is(name))
    }

    /// Concatenated text of all descendant text nodes, untrimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Trimmed text, or `None` when it is empty.
    pub fn trimmed_text(&self) -> Option<String> {
        let text = self.text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Text with every whitespace run collapsed to a single space.
    pub fn collapsed_text(&self) -> Option<String> {
        let collapsed = collapse_whitespace(&self.text());
        if collapsed.is_empty() {
            None
        } else {
            Some(collapsed)
        }
    }

    /// Check whether the element has no non-whitespace content.
    pub fn is_blank(&self) -> bool {
        self.elements().next().is_none() && self.text().trim().is_empty()
    }
}

/// Collapse whitespace runs (including newlines) into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pre-order iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(iter) = self.stack.last_mut() {
            match iter.next() {
                Some(Node::Element(e)) => {
                    self.stack.push(e.children.iter());
                    return Some(e);
                }
                Some(Node::Text(_)) => continue,
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}
