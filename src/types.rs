//! Core data model types for conversion.
//!
//! A conversion reads one main [`TableSource`] plus any number of sub [`TableSource`]s and
//! produces an owned [`Element`] tree. There is no shared document/builder state: the tree is
//! built explicitly and returned by value to the caller.

use std::path::{Path, PathBuf};

/// A tabular input identified by a file path.
///
/// The derived `name` (base name with the trailing extension stripped) is used as the XML tag
/// name for the table's records, and for matching main-table columns against sub-tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    /// Path used to open the data stream.
    pub path: PathBuf,
    /// Tag name derived from the path.
    pub name: String,
}

impl TableSource {
    /// Create a source from a path, deriving its name.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = derive_name(&path.to_string_lossy());
        Self { path, name }
    }
}

/// Base name of `path` (split on `/` or `\`) with the last `.`-extension stripped.
fn derive_name(path: &str) -> String {
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match base.rfind('.') {
        Some(idx) => base[..idx].to_string(),
        None => base.to_string(),
    }
}

/// An owned XML element: tag name, text content, attributes and ordered children.
///
/// An empty `text` means "no text node". Attributes are supported by the serializer but the
/// conversion itself never emits one; in particular the join key used while grouping sub rows
/// is carried outside the element and never appears here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub name: String,
    /// Text content; empty for container elements.
    pub text: String,
    /// Ordered attribute list.
    pub attributes: Vec<(String, String)>,
    /// Ordered child elements.
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a text-only element.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(name)
        }
    }

    /// Append an attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First direct child with the given tag name, if any.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given tag name, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }
}
