//! DOM node definitions.

use compact_str::CompactString;
use smallvec::SmallVec;

/// Unique identifier for DOM nodes.
pub type NodeId = u64;

/// A node in the document.
#[derive(Debug, Clone)]
pub struct DomNode {
    /// Unique node ID
    pub id: NodeId,
    /// Node type and content
    pub kind: NodeKind,
    /// Parent node, `None` for the root and for detached nodes
    pub parent: Option<NodeId>,
    /// Child node IDs
    pub children: SmallVec<[NodeId; 4]>,
}

impl DomNode {
    /// Create a new detached node.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Element payload, if this is an element.
    pub fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable element payload, if this is an element.
    pub fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Whether this node is an element.
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    /// Remove a child.
    pub(crate) fn remove_child(&mut self, child_id: NodeId) -> Option<usize> {
        let pos = self.children.iter().position(|&id| id == child_id)?;
        self.children.remove(pos);
        Some(pos)
    }
}

/// Node type variants.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Container for top-level nodes of a parsed document
    Fragment,
    /// Element with tag and attributes
    Element(ElementData),
    /// Text content
    Text(CompactString),
    /// Comment, also used for positional markers
    Comment(CompactString),
}

/// Tag and attributes of an element.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Tag name as written
    pub tag: CompactString,
    /// Attributes in source order
    pub attrs: SmallVec<[Attribute; 4]>,
}

impl ElementData {
    /// Create element data without attributes.
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            attrs: SmallVec::new(),
        }
    }

    /// Look up an attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set(&mut self, name: &str, value: impl Into<CompactString>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attribute::new(name, value)),
        }
    }

    /// Remove an attribute and return its value.
    pub fn remove(&mut self, name: &str) -> Option<CompactString> {
        let pos = self.attrs.iter().position(|attr| attr.name == name)?;
        Some(self.attrs.remove(pos).value)
    }
}

/// A single `name="value"` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: CompactString,
    pub value: CompactString,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(name: impl Into<CompactString>, value: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
