//! Document arena and DOM operations.

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{DomError, DomResult};
use crate::node::{Attribute, DomNode, ElementData, NodeId, NodeKind};

/// A tree of DOM nodes.
///
/// Every node, attached or not, lives in one arena. Removing a node drops it
/// and its descendants from the arena; detaching only unlinks it.
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes by ID
    nodes: FxHashMap<NodeId, DomNode>,
    /// Root node ID
    root: Option<NodeId>,
    /// Next available node ID
    next_id: NodeId,
}

impl Document {
    /// Create an empty document without a root.
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
            root: None,
            next_id: 0,
        }
    }

    /// Create a document whose root is an empty fragment.
    pub fn fragment() -> Self {
        let mut doc = Self::new();
        let root = doc.create_fragment();
        doc.set_root(root);
        doc
    }

    fn next_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        let id = self.next_id();
        self.nodes.insert(id, DomNode::new(id, kind));
        id
    }

    /// Create a detached fragment node.
    pub fn create_fragment(&mut self) -> NodeId {
        self.insert(NodeKind::Fragment)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<CompactString>) -> NodeId {
        self.insert(NodeKind::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<CompactString>) -> NodeId {
        self.insert(NodeKind::Text(text.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<CompactString>) -> NodeId {
        self.insert(NodeKind::Comment(text.into()))
    }

    /// Set the root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Get the root node ID.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        self.nodes.get_mut(&id)
    }

    /// Whether the node exists in the arena.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn node(&self, id: NodeId) -> DomResult<&DomNode> {
        self.nodes.get(&id).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut DomNode> {
        self.nodes.get_mut(&id).ok_or(DomError::UnknownNode(id))
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.node_mut(id)?
            .element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Children of a node (empty for unknown nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Position of a node among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// The node right after `id` in its parent.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.nodes
            .get(&id)
            .and_then(DomNode::element)
            .map(|data| data.tag.as_str())
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check_insert(parent, child)?;
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        if matches!(parent_node.kind, NodeKind::Text(_) | NodeKind::Comment(_)) {
            return Err(DomError::NotAContainer(parent));
        }
        self.node(child)?;
        if self.is_ancestor(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Read an attribute.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(&id)
            .and_then(DomNode::element)
            .and_then(|data| data.get(name))
    }

    /// Write an attribute.
    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<CompactString>,
    ) -> DomResult<()> {
        self.element_mut(id)?.set(name, value);
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> DomResult<Option<CompactString>> {
        Ok(self.element_mut(id)?.remove(name))
    }

    /// All attributes of an element, in order.
    pub fn attributes(&self, id: NodeId) -> DomResult<&[Attribute]> {
        self.node(id)?
            .element()
            .map(|data| data.attrs.as_slice())
            .ok_or(DomError::NotAnElement(id))
    }

    /// Replace the content of a node with `text`.
    ///
    /// Text and comment nodes have their content overwritten. Elements and
    /// fragments lose all children and receive a single text child.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<CompactString>) -> DomResult<()> {
        let text = text.into();
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text(content) | NodeKind::Comment(content) => {
                *content = text;
                return Ok(());
            }
            NodeKind::Element(_) | NodeKind::Fragment => {}
        }

        let old_children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in old_children {
            self.drop_subtree(child);
        }
        let text_node = self.create_text(text);
        self.node_mut(id)?.children.push(text_node);
        self.node_mut(text_node)?.parent = Some(id);
        Ok(())
    }

    /// Concatenated text of a node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.walk_preorder(id) {
            if let NodeKind::Text(text) = &node.kind {
                out.push_str(text);
            }
        }
        out
    }

    /// Put `new` in the place of `old`; `old` stays in the arena, detached.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) -> DomResult<()> {
        if old == new {
            return Ok(());
        }
        let parent = self.parent(old).ok_or(DomError::Detached(old))?;
        self.check_insert(parent, new)?;
        self.detach(new)?;

        let parent_node = self.node_mut(parent)?;
        let pos = parent_node
            .children
            .iter()
            .position(|&id| id == old)
            .ok_or(DomError::Detached(old))?;
        parent_node.children[pos] = new;

        self.node_mut(new)?.parent = Some(parent);
        self.node_mut(old)?.parent = None;
        Ok(())
    }

    /// Insert `node` as the next sibling of `anchor`.
    pub fn after(&mut self, anchor: NodeId, node: NodeId) -> DomResult<()> {
        if anchor == node {
            return Ok(());
        }
        let parent = self.parent(anchor).ok_or(DomError::Detached(anchor))?;
        self.check_insert(parent, node)?;
        self.detach(node)?;

        let parent_node = self.node_mut(parent)?;
        let pos = parent_node
            .children
            .iter()
            .position(|&id| id == anchor)
            .ok_or(DomError::Detached(anchor))?;
        parent_node.children.insert(pos + 1, node);
        self.node_mut(node)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink a node from its parent; it stays in the arena.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.remove_child(id);
        }
        self.node_mut(id)?.parent = None;
        if self.root == Some(id) {
            self.root = None;
        }
        Ok(())
    }

    /// Remove a node and all its descendants.
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        self.detach(id)?;
        self.drop_subtree(id);
        if self.root == Some(id) {
            self.root = None;
        }
        Ok(())
    }

    fn drop_subtree(&mut self, id: NodeId) {
        for node_id in self.collect_descendants(id) {
            self.nodes.remove(&node_id);
        }
    }

    /// Collect a node and all its descendants.
    fn collect_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = vec![id];
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                for &child_id in &node.children {
                    result.push(child_id);
                    stack.push(child_id);
                }
            }
        }

        result
    }

    /// Deep-copy a subtree. The copy is detached.
    pub fn clone_node(&mut self, id: NodeId) -> DomResult<NodeId> {
        let kind = self.node(id)?.kind.clone();
        let copy = self.insert(kind);

        // (source, copy) pairs whose children still need copying
        let mut pending = vec![(id, copy)];
        while let Some((source, target)) = pending.pop() {
            let children: SmallVec<[NodeId; 4]> = self.node(source)?.children.clone();
            for child in children {
                let kind = self.node(child)?.kind.clone();
                let child_copy = self.insert(kind);
                self.node_mut(target)?.children.push(child_copy);
                self.node_mut(child_copy)?.parent = Some(target);
                pending.push((child, child_copy));
            }
        }
        Ok(copy)
    }

    /// Follow child indices from `root`.
    pub fn child_at_path(&self, root: NodeId, path: &[usize]) -> Option<NodeId> {
        path.iter().try_fold(root, |node, &index| {
            self.children(node).get(index).copied()
        })
    }

    /// Get node count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk a subtree depth-first, pre-order.
    pub fn walk_preorder(&self, start: NodeId) -> TreeWalker<'_> {
        TreeWalker::new(self, start)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator for tree traversal.
pub struct TreeWalker<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> TreeWalker<'a> {
    fn new(doc: &'a Document, start: NodeId) -> Self {
        Self {
            doc,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for TreeWalker<'a> {
    type Item = &'a DomNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.doc.get(id) {
                // Push children in reverse order so they're processed left-to-right
                for &child_id in node.children.iter().rev() {
                    self.stack.push(child_id);
                }
                return Some(node);
            }
        }
        None
    }
}
