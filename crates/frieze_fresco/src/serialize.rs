//! HTML serialization.

use frieze_carton::{escape_html_attr, escape_html_text, is_void_tag};

use crate::document::Document;
use crate::node::{NodeId, NodeKind};

impl Document {
    /// Serialize a node (and its subtree) to HTML.
    ///
    /// Fragments serialize as their children only.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![Step::Open(id)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(id) => {
                    if let Some(NodeKind::Element(data)) = self.get(id).map(|node| &node.kind) {
                        out.push_str("</");
                        out.push_str(&data.tag);
                        out.push('>');
                    }
                    continue;
                }
            };
            let Some(node) = self.get(id) else {
                continue;
            };
            match &node.kind {
                NodeKind::Fragment => {}
                NodeKind::Text(text) => {
                    out.push_str(&escape_html_text(text));
                    continue;
                }
                NodeKind::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                    continue;
                }
                NodeKind::Element(data) => {
                    out.push('<');
                    out.push_str(&data.tag);
                    for attr in &data.attrs {
                        out.push(' ');
                        out.push_str(&attr.name);
                        out.push_str("=\"");
                        out.push_str(&escape_html_attr(&attr.value));
                        out.push('"');
                    }
                    out.push('>');
                    if is_void_tag(&data.tag) {
                        continue;
                    }
                    stack.push(Step::Close(id));
                }
            }
            stack.extend(node.children.iter().rev().map(|&child| Step::Open(child)));
        }
    }
}

/// Serializer work item
enum Step {
    Open(NodeId),
    Close(NodeId),
}

#[cfg(test)]
mod tests {
    use crate::Document;

    #[test]
    fn test_to_html() {
        let mut doc = Document::fragment();
        let root = doc.root().unwrap();
        let p = doc.create_element("p");
        doc.append_child(root, p).unwrap();
        doc.set_attr(p, "title", "say \"hi\"").unwrap();
        doc.set_text(p, "1 < 2 & 3").unwrap();
        let br = doc.create_element("br");
        doc.append_child(root, br).unwrap();
        let marker = doc.create_comment("ng-repeat: x in xs");
        doc.append_child(root, marker).unwrap();

        assert_eq!(
            doc.to_html(root),
            "<p title=\"say &quot;hi&quot;\">1 &lt; 2 &amp; 3</p><br><!--ng-repeat: x in xs-->"
        );
        assert_eq!(doc.inner_html(p), "1 &lt; 2 &amp; 3");
    }

    #[test]
    fn test_deep_tree() {
        const DEPTH: usize = 20_000;
        let mut doc = Document::new();
        let mut inner = doc.create_text("x");
        for _ in 0..DEPTH {
            let outer = doc.create_element("b");
            doc.append_child(outer, inner).unwrap();
            inner = outer;
        }

        let copy = doc.clone_node(inner).unwrap();
        let html = doc.to_html(copy);
        assert_eq!(html.len(), DEPTH * "<b></b>".len() + 1);
        assert!(html.starts_with("<b><b>"));
        assert!(html.ends_with("x</b></b>"));

        doc.remove(copy).unwrap();
        assert_eq!(doc.node_count(), DEPTH + 1);
    }
}
