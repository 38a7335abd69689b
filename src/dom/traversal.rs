//! Preorder walks within a single tree scope.
//!
//! None of these cross into shadow roots or child frames: shadow roots are
//! not children of their host, and frames are reachable only through
//! [`Dom::content_frame`].

use super::{Dom, NodeId};

impl Dom {
    /// Next node in preorder, not leaving `stay_within` when given.
    pub fn next_node(&self, node: NodeId, stay_within: Option<NodeId>) -> Option<NodeId> {
        if let Some(child) = self.first_child(node) {
            return Some(child);
        }
        self.next_node_skipping_children(node, stay_within)
    }

    pub fn next_node_skipping_children(&self, node: NodeId, stay_within: Option<NodeId>) -> Option<NodeId> {
        let mut current = node;
        loop {
            if Some(current) == stay_within {
                return None;
            }
            if let Some(sibling) = self.next_sibling(current) {
                return Some(sibling);
            }
            current = self.parent(current)?;
        }
    }

    pub fn previous_node(&self, node: NodeId, stay_within: Option<NodeId>) -> Option<NodeId> {
        if Some(node) == stay_within {
            return None;
        }
        if let Some(mut previous) = self.previous_sibling(node) {
            while let Some(child) = self.last_child(previous) {
                previous = child;
            }
            return Some(previous);
        }
        self.parent(node)
    }

    pub fn next_element(&self, node: NodeId) -> Option<NodeId> {
        self.next_element_within(node, None)
    }

    pub fn next_element_within(&self, node: NodeId, stay_within: Option<NodeId>) -> Option<NodeId> {
        let mut cursor = self.next_node(node, stay_within);
        while let Some(current) = cursor {
            if self.is_element(current) {
                return Some(current);
            }
            cursor = self.next_node(current, stay_within);
        }
        None
    }

    pub fn next_element_skipping_children(&self, node: NodeId, stay_within: Option<NodeId>) -> Option<NodeId> {
        let mut cursor = self.next_node_skipping_children(node, stay_within);
        while let Some(current) = cursor {
            if self.is_element(current) {
                return Some(current);
            }
            cursor = self.next_node(current, stay_within);
        }
        None
    }

    /// Previous element in preorder. This may be an ancestor of `node`.
    pub fn previous_element(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = self.previous_node(node, None);
        while let Some(current) = cursor {
            if self.is_element(current) {
                return Some(current);
            }
            cursor = self.previous_node(current, None);
        }
        None
    }

    pub fn first_element_within(&self, root: NodeId) -> Option<NodeId> {
        self.next_element_within(root, Some(root))
    }

    /// Last element in preorder among the descendants of `root`.
    pub fn last_element_within(&self, root: NodeId) -> Option<NodeId> {
        let mut node = self.last_child(root)?;
        while let Some(child) = self.last_child(node) {
            node = child;
        }
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == root {
                return None;
            }
            if self.is_element(current) {
                return Some(current);
            }
            cursor = self.previous_node(current, Some(root));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{DocumentId, Dom, NodeId};

    // <html><body><a/><div><b/>text</div></body></html> plus a trailing text node
    fn fixture() -> (Dom, DocumentId, Vec<NodeId>) {
        let mut dom = Dom::new();
        let frame = dom.create_local_frame(None, None);
        let document = dom.frame_document(frame).unwrap();
        let root = dom.document_root(document);
        let html = dom.create_element(document, "html");
        let body = dom.create_element(document, "body");
        let a = dom.create_element(document, "a");
        let div = dom.create_element(document, "div");
        let b = dom.create_element(document, "b");
        let text = dom.create_text(document, "text");
        let tail = dom.create_text(document, "tail");
        dom.append_child(root, html);
        dom.append_child(html, body);
        dom.append_child(body, a);
        dom.append_child(body, div);
        dom.append_child(div, b);
        dom.append_child(div, text);
        dom.append_child(html, tail);
        (dom, document, vec![html, body, a, div, b])
    }

    #[test]
    fn next_element_walks_preorder() {
        let (dom, document, n) = fixture();
        let root = dom.document_root(document);
        let mut order = Vec::new();
        let mut cursor = dom.first_element_within(root);
        while let Some(node) = cursor {
            order.push(node);
            cursor = dom.next_element(node);
        }
        assert_eq!(order, n);
    }

    #[test]
    fn previous_element_reaches_ancestors() {
        let (dom, _document, n) = fixture();
        assert_eq!(dom.previous_element(n[4]), Some(n[3]));
        assert_eq!(dom.previous_element(n[3]), Some(n[2]));
        assert_eq!(dom.previous_element(n[2]), Some(n[1]));
        assert_eq!(dom.previous_element(n[0]), None);
    }

    #[test]
    fn last_within_skips_trailing_text() {
        let (dom, document, n) = fixture();
        assert_eq!(dom.last_element_within(dom.document_root(document)), Some(n[4]));
    }

    #[test]
    fn skipping_children_stays_within_container() {
        let (dom, _document, n) = fixture();
        assert_eq!(dom.next_element_skipping_children(n[3], Some(n[1])), None);
        assert_eq!(dom.next_element_skipping_children(n[2], Some(n[1])), Some(n[3]));
    }
}
