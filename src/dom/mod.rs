//! Arena-backed page model: nodes, documents and frames.
//!
//! This is the minimum structure the focus engine queries. Nodes are linked
//! the way a DOM tree is (parent, first/last child, siblings). Shadow roots
//! hang off their host element and are never children of it, so each
//! document or shadow root forms its own tree scope with its own preorder.

mod focusability;
mod traversal;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FrameId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl FrameId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document#{}", self.0)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Document,
    ShadowRoot(ShadowRootData),
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowRootData {
    pub host: NodeId,
    pub delegates_focus: bool,
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    document: DocumentId,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    previous_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }
}

/// Scroll state of a scrollable box or of a document viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollArea {
    pub offset: Point,
    pub client: Size,
    pub content: Size,
}

impl ScrollArea {
    pub fn new(client: Size, content: Size) -> Self {
        Self {
            offset: Point::default(),
            client,
            content,
        }
    }

    pub fn max_offset(&self) -> Point {
        Point::new(
            (self.content.width - self.client.width).max(0.0),
            (self.content.height - self.client.height).max(0.0),
        )
    }

    /// Scrolls by the given delta, clamped to the scrollable range.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        let max = self.max_offset();
        self.offset.x = (self.offset.x + dx).clamp(0.0, max.x);
        self.offset.y = (self.offset.y + dy).clamp(0.0, max.y);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutBox {
    /// Border box in document coordinates with every scroll offset at zero.
    pub rect: Rect,
    pub inline: bool,
    pub z_index: i32,
    pub overflow_hidden: bool,
    pub scroll: Option<ScrollArea>,
}

#[derive(Debug, Clone, Default)]
pub struct ElementData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub custom_focus_logic: bool,
    pub layout: LayoutBox,
    shadow_roots: Vec<NodeId>,
    content_frame: Option<FrameId>,
    focus_state: bool,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Parsed `tabindex` attribute, clamped to the `i16` range;
    /// unparsable values count as absent.
    pub fn tab_index_attribute(&self) -> Option<i32> {
        self.attribute("tabindex")
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(|value| value.clamp(i16::MIN.into(), i16::MAX.into()) as i32)
    }

    /// Whether the element currently matches `:focus`.
    pub fn matches_focus(&self) -> bool {
        self.focus_state
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSelection {
    pub focused: bool,
    pub anchor: Option<NodeId>,
}

impl FrameSelection {
    pub fn is_none(&self) -> bool {
        self.anchor.is_none()
    }

    pub fn clear(&mut self) {
        self.anchor = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Local(DocumentId),
    Remote,
}

#[derive(Debug, Clone)]
pub struct FrameData {
    kind: FrameKind,
    parent: Option<FrameId>,
    children: Vec<FrameId>,
    owner: Option<NodeId>,
    detached: bool,
    pub selection: FrameSelection,
}

impl FrameData {
    pub fn kind(&self) -> FrameKind {
        self.kind
    }
}

#[derive(Debug, Clone)]
pub struct DocumentData {
    root: NodeId,
    frame: Option<FrameId>,
    focused_element: Option<NodeId>,
    sequential_starting_point: Option<NodeId>,
    pub viewport: ScrollArea,
}

#[derive(Debug, Clone, Default)]
pub struct Dom {
    nodes: Vec<Node>,
    documents: Vec<DocumentData>,
    frames: Vec<FrameData>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_node(&mut self, document: DocumentId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            document,
            parent: None,
            first_child: None,
            last_child: None,
            previous_sibling: None,
            next_sibling: None,
        });
        id
    }

    fn push_frame(&mut self, kind: FrameKind, parent: Option<FrameId>, owner: Option<NodeId>) -> FrameId {
        let id = FrameId(self.frames.len());
        self.frames.push(FrameData {
            kind,
            parent,
            children: Vec::new(),
            owner,
            detached: false,
            selection: FrameSelection::default(),
        });
        if let Some(parent) = parent {
            self.frames[parent.0].children.push(id);
        }
        if let Some(owner) = owner {
            if let Some(element) = self.element_mut(owner) {
                element.content_frame = Some(id);
            }
        }
        id
    }

    /// Creates a local frame together with its empty document. `owner` is
    /// the frame owner element in the parent document, when there is one.
    pub fn create_local_frame(&mut self, parent: Option<FrameId>, owner: Option<NodeId>) -> FrameId {
        let document = DocumentId(self.documents.len());
        let root = self.push_node(document, NodeKind::Document);
        let viewport_size = owner
            .and_then(|owner| self.element(owner))
            .map(|element| element.layout.rect.size())
            .unwrap_or_else(|| Size::new(800.0, 600.0));
        self.documents.push(DocumentData {
            root,
            frame: None,
            focused_element: None,
            sequential_starting_point: None,
            viewport: ScrollArea::new(viewport_size, viewport_size),
        });
        let frame = self.push_frame(FrameKind::Local(document), parent, owner);
        self.documents[document.0].frame = Some(frame);
        frame
    }

    /// Creates a frame rendered by another process. Its content is opaque.
    pub fn create_remote_frame(&mut self, parent: Option<FrameId>, owner: Option<NodeId>) -> FrameId {
        self.push_frame(FrameKind::Remote, parent, owner)
    }

    pub fn create_element(&mut self, document: DocumentId, tag: &str) -> NodeId {
        self.push_node(document, NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, document: DocumentId, text: &str) -> NodeId {
        self.push_node(document, NodeKind::Text(text.to_string()))
    }

    /// Attaches a new shadow root to `host`. A host may carry several roots;
    /// the last one attached is the youngest.
    pub fn attach_shadow(&mut self, host: NodeId, delegates_focus: bool) -> NodeId {
        let document = self.nodes[host.0].document;
        let root = self.push_node(
            document,
            NodeKind::ShadowRoot(ShadowRootData {
                host,
                delegates_focus,
            }),
        );
        if let Some(element) = self.element_mut(host) {
            element.shadow_roots.push(root);
        }
        root
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_ne!(parent, child);
        if self.nodes[child.0].parent.is_some() {
            self.unlink(child);
        }
        let previous = self.nodes[parent.0].last_child;
        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.previous_sibling = previous;
            node.next_sibling = None;
        }
        match previous {
            Some(previous) => self.nodes[previous.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    fn unlink(&mut self, node: NodeId) {
        let (parent, previous, next) = {
            let n = &self.nodes[node.0];
            (n.parent, n.previous_sibling, n.next_sibling)
        };
        let Some(parent) = parent else {
            return;
        };
        match previous {
            Some(previous) => self.nodes[previous.0].next_sibling = next,
            None => self.nodes[parent.0].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.0].previous_sibling = previous,
            None => self.nodes[parent.0].last_child = previous,
        }
        let n = &mut self.nodes[node.0];
        n.parent = None;
        n.previous_sibling = None;
        n.next_sibling = None;
    }

    /// Detaches `node` and its subtree from the tree. Frames owned by
    /// elements in the subtree are detached, and the document forgets any
    /// focused element or navigation starting point inside the subtree.
    pub(crate) fn remove_node(&mut self, node: NodeId) {
        let document = self.nodes[node.0].document;
        let mut owned_frames = Vec::new();
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if let Some(element) = self.element(current) {
                if let Some(frame) = element.content_frame {
                    owned_frames.push(frame);
                }
                pending.extend(element.shadow_roots.iter().copied());
            }
            pending.extend(self.children(current));
        }

        let doc = &self.documents[document.0];
        let focused_inside = doc
            .focused_element
            .is_some_and(|focused| self.is_shadow_including_inclusive_ancestor(node, focused));
        let start_inside = doc
            .sequential_starting_point
            .is_some_and(|start| self.is_shadow_including_inclusive_ancestor(node, start));

        self.unlink(node);
        if focused_inside {
            if let Some(focused) = self.documents[document.0].focused_element.take() {
                if let Some(element) = self.element_mut(focused) {
                    element.focus_state = false;
                }
            }
        }
        if start_inside {
            self.documents[document.0].sequential_starting_point = None;
        }
        for frame in owned_frames {
            self.detach_frame(frame);
        }
    }

    /// Marks a frame and all of its descendants as detached from the page.
    pub(crate) fn detach_frame(&mut self, frame: FrameId) {
        let mut pending = vec![frame];
        while let Some(current) = pending.pop() {
            let data = &mut self.frames[current.0];
            data.detached = true;
            pending.extend(data.children.iter().copied());
        }
        if let Some(parent) = self.frames[frame.0].parent {
            self.frames[parent.0].children.retain(|child| *child != frame);
        }
    }

    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.0]
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    pub fn is_document_node(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].kind, NodeKind::Document)
    }

    pub fn is_shadow_root(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].kind, NodeKind::ShadowRoot(_))
    }

    pub fn shadow_root_data(&self, node: NodeId) -> Option<ShadowRootData> {
        match self.nodes[node.0].kind {
            NodeKind::ShadowRoot(data) => Some(data),
            _ => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag.as_str())
    }

    pub fn has_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag(node) == Some(tag)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].first_child
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].last_child
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].next_sibling
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].previous_sibling
    }

    pub fn has_children(&self, node: NodeId) -> bool {
        self.nodes[node.0].first_child.is_some()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        let mut children = Vec::new();
        let mut cursor = self.first_child(node);
        while let Some(child) = cursor {
            children.push(child);
            cursor = self.next_sibling(child);
        }
        children
    }

    pub fn shadow_roots(&self, host: NodeId) -> &[NodeId] {
        self.element(host)
            .map(|element| element.shadow_roots.as_slice())
            .unwrap_or(&[])
    }

    pub fn youngest_shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.shadow_roots(host).last().copied()
    }

    /// Root of the tree scope `node` lives in: a document node, a shadow
    /// root, or the top of a detached subtree.
    pub fn tree_scope_root(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    pub fn is_in_shadow_tree(&self, node: NodeId) -> bool {
        self.is_shadow_root(self.tree_scope_root(node))
    }

    /// Host of the shadow tree containing `node`, if it is in one.
    pub fn shadow_host(&self, node: NodeId) -> Option<NodeId> {
        self.shadow_root_data(self.tree_scope_root(node))
            .map(|data| data.host)
    }

    pub fn parent_or_shadow_host(&self, node: NodeId) -> Option<NodeId> {
        if let Some(data) = self.shadow_root_data(node) {
            return Some(data.host);
        }
        self.parent(node)
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        let root = self.tree_scope_root(node);
        match self.nodes[root.0].kind {
            NodeKind::Document => true,
            NodeKind::ShadowRoot(data) => self.is_connected(data.host),
            _ => false,
        }
    }

    /// Strict descendant check within one tree scope.
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Inclusive ancestor check that crosses shadow boundaries.
    pub fn is_shadow_including_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent_or_shadow_host(current);
        }
        false
    }

    pub fn document_of(&self, node: NodeId) -> DocumentId {
        self.nodes[node.0].document
    }

    pub fn document_root(&self, document: DocumentId) -> NodeId {
        self.documents[document.0].root
    }

    pub fn document(&self, document: DocumentId) -> &DocumentData {
        &self.documents[document.0]
    }

    pub fn document_mut(&mut self, document: DocumentId) -> &mut DocumentData {
        &mut self.documents[document.0]
    }

    pub fn document_frame(&self, document: DocumentId) -> Option<FrameId> {
        self.documents[document.0].frame
    }

    pub fn focused_element(&self, document: DocumentId) -> Option<NodeId> {
        self.documents[document.0].focused_element
    }

    pub(crate) fn set_focused_element_raw(&mut self, document: DocumentId, element: Option<NodeId>) {
        self.documents[document.0].focused_element = element;
    }

    pub(crate) fn sequential_starting_point_raw(&self, document: DocumentId) -> Option<NodeId> {
        self.documents[document.0].sequential_starting_point
    }

    pub(crate) fn set_sequential_starting_point_raw(&mut self, document: DocumentId, node: Option<NodeId>) {
        self.documents[document.0].sequential_starting_point = node;
    }

    pub(crate) fn set_focus_state(&mut self, element: NodeId, focused: bool) {
        if let Some(data) = self.element_mut(element) {
            data.focus_state = focused;
        }
    }

    pub fn frame(&self, frame: FrameId) -> &FrameData {
        &self.frames[frame.0]
    }

    pub fn frame_mut(&mut self, frame: FrameId) -> &mut FrameData {
        &mut self.frames[frame.0]
    }

    pub fn frame_document(&self, frame: FrameId) -> Option<DocumentId> {
        match self.frames[frame.0].kind {
            FrameKind::Local(document) => Some(document),
            FrameKind::Remote => None,
        }
    }

    pub fn is_local_frame(&self, frame: FrameId) -> bool {
        matches!(self.frames[frame.0].kind, FrameKind::Local(_))
    }

    pub fn is_remote_frame(&self, frame: FrameId) -> bool {
        matches!(self.frames[frame.0].kind, FrameKind::Remote)
    }

    pub fn is_frame_detached(&self, frame: FrameId) -> bool {
        self.frames[frame.0].detached
    }

    /// A local frame that is still attached, i.e. one with a live view.
    pub fn frame_has_view(&self, frame: FrameId) -> bool {
        self.is_local_frame(frame) && !self.is_frame_detached(frame)
    }

    pub fn frame_parent(&self, frame: FrameId) -> Option<FrameId> {
        self.frames[frame.0].parent
    }

    pub fn frame_children(&self, frame: FrameId) -> &[FrameId] {
        &self.frames[frame.0].children
    }

    /// Owner element of `frame` when it lives in a local parent document.
    pub fn frame_owner(&self, frame: FrameId) -> Option<NodeId> {
        let data = &self.frames[frame.0];
        let parent = data.parent?;
        if !self.is_local_frame(parent) {
            return None;
        }
        data.owner
    }

    /// Content frame of a frame owner element, ignoring detached frames.
    pub fn content_frame(&self, owner: NodeId) -> Option<FrameId> {
        self.element(owner)
            .and_then(|element| element.content_frame)
            .filter(|frame| !self.is_frame_detached(*frame))
    }

    pub fn top_frame(&self, frame: FrameId) -> FrameId {
        let mut current = frame;
        while let Some(parent) = self.frame_parent(current) {
            current = parent;
        }
        current
    }

    pub fn is_local_root(&self, frame: FrameId) -> bool {
        self.is_local_frame(frame)
            && self
                .frame_parent(frame)
                .map_or(true, |parent| self.is_remote_frame(parent))
    }

    pub fn local_frame_root(&self, frame: FrameId) -> FrameId {
        let mut current = frame;
        while !self.is_local_root(current) {
            match self.frame_parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    pub fn is_frame_descendant_of(&self, frame: FrameId, ancestor: FrameId) -> bool {
        let mut cursor = Some(frame);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.frame_parent(current);
        }
        false
    }

    /// Frames below `frame` (inclusive) in preorder.
    pub fn frames_in_preorder(&self, frame: FrameId) -> Vec<FrameId> {
        let mut order = Vec::new();
        let mut pending = vec![frame];
        while let Some(current) = pending.pop() {
            order.push(current);
            pending.extend(self.frame_children(current).iter().rev().copied());
        }
        order
    }

    /// First connected element carrying the given id, searching every
    /// document and shadow tree in creation order.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .find(|node| self.element(*node).and_then(ElementData::id) == Some(id) && self.is_connected(*node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_with_children(tags: &[&str]) -> (Dom, DocumentId, Vec<NodeId>) {
        let mut dom = Dom::new();
        let frame = dom.create_local_frame(None, None);
        let document = dom.frame_document(frame).unwrap();
        let root = dom.document_root(document);
        let nodes = tags
            .iter()
            .map(|tag| {
                let node = dom.create_element(document, tag);
                dom.append_child(root, node);
                node
            })
            .collect();
        (dom, document, nodes)
    }

    #[test]
    fn append_links_siblings() {
        let (dom, document, nodes) = document_with_children(&["a", "b", "c"]);
        let root = dom.document_root(document);
        assert_eq!(dom.first_child(root), Some(nodes[0]));
        assert_eq!(dom.last_child(root), Some(nodes[2]));
        assert_eq!(dom.next_sibling(nodes[0]), Some(nodes[1]));
        assert_eq!(dom.previous_sibling(nodes[2]), Some(nodes[1]));
    }

    #[test]
    fn remove_unlinks_and_disconnects() {
        let (mut dom, document, nodes) = document_with_children(&["a", "b", "c"]);
        dom.remove_node(nodes[1]);
        assert_eq!(dom.next_sibling(nodes[0]), Some(nodes[2]));
        assert!(!dom.is_connected(nodes[1]));
        assert_eq!(dom.children(dom.document_root(document)), vec![nodes[0], nodes[2]]);
    }

    #[test]
    fn shadow_tree_is_separate_scope() {
        let (mut dom, document, nodes) = document_with_children(&["div"]);
        let root = dom.attach_shadow(nodes[0], false);
        let inner = dom.create_element(document, "button");
        dom.append_child(root, inner);
        assert_eq!(dom.tree_scope_root(inner), root);
        assert_eq!(dom.shadow_host(inner), Some(nodes[0]));
        assert!(dom.is_connected(inner));
        assert!(!dom.is_descendant_of(inner, nodes[0]));
        assert!(dom.is_shadow_including_inclusive_ancestor(nodes[0], inner));
    }

    #[test]
    fn removing_owner_detaches_content_frame() {
        let (mut dom, _document, nodes) = document_with_children(&["iframe"]);
        let main = dom.top_frame(dom.document_frame(dom.document_of(nodes[0])).unwrap());
        let child = dom.create_local_frame(Some(main), Some(nodes[0]));
        assert_eq!(dom.content_frame(nodes[0]), Some(child));
        dom.remove_node(nodes[0]);
        assert!(dom.is_frame_detached(child));
        assert_eq!(dom.content_frame(nodes[0]), None);
    }

    #[test]
    fn tab_index_attribute_clamps_to_i16() {
        let (mut dom, _document, nodes) = document_with_children(&["div"]);
        let cases = [
            ("40000", Some(32767)),
            ("-99999999999", Some(-32768)),
            (" 3 ", Some(3)),
            ("x", None),
        ];
        for (value, expected) in cases {
            dom.element_mut(nodes[0]).unwrap().set_attribute("tabindex", value);
            assert_eq!(dom.element(nodes[0]).unwrap().tab_index_attribute(), expected, "{value}");
        }
    }

    #[test]
    fn local_root_below_remote_parent() {
        let mut dom = Dom::new();
        let main = dom.create_remote_frame(None, None);
        let child = dom.create_local_frame(Some(main), None);
        let grandchild = dom.create_local_frame(Some(child), None);
        assert!(dom.is_local_root(child));
        assert_eq!(dom.local_frame_root(grandchild), child);
        assert_eq!(dom.top_frame(grandchild), main);
        assert_eq!(dom.frame_owner(child), None);
    }
}
