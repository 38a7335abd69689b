//! Element-level focusability: which elements can take focus and with what
//! tab index, plus the shadow-tree structure queries the focus engine
//! builds its scope-owner predicates on.

use super::{Dom, NodeId};

const FORM_CONTROL_TAGS: &[&str] = &["button", "input", "select", "textarea", "fieldset", "optgroup", "option"];

impl Dom {
    pub fn is_shadow_host(&self, node: NodeId) -> bool {
        !self.shadow_roots(node).is_empty()
    }

    /// The shadow root authors attach to; the youngest one when a host
    /// carries several.
    pub fn author_shadow_root(&self, node: NodeId) -> Option<NodeId> {
        self.youngest_shadow_root(node)
    }

    pub fn delegates_focus(&self, host: NodeId) -> bool {
        self.author_shadow_root(host)
            .and_then(|root| self.shadow_root_data(root))
            .is_some_and(|data| data.delegates_focus)
    }

    pub fn has_custom_focus_logic(&self, node: NodeId) -> bool {
        self.element(node)
            .is_some_and(|element| element.custom_focus_logic)
    }

    pub fn is_frame_owner_element(&self, node: NodeId) -> bool {
        matches!(self.tag(node), Some("iframe" | "frame" | "object" | "embed"))
    }

    pub fn is_plugin_element(&self, node: NodeId) -> bool {
        matches!(self.tag(node), Some("object" | "embed"))
    }

    fn is_content_editable(&self, node: NodeId) -> Option<bool> {
        let value = self.element(node)?.attribute("contenteditable")?;
        Some(!value.eq_ignore_ascii_case("false"))
    }

    /// Whether `node` sits inside an editing host (inclusive).
    pub fn has_editable_style(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if let Some(editable) = self.is_content_editable(current) {
                return editable;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Topmost editable inclusive ancestor of `node`.
    pub fn root_editable_element(&self, node: NodeId) -> Option<NodeId> {
        if !self.has_editable_style(node) {
            return None;
        }
        let mut result = node;
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if !self.is_element(current) || !self.has_editable_style(current) {
                break;
            }
            result = current;
            cursor = self.parent(current);
        }
        Some(result)
    }

    pub fn is_root_editable_element(&self, node: NodeId) -> bool {
        self.is_element(node) && self.root_editable_element(node) == Some(node)
    }

    /// Nearest inclusive ancestor, across shadow boundaries, that is a text
    /// form control.
    pub fn enclosing_text_form_control(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.is_text_form_control(current) {
                return Some(current);
            }
            cursor = self.parent_or_shadow_host(current);
        }
        None
    }

    fn is_text_form_control(&self, node: NodeId) -> bool {
        let Some(element) = self.element(node) else {
            return false;
        };
        match element.tag.as_str() {
            "textarea" => true,
            "input" => matches!(
                element.attribute("type").unwrap_or("text").to_ascii_lowercase().as_str(),
                "text" | "search" | "url" | "tel" | "email" | "password" | "number"
            ),
            _ => false,
        }
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|element| {
            FORM_CONTROL_TAGS.contains(&element.tag.as_str()) && element.has_attribute("disabled")
        })
    }

    /// Rendered means connected with no `hidden` inclusive ancestor, shadow
    /// hosts and frame owners included.
    pub fn is_rendered(&self, node: NodeId) -> bool {
        if !self.is_connected(node) {
            return false;
        }
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self
                .element(current)
                .is_some_and(|element| element.has_attribute("hidden"))
            {
                return false;
            }
            cursor = if self.is_document_node(current) {
                self.document_frame(self.document_of(current))
                    .and_then(|frame| self.frame_owner(frame))
            } else {
                self.parent_or_shadow_host(current)
            };
        }
        true
    }

    fn is_natively_focusable(&self, node: NodeId) -> bool {
        let Some(element) = self.element(node) else {
            return false;
        };
        match element.tag.as_str() {
            "a" | "area" => element.has_attribute("href"),
            "input" => !element
                .attribute("type")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden")),
            "button" | "select" | "textarea" | "iframe" | "frame" | "object" | "embed" | "summary" => true,
            _ => false,
        }
    }

    pub fn supports_focus(&self, node: NodeId) -> bool {
        let Some(element) = self.element(node) else {
            return false;
        };
        element.tab_index_attribute().is_some()
            || self.is_natively_focusable(node)
            || self.is_root_editable_element(node)
            || self.delegates_focus(node)
    }

    pub fn is_focusable(&self, node: NodeId) -> bool {
        self.is_element(node) && self.is_rendered(node) && !self.is_disabled(node) && self.supports_focus(node)
    }

    /// Explicit tab index when set, otherwise 0 for elements that support
    /// focus and -1 for everything else.
    pub fn tab_index(&self, node: NodeId) -> i32 {
        let Some(element) = self.element(node) else {
            return -1;
        };
        if let Some(explicit) = element.tab_index_attribute() {
            return explicit;
        }
        if self.supports_focus(node) {
            0
        } else {
            -1
        }
    }

    pub fn is_keyboard_focusable(&self, node: NodeId) -> bool {
        self.is_focusable(node) && self.tab_index(node) >= 0
    }

    /// The shadow root that precedes the tree scope of `node` on the same
    /// host, when `node` lives in a shadow tree.
    pub fn older_shadow_root(&self, node: NodeId) -> Option<NodeId> {
        let scope = self.tree_scope_root(node);
        let host = self.shadow_root_data(scope)?.host;
        let roots = self.shadow_roots(host);
        let position = roots.iter().position(|root| *root == scope)?;
        position.checked_sub(1).map(|older| roots[older])
    }

    /// A `<shadow>` element is active when it is the first one in document
    /// order within its shadow tree.
    pub fn is_active_shadow_insertion_point(&self, node: NodeId) -> bool {
        if !self.has_tag(node, "shadow") {
            return false;
        }
        let scope = self.tree_scope_root(node);
        if !self.is_shadow_root(scope) {
            return false;
        }
        self.first_shadow_insertion_point(scope) == Some(node)
    }

    fn first_shadow_insertion_point(&self, scope: NodeId) -> Option<NodeId> {
        let mut cursor = self.first_element_within(scope);
        while let Some(current) = cursor {
            if self.has_tag(current, "shadow") {
                return Some(current);
            }
            cursor = self.next_element_within(current, Some(scope));
        }
        None
    }

    /// Whether the light children of `node` get rendered. A shadow host
    /// only renders them through a `<slot>` or `<content>` in its youngest
    /// shadow tree.
    pub fn renders_light_children(&self, node: NodeId) -> bool {
        let Some(root) = self.youngest_shadow_root(node) else {
            return true;
        };
        let mut cursor = self.first_element_within(root);
        while let Some(current) = cursor {
            if self.has_tag(current, "slot") || self.has_tag(current, "content") {
                return true;
            }
            cursor = self.next_element_within(current, Some(root));
        }
        false
    }

    /// The active insertion point of the next younger shadow root on the
    /// same host, which is where `root` gets projected.
    pub fn shadow_insertion_point_of_younger_shadow_root(&self, root: NodeId) -> Option<NodeId> {
        let host = self.shadow_root_data(root)?.host;
        let roots = self.shadow_roots(host);
        let position = roots.iter().position(|candidate| *candidate == root)?;
        let younger = *roots.get(position + 1)?;
        self.first_shadow_insertion_point(younger)
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{DocumentId, Dom, NodeId};

    fn setup() -> (Dom, DocumentId, NodeId) {
        let mut dom = Dom::new();
        let frame = dom.create_local_frame(None, None);
        let document = dom.frame_document(frame).unwrap();
        let root = dom.document_root(document);
        (dom, document, root)
    }

    fn add(dom: &mut Dom, document: DocumentId, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = dom.create_element(document, tag);
        for (name, value) in attrs {
            dom.element_mut(node).unwrap().set_attribute(name, value);
        }
        dom.append_child(parent, node);
        node
    }

    #[test]
    fn default_tab_indices() {
        let (mut dom, document, root) = setup();
        let button = add(&mut dom, document, root, "button", &[]);
        let div = add(&mut dom, document, root, "div", &[]);
        let link = add(&mut dom, document, root, "a", &[]);
        let href = add(&mut dom, document, root, "a", &[("href", "#")]);
        assert_eq!(dom.tab_index(button), 0);
        assert_eq!(dom.tab_index(div), -1);
        assert_eq!(dom.tab_index(link), -1);
        assert!(dom.is_keyboard_focusable(href));
    }

    #[test]
    fn negative_tabindex_is_focusable_but_not_keyboard_focusable() {
        let (mut dom, document, root) = setup();
        let div = add(&mut dom, document, root, "div", &[("tabindex", "-1")]);
        assert!(dom.is_focusable(div));
        assert!(!dom.is_keyboard_focusable(div));
    }

    #[test]
    fn disabled_and_hidden_are_not_focusable() {
        let (mut dom, document, root) = setup();
        let disabled = add(&mut dom, document, root, "button", &[("disabled", "")]);
        let hidden = add(&mut dom, document, root, "section", &[("hidden", "")]);
        let inside = add(&mut dom, document, hidden, "button", &[]);
        assert!(!dom.is_focusable(disabled));
        assert!(!dom.is_focusable(inside));
    }

    #[test]
    fn editing_host_is_root_editable() {
        let (mut dom, document, root) = setup();
        let host = add(&mut dom, document, root, "div", &[("contenteditable", "true")]);
        let inner = add(&mut dom, document, host, "p", &[]);
        assert!(dom.is_root_editable_element(host));
        assert!(!dom.is_root_editable_element(inner));
        assert_eq!(dom.root_editable_element(inner), Some(host));
        assert!(dom.is_keyboard_focusable(host));
    }

    #[test]
    fn delegating_host_supports_focus() {
        let (mut dom, document, root) = setup();
        let host = add(&mut dom, document, root, "div", &[]);
        dom.attach_shadow(host, true);
        assert!(dom.is_keyboard_focusable(host));
        assert_eq!(dom.tab_index(host), 0);
    }

    #[test]
    fn shadow_insertion_point_projects_older_root() {
        let (mut dom, document, root) = setup();
        let host = add(&mut dom, document, root, "div", &[]);
        let older = dom.attach_shadow(host, false);
        let younger = dom.attach_shadow(host, false);
        let wrapper = add(&mut dom, document, younger, "span", &[]);
        let shadow = add(&mut dom, document, wrapper, "shadow", &[]);
        let second = add(&mut dom, document, younger, "shadow", &[]);
        assert!(dom.is_active_shadow_insertion_point(shadow));
        assert!(!dom.is_active_shadow_insertion_point(second));
        assert_eq!(dom.older_shadow_root(shadow), Some(older));
        assert_eq!(dom.shadow_insertion_point_of_younger_shadow_root(older), Some(shadow));
        assert_eq!(dom.older_shadow_root(wrapper), Some(older));
    }
}
