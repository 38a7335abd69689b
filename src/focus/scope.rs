use crate::dom::{DocumentId, Dom, NodeId};

/// How an element delegates traversal into an inner focus scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOwnerKind {
    ShadowHost,
    InsertionPoint,
    FrameOwner,
    None,
}

impl ScopeOwnerKind {
    pub fn of(dom: &Dom, element: NodeId) -> Self {
        if dom.is_shadow_host(element) {
            ScopeOwnerKind::ShadowHost
        } else if is_shadow_insertion_point_focus_scope_owner(dom, element) {
            ScopeOwnerKind::InsertionPoint
        } else if dom.is_frame_owner_element(element) {
            ScopeOwnerKind::FrameOwner
        } else {
            ScopeOwnerKind::None
        }
    }
}

/// One traversal domain: a document or a shadow tree. Scopes are cheap
/// handles built per query; they own nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusScope {
    root: NodeId,
}

impl FocusScope {
    pub fn of_element(dom: &Dom, element: NodeId) -> Self {
        Self {
            root: dom.tree_scope_root(element),
        }
    }

    pub fn of_document(dom: &Dom, document: DocumentId) -> Self {
        Self {
            root: dom.document_root(document),
        }
    }

    pub fn owned_by_shadow_host(dom: &Dom, host: NodeId) -> Option<Self> {
        debug_assert!(dom.is_shadow_host(host), "{host} is not a shadow host");
        dom.youngest_shadow_root(host).map(|root| Self { root })
    }

    pub fn owned_by_shadow_insertion_point(dom: &Dom, insertion_point: NodeId) -> Option<Self> {
        debug_assert!(
            is_shadow_insertion_point_focus_scope_owner(dom, insertion_point),
            "{insertion_point} is not an active shadow insertion point"
        );
        dom.older_shadow_root(insertion_point)
            .map(|root| Self { root })
    }

    pub fn owned_by_non_focusable_scope_owner(dom: &Dom, element: NodeId) -> Option<Self> {
        match ScopeOwnerKind::of(dom, element) {
            ScopeOwnerKind::ShadowHost => Self::owned_by_shadow_host(dom, element),
            kind => {
                debug_assert_eq!(kind, ScopeOwnerKind::InsertionPoint);
                Self::owned_by_shadow_insertion_point(dom, element)
            }
        }
    }

    /// Scope of the document loaded in a local content frame.
    pub fn owned_by_iframe(dom: &Dom, owner: NodeId) -> Option<Self> {
        let frame = dom.content_frame(owner)?;
        dom.frame_document(frame)
            .map(|document| Self::of_document(dom, document))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn first_element(&self, dom: &Dom) -> Option<NodeId> {
        if dom.is_element(self.root) {
            return Some(self.root);
        }
        dom.next_element(self.root)
    }

    pub fn last_element(&self, dom: &Dom) -> Option<NodeId> {
        dom.last_element_within(self.root)
    }

    /// The element in the enclosing scope that delegates into this one.
    pub fn owner(&self, dom: &Dom) -> Option<NodeId> {
        if let Some(data) = dom.shadow_root_data(self.root) {
            if dom.youngest_shadow_root(data.host) == Some(self.root) {
                return Some(data.host);
            }
            return dom.shadow_insertion_point_of_younger_shadow_root(self.root);
        }
        if !dom.is_document_node(self.root) {
            return None;
        }
        let frame = dom.document_frame(dom.document_of(self.root))?;
        dom.frame_owner(frame)
    }
}

pub(crate) fn is_shadow_insertion_point_focus_scope_owner(dom: &Dom, element: NodeId) -> bool {
    dom.is_active_shadow_insertion_point(element) && dom.older_shadow_root(element).is_some()
}

pub(crate) fn is_shadow_host_without_custom_focus_logic(dom: &Dom, element: NodeId) -> bool {
    dom.is_shadow_host(element) && !dom.has_custom_focus_logic(element)
}

pub(crate) fn is_non_keyboard_focusable_shadow_host(dom: &Dom, element: NodeId) -> bool {
    is_shadow_host_without_custom_focus_logic(dom, element) && !dom.is_keyboard_focusable(element)
}

pub(crate) fn is_keyboard_focusable_shadow_host(dom: &Dom, element: NodeId) -> bool {
    is_shadow_host_without_custom_focus_logic(dom, element) && dom.is_keyboard_focusable(element)
}

pub(crate) fn is_non_focusable_focus_scope_owner(dom: &Dom, element: NodeId) -> bool {
    is_non_keyboard_focusable_shadow_host(dom, element)
        || is_shadow_insertion_point_focus_scope_owner(dom, element)
}

pub(crate) fn is_shadow_host_delegates_focus(dom: &Dom, element: NodeId) -> bool {
    dom.delegates_focus(element)
}

/// Tab index used for ordering: non-focusable scope owners stand in for
/// their subtree at index 0.
pub fn adjusted_tab_index(dom: &Dom, element: NodeId) -> i32 {
    if is_non_focusable_focus_scope_owner(dom, element) {
        0
    } else {
        dom.tab_index(element)
    }
}

pub fn should_visit(dom: &Dom, element: NodeId) -> bool {
    dom.is_keyboard_focusable(element) || is_non_focusable_focus_scope_owner(dom, element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_scope_owner_is_frame_owner() {
        let mut dom = Dom::new();
        let main = dom.create_local_frame(None, None);
        let main_document = dom.frame_document(main).unwrap();
        let iframe = dom.create_element(main_document, "iframe");
        dom.append_child(dom.document_root(main_document), iframe);
        let child = dom.create_local_frame(Some(main), Some(iframe));
        let child_document = dom.frame_document(child).unwrap();

        assert_eq!(FocusScope::of_document(&dom, main_document).owner(&dom), None);
        assert_eq!(FocusScope::of_document(&dom, child_document).owner(&dom), Some(iframe));
        assert_eq!(
            FocusScope::owned_by_iframe(&dom, iframe),
            Some(FocusScope::of_document(&dom, child_document))
        );
    }

    #[test]
    fn shadow_scope_owner_is_host_or_insertion_point() {
        let mut dom = Dom::new();
        let frame = dom.create_local_frame(None, None);
        let document = dom.frame_document(frame).unwrap();
        let host = dom.create_element(document, "div");
        dom.append_child(dom.document_root(document), host);
        let older = dom.attach_shadow(host, false);
        let younger = dom.attach_shadow(host, false);
        let shadow = dom.create_element(document, "shadow");
        dom.append_child(younger, shadow);

        let younger_scope = FocusScope::owned_by_shadow_host(&dom, host).unwrap();
        assert_eq!(younger_scope.root(), younger);
        assert_eq!(younger_scope.owner(&dom), Some(host));

        let older_scope = FocusScope::owned_by_shadow_insertion_point(&dom, shadow).unwrap();
        assert_eq!(older_scope.root(), older);
        assert_eq!(older_scope.owner(&dom), Some(shadow));
        assert_eq!(ScopeOwnerKind::of(&dom, shadow), ScopeOwnerKind::InsertionPoint);
        assert_eq!(adjusted_tab_index(&dom, shadow), 0);
        assert!(should_visit(&dom, shadow));
    }

    #[test]
    fn empty_scope_has_no_elements() {
        let mut dom = Dom::new();
        let frame = dom.create_local_frame(None, None);
        let document = dom.frame_document(frame).unwrap();
        let scope = FocusScope::of_document(&dom, document);
        assert_eq!(scope.first_element(&dom), None);
        assert_eq!(scope.last_element(&dom), None);
    }
}
