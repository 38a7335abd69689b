//! Per-document focus state: the focused element and the sequential
//! navigation starting point.

use super::sequential::adjust_to_element;
use super::{FocusEventType, FocusParams, FocusType};
use crate::dom::{DocumentId, NodeId};
use crate::page::Page;

impl Page {
    /// Where Tab navigation in `document` starts from: the focused element,
    /// else the recorded starting point turned into an exclusive start.
    pub fn sequential_focus_navigation_starting_point(
        &self,
        document: DocumentId,
        direction: FocusType,
    ) -> Option<NodeId> {
        if let Some(focused) = self.dom.focused_element(document) {
            return Some(focused);
        }
        let start = self.dom.sequential_starting_point_raw(document)?;
        if !self.dom.is_connected(start) || self.dom.document_of(start) != document {
            return None;
        }
        adjust_to_element(&self.dom, Some(start), direction)
    }

    /// Records where the next Tab should start, e.g. after a click on
    /// non-focusable content.
    pub fn set_sequential_focus_navigation_starting_point(&mut self, document: DocumentId, node: Option<NodeId>) {
        debug_assert!(node.map_or(true, |node| self.dom.document_of(node) == document));
        self.dom.set_sequential_starting_point_raw(document, node);
    }

    pub(crate) fn clear_focused_element(&mut self, document: DocumentId) {
        self.commit_focused_element(document, None, FocusParams::default());
    }

    /// Makes `new` the focused element of `document`, firing blur-side
    /// events on the old element and focus-side events on the new one.
    ///
    /// Returns false when `new` cannot take focus, or when a listener moved
    /// focus elsewhere or detached `new` while the events ran.
    pub(crate) fn commit_focused_element(
        &mut self,
        document: DocumentId,
        new: Option<NodeId>,
        params: FocusParams,
    ) -> bool {
        let old = self.dom.focused_element(document);
        if old == new {
            return true;
        }

        let mut new = new;
        let mut blocked = false;
        self.dom.set_focused_element_raw(document, None);

        if let Some(old) = old {
            self.dom.set_focus_state(old, false);
            if self.focus.is_focused() {
                self.dispatch_element_event(old, FocusEventType::Blur, new, params.focus_type);
                if self.dom.focused_element(document).is_some() {
                    blocked = true;
                    new = None;
                }
                self.dispatch_element_event(old, FocusEventType::FocusOut, new, params.focus_type);
                self.dispatch_element_event(old, FocusEventType::DomFocusOut, new, params.focus_type);
                if self.dom.focused_element(document).is_some() {
                    blocked = true;
                    new = None;
                }
            }
        }

        let mut rejected = false;
        if let Some(element) = new {
            if self.dom.document_of(element) == document && self.dom.is_focusable(element) {
                self.dom.set_focused_element_raw(document, Some(element));
                self.dom.set_sequential_starting_point_raw(document, Some(element));
                self.dom.set_focus_state(element, true);

                if self.focus.is_focused() {
                    for event_type in [FocusEventType::Focus, FocusEventType::FocusIn, FocusEventType::DomFocusIn] {
                        self.dispatch_element_event(element, event_type, old, params.focus_type);
                        if self.dom.focused_element(document) != Some(element) {
                            blocked = true;
                            break;
                        }
                    }
                }
            } else {
                tracing::debug!(target: "focus", %element, "element refused focus");
                rejected = true;
            }
        }

        if blocked {
            tracing::debug!(target: "focus", %document, "focus change blocked by a listener");
            return false;
        }
        self.client
            .focused_node_changed(old, self.dom.focused_element(document));
        !rejected
    }
}
