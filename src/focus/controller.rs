//! Page-wide focus state and the entry points that change it.

use keyboard_types::KeyboardEvent;

use super::scope::FocusScope;
use super::sequential::{
    adjust_to_element, find_focusable_element_across_focus_scopes,
    find_focusable_element_descending_down_into_frame_document, find_focusable_element_in_shadow_host,
    find_focusable_element_recursively,
};
use super::{FocusEventType, FocusParams, FocusType, SelectionBehaviorOnFocus};
use crate::dom::{DocumentId, FrameId, NodeId};
use crate::input::direction_for_event;
use crate::page::Page;

#[derive(Debug, Default)]
pub struct FocusController {
    pub(crate) focused_frame: Option<FrameId>,
    is_active: bool,
    is_focused: bool,
    is_changing_focused_frame: bool,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the window holding the page is the active window.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Whether the page holds OS-level focus.
    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    /// The focused frame, local or remote.
    pub fn focused_frame(&self) -> Option<FrameId> {
        self.focused_frame
    }
}

impl Page {
    pub fn set_focused_frame(&mut self, frame: Option<FrameId>, notify_embedder: bool) {
        if self.focus.focused_frame == frame || (self.focus.is_changing_focused_frame && frame.is_some()) {
            return;
        }

        self.focus.is_changing_focused_frame = true;

        let old_frame = self
            .focus
            .focused_frame
            .filter(|frame| self.dom.is_local_frame(*frame));
        let new_frame = frame.filter(|frame| self.dom.is_local_frame(*frame));

        self.focus.focused_frame = frame;
        tracing::debug!(target: "focus", old = ?old_frame, new = ?frame, "focused frame changed");

        if let Some(old_frame) = old_frame.filter(|frame| self.dom.frame_has_view(*frame)) {
            self.dom.frame_mut(old_frame).selection.focused = false;
            self.dispatch_window_event(old_frame, FocusEventType::Blur);
        }

        if let Some(new_frame) = new_frame {
            if self.dom.frame_has_view(new_frame) && self.focus.is_focused {
                self.dom.frame_mut(new_frame).selection.focused = true;
                self.dispatch_window_event(new_frame, FocusEventType::Focus);
            }
        }

        self.focus.is_changing_focused_frame = false;

        // The listeners above may have detached the frame.
        if let Some(focused) = self.focus.focused_frame {
            if notify_embedder && !self.dom.is_frame_detached(focused) {
                self.client.frame_focused(focused);
            }
        }
    }

    /// Moves focus to a frame's document as a whole: the old frame's focused
    /// element is blurred and the new frame's focused element regains focus.
    pub fn focus_document_view(&mut self, frame: Option<FrameId>, notify_embedder: bool) {
        if self.focus.focused_frame == frame {
            return;
        }

        if let Some(document) = self
            .focused_frame()
            .filter(|frame| self.dom.frame_has_view(*frame))
            .and_then(|frame| self.dom.frame_document(frame))
        {
            if let Some(element) = self.dom.focused_element(document) {
                self.dispatch_blur_event(document, element);
            }
        }

        if let Some(document) = frame
            .filter(|frame| self.dom.frame_has_view(*frame))
            .and_then(|frame| self.dom.frame_document(frame))
        {
            if let Some(element) = self.dom.focused_element(document) {
                self.dispatch_focus_event(document, element);
            }
        }

        self.set_focused_frame(frame, notify_embedder);
    }

    /// The focused frame when it is local.
    pub fn focused_frame(&self) -> Option<FrameId> {
        self.focus
            .focused_frame
            .filter(|frame| self.dom.is_local_frame(*frame))
    }

    /// The focused local frame, else the first local root of the frame tree,
    /// else the main frame.
    pub fn focused_or_main_frame(&self) -> FrameId {
        if let Some(frame) = self.focused_frame() {
            return frame;
        }
        let top = self.dom.top_frame(self.main_frame);
        self.dom
            .frames_in_preorder(top)
            .into_iter()
            .find(|frame| self.dom.is_local_root(*frame))
            .unwrap_or(self.main_frame)
    }

    /// Owner element, in `current_frame`, of the child frame that contains
    /// the focused frame.
    pub fn focused_frame_owner_element(&self, current_frame: FrameId) -> Option<NodeId> {
        let mut cursor = self.focus.focused_frame;
        while let Some(frame) = cursor {
            let parent = self.dom.frame_parent(frame);
            if parent == Some(current_frame) {
                return self.dom.frame_owner(frame);
            }
            cursor = parent;
        }
        None
    }

    pub fn is_document_focused(&self, document: DocumentId) -> bool {
        if !self.focus.is_active || !self.focus.is_focused {
            return false;
        }
        let Some(document_frame) = self.dom.document_frame(document) else {
            return false;
        };
        self.focus
            .focused_frame
            .is_some_and(|frame| self.dom.is_frame_descendant_of(frame, document_frame))
    }

    /// OS focus entering or leaving the page.
    pub fn set_focused(&mut self, focused: bool) {
        if self.focus.is_focused == focused {
            return;
        }
        self.focus.is_focused = focused;

        if self.focus.focused_frame.is_none() {
            self.set_focused_frame(Some(self.main_frame), true);
        }

        // The frame may have been rejected above or replaced by a listener.
        let Some(frame) = self
            .focus
            .focused_frame
            .filter(|frame| self.dom.frame_has_view(*frame))
        else {
            return;
        };
        self.dom.frame_mut(frame).selection.focused = focused;
        if let Some(document) = self.dom.frame_document(frame) {
            self.dispatch_events_on_window_and_focused_element(document, focused);
        }
    }

    fn dispatch_events_on_window_and_focused_element(&mut self, document: DocumentId, focused: bool) {
        if self.defers_loading() {
            return;
        }

        if !focused {
            if let Some(element) = self.dom.focused_element(document) {
                self.dom.set_focus_state(element, false);
                self.dispatch_blur_event(document, element);
            }
        }

        if let Some(frame) = self.dom.document_frame(document) {
            let event_type = if focused {
                FocusEventType::Focus
            } else {
                FocusEventType::Blur
            };
            self.dispatch_window_event(frame, event_type);
        }

        if focused {
            if let Some(element) = self.dom.focused_element(document) {
                self.dom.set_focus_state(element, true);
                self.dispatch_focus_event(document, element);
            }
        }
    }

    pub fn set_active(&mut self, active: bool) {
        if self.focus.is_active == active {
            return;
        }
        self.focus.is_active = active;

        let frame = self.focused_or_main_frame();
        if self.dom.is_local_frame(frame) {
            self.client.page_activation_changed(active);
        }
    }

    /// Focus for a page that has just been shown or re-entered from the
    /// browser shell.
    pub fn set_initial_focus(&mut self, direction: FocusType) -> bool {
        let advanced = self.advance_focus(direction, true);

        // Accessibility hears about it even when focus stayed put.
        if self.dom.is_local_frame(self.focused_or_main_frame()) {
            self.client.handle_initial_focus();
        }
        advanced
    }

    pub fn advance_focus(&mut self, direction: FocusType, initial_focus: bool) -> bool {
        match direction {
            FocusType::Forward | FocusType::Backward => {
                let frame = self.focused_or_main_frame();
                if !self.dom.is_local_frame(frame) {
                    tracing::warn!(target: "focus", %frame, "no local frame to tab through");
                    return false;
                }
                self.advance_focus_in_document_order(frame, None, direction, initial_focus)
            }
            FocusType::Left | FocusType::Right | FocusType::Up | FocusType::Down => {
                self.advance_focus_directionally(direction)
            }
            _ => {
                debug_assert!(false, "advance_focus called with {direction}");
                false
            }
        }
    }

    /// Continues sequential navigation in local frame `to` after the remote
    /// frame `from` ran out of focusable content.
    pub fn advance_focus_across_frames(&mut self, direction: FocusType, from: FrameId, to: FrameId) -> bool {
        debug_assert!(self.dom.is_remote_frame(from));
        // Leaving a child frame resumes after its owner element.
        let start = if self.dom.frame_parent(from) == Some(to) {
            self.dom.frame_owner(from)
        } else {
            None
        };
        self.advance_focus_in_document_order(to, start, direction, false)
    }

    pub fn advance_focus_in_document_order(
        &mut self,
        frame: FrameId,
        start: Option<NodeId>,
        direction: FocusType,
        initial_focus: bool,
    ) -> bool {
        let Some(document) = self.dom.frame_document(frame) else {
            debug_assert!(false, "{frame} is not a local frame");
            return false;
        };

        let mut current = start;
        if current.is_none() && !initial_focus {
            current = self.sequential_focus_navigation_starting_point(document, direction);
        }

        let caret_browsing = self.settings.caret_browsing;
        if caret_browsing && current.is_none() {
            current = adjust_to_element(&self.dom, self.dom.frame(frame).selection.anchor, direction);
        }

        let scope = match current {
            Some(current) => FocusScope::of_element(&self.dom, current),
            None => FocusScope::of_document(&self.dom, document),
        };
        let mut element = find_focusable_element_across_focus_scopes(&self.dom, direction, &scope, current);

        if element.is_none() {
            // A remote ancestor continues the search in its own process.
            let local_root = self.dom.local_frame_root(frame);
            if local_root != self.dom.top_frame(frame) {
                self.clear_focused_element(document);
                self.set_sequential_focus_navigation_starting_point(document, None);
                if let Some(remote) = self.dom.frame_parent(local_root) {
                    tracing::debug!(target: "focus", %remote, %direction, "handing focus to remote ancestor");
                    self.client
                        .advance_focus_in_remote_frame(remote, direction, local_root);
                }
                return true;
            }

            if !initial_focus && self.settings.tab_cycles_through_chrome && self.client.can_take_focus(direction) {
                self.clear_focused_element(document);
                self.set_sequential_focus_navigation_starting_point(document, None);
                self.set_focused_frame(None, true);
                self.client.take_focus(direction);
                return true;
            }

            // Wrap around to the start of the main document.
            let Some(main_document) = self.dom.frame_document(self.main_frame) else {
                return false;
            };
            let main_scope = FocusScope::of_document(&self.dom, main_document);
            element = find_focusable_element_recursively(&self.dom, direction, &main_scope, None);
            element = find_focusable_element_descending_down_into_frame_document(&self.dom, direction, element);
        }

        let Some(element) = element else {
            return false;
        };

        if self.dom.focused_element(document) == Some(element) {
            // Wrapped around to the same element.
            return true;
        }

        if self.dom.is_frame_owner_element(element)
            && (!self.dom.is_plugin_element(element) || !self.dom.is_keyboard_focusable(element))
        {
            // Frames take focus instead of their owner elements.
            let Some(content_frame) = self.dom.content_frame(element) else {
                return false;
            };
            self.clear_focused_element(document);
            self.set_focused_frame(Some(content_frame), true);

            // Listeners may have detached the frame meanwhile.
            if let Some(content_frame) = self.dom.content_frame(element) {
                if self.dom.is_remote_frame(content_frame) {
                    tracing::debug!(target: "focus", remote = %content_frame, %direction, "handing focus to remote child");
                    self.client
                        .advance_focus_in_remote_frame(content_frame, direction, frame);
                }
            }
            return true;
        }

        let new_document = self.dom.document_of(element);
        if new_document != document {
            self.clear_focused_element(document);
        }

        self.set_focused_frame(self.dom.document_frame(new_document), true);

        if caret_browsing {
            self.dom.frame_mut(frame).selection.anchor = Some(element);
        }

        self.focus_element(element, FocusParams::new(SelectionBehaviorOnFocus::Reset, direction));
        true
    }

    /// The authoritative focus change: moves page focus to `element` in
    /// `new_focused_frame`, or clears it when `element` is `None`.
    pub fn set_focused_element(
        &mut self,
        element: Option<NodeId>,
        new_focused_frame: Option<FrameId>,
        params: FocusParams,
    ) -> bool {
        let old_focused_frame = self.focused_frame();
        let old_document = old_focused_frame.and_then(|frame| self.dom.frame_document(frame));

        let old_focused_element = old_document.and_then(|document| self.dom.focused_element(document));
        if element.is_some() && old_focused_element == element {
            return true;
        }

        if let Some(old) = old_focused_element {
            if self.dom.is_root_editable_element(old) && !self.relinquishes_editing_focus(old) {
                return false;
            }
        }

        self.client.will_set_input_method_state();

        let new_document = match element {
            Some(element) => Some(self.dom.document_of(element)),
            None => new_focused_frame.and_then(|frame| self.dom.frame_document(frame)),
        };

        if let Some(new_document) = new_document {
            if old_document == Some(new_document) && self.dom.focused_element(new_document) == element {
                return true;
            }
        }

        if let Some(new_frame) = new_focused_frame.filter(|frame| self.dom.is_local_frame(*frame)) {
            self.clear_selection_if_needed(old_focused_frame, new_frame, element);
        }

        if let Some(old_document) = old_document {
            if Some(old_document) != new_document {
                self.clear_focused_element(old_document);
            }
        }

        if let Some(new_frame) = new_focused_frame {
            if self.dom.is_frame_detached(new_frame) {
                self.set_focused_frame(None, true);
                return false;
            }
        }
        self.set_focused_frame(new_focused_frame, true);

        match new_document {
            Some(new_document) => self.commit_focused_element(new_document, element, params),
            None => true,
        }
    }

    /// Focuses a single element the way script or a click would. A host
    /// that delegates focus passes it on to its first focusable shadow
    /// descendant.
    pub fn focus_element(&mut self, element: NodeId, params: FocusParams) -> bool {
        if !self.dom.is_connected(element) {
            return false;
        }
        let document = self.dom.document_of(element);
        if self.dom.focused_element(document) == Some(element) {
            return true;
        }
        let Some(frame) = self.dom.document_frame(document) else {
            return false;
        };
        if self.dom.is_frame_detached(frame) || !self.dom.is_focusable(element) {
            return false;
        }

        if self.dom.delegates_focus(element) {
            if let Some(focused) = self.dom.focused_element(document) {
                if self.dom.is_shadow_including_inclusive_ancestor(element, focused) {
                    return true;
                }
            }
            let found = find_focusable_element_in_shadow_host(&self.dom, element);
            if let Some(found) = found.filter(|found| self.dom.is_shadow_including_inclusive_ancestor(element, *found)) {
                return self.focus_element(found, FocusParams::new(SelectionBehaviorOnFocus::Reset, FocusType::Forward));
            }
        }

        if !self.set_focused_element(Some(element), Some(frame), params) {
            return false;
        }
        self.update_focus_appearance(element, params.selection_behavior);
        true
    }

    /// Places the caret of an editable element that just took focus.
    fn update_focus_appearance(&mut self, element: NodeId, behavior: SelectionBehaviorOnFocus) {
        if behavior == SelectionBehaviorOnFocus::None {
            return;
        }
        if !self.dom.is_root_editable_element(element) && self.dom.enclosing_text_form_control(element) != Some(element) {
            return;
        }
        let Some(frame) = self.dom.document_frame(self.dom.document_of(element)) else {
            return;
        };
        let anchor = self.dom.frame(frame).selection.anchor;
        let inside = anchor.is_some_and(|anchor| self.dom.is_shadow_including_inclusive_ancestor(element, anchor));
        if behavior == SelectionBehaviorOnFocus::Reset || !inside {
            self.dom.frame_mut(frame).selection.anchor = Some(element);
        }
    }

    /// Editing hosts always let go of focus while they sit in a live
    /// frame; a detached one keeps it.
    fn relinquishes_editing_focus(&self, element: NodeId) -> bool {
        debug_assert!(self.dom.has_editable_style(element));
        let attached = self
            .dom
            .document_frame(self.dom.document_of(element))
            .is_some_and(|frame| !self.dom.is_frame_detached(frame));
        attached && self.dom.root_editable_element(element).is_some()
    }

    /// Drops a selection inside a text field that focus is moving away
    /// from, within one document.
    fn clear_selection_if_needed(&mut self, old_frame: Option<FrameId>, new_frame: FrameId, new_element: Option<NodeId>) {
        let Some(old_frame) = old_frame else {
            return;
        };
        if self.dom.frame_document(old_frame) != self.dom.frame_document(new_frame) {
            return;
        }
        let Some(anchor) = self.dom.frame(old_frame).selection.anchor else {
            return;
        };
        if self.settings.caret_browsing {
            return;
        }
        if let Some(new_element) = new_element {
            if anchor == new_element || self.dom.is_descendant_of(anchor, new_element) {
                return;
            }
        }
        if self.dom.enclosing_text_form_control(anchor).is_none() {
            return;
        }
        if new_element.is_some() && self.dom.is_in_shadow_tree(anchor) && self.dom.shadow_host(anchor) == new_element {
            return;
        }
        self.dom.frame_mut(old_frame).selection.clear();
    }

    /// Maps a key press to a navigation step. Arrow keys only navigate when
    /// directional navigation is switched on.
    pub fn handle_key_event(&mut self, event: &KeyboardEvent) -> bool {
        let Some(direction) = direction_for_event(event) else {
            return false;
        };
        if direction.is_directional() && !self.settings.spatial_navigation {
            return false;
        }
        self.advance_focus(direction, false)
    }
}
