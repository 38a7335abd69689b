use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use super::FocusType;
use crate::dom::{DocumentId, FrameId, NodeId};
use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FocusEventType {
    #[serde(rename = "focus")]
    Focus,
    #[serde(rename = "blur")]
    Blur,
    #[serde(rename = "focusin")]
    FocusIn,
    #[serde(rename = "focusout")]
    FocusOut,
    #[serde(rename = "DOMFocusIn")]
    DomFocusIn,
    #[serde(rename = "DOMFocusOut")]
    DomFocusOut,
}

impl fmt::Display for FocusEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FocusEventType::Focus => "focus",
            FocusEventType::Blur => "blur",
            FocusEventType::FocusIn => "focusin",
            FocusEventType::FocusOut => "focusout",
            FocusEventType::DomFocusIn => "DOMFocusIn",
            FocusEventType::DomFocusOut => "DOMFocusOut",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id")]
pub enum EventTarget {
    Window(FrameId),
    Element(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FocusEvent {
    pub event_type: FocusEventType,
    pub target: EventTarget,
    #[serde(skip)]
    pub related_target: Option<NodeId>,
    pub focus_type: FocusType,
}

impl FocusEvent {
    pub fn new(event_type: FocusEventType, target: EventTarget) -> Self {
        Self {
            event_type,
            target,
            related_target: None,
            focus_type: FocusType::None,
        }
    }

    pub fn with_related_target(mut self, related_target: Option<NodeId>) -> Self {
        self.related_target = related_target;
        self
    }

    pub fn with_focus_type(mut self, focus_type: FocusType) -> Self {
        self.focus_type = focus_type;
        self
    }
}

/// Listener callback. Handlers run synchronously during dispatch and may
/// change focus or remove nodes; callers re-check state afterwards.
pub type EventHandler = Rc<dyn Fn(&mut Page, &FocusEvent)>;

#[derive(Clone)]
pub(crate) struct Listener {
    pub(crate) event_type: FocusEventType,
    pub(crate) handler: EventHandler,
}

impl Page {
    pub fn add_event_listener(&mut self, target: EventTarget, event_type: FocusEventType, handler: EventHandler) {
        self.listeners
            .entry(target)
            .or_default()
            .push(Listener { event_type, handler });
    }

    pub(crate) fn dispatch_event(&mut self, event: FocusEvent) {
        tracing::trace!(target: "focus", event = %event.event_type, target_node = ?event.target, "dispatch");
        self.event_log.push(event);
        // Snapshot so handlers may add listeners while running.
        let listeners: Vec<Listener> = self
            .listeners
            .get(&event.target)
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|listener| listener.event_type == event.event_type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        for listener in listeners {
            (listener.handler)(self, &event);
        }
    }

    pub(crate) fn dispatch_element_event(
        &mut self,
        element: NodeId,
        event_type: FocusEventType,
        related: Option<NodeId>,
        focus_type: FocusType,
    ) {
        self.dispatch_event(
            FocusEvent::new(event_type, EventTarget::Element(element))
                .with_related_target(related)
                .with_focus_type(focus_type),
        );
    }

    /// blur, then focusout and DOMFocusOut while `element` is still the
    /// document's focused element.
    pub(crate) fn dispatch_blur_event(&mut self, document: DocumentId, element: NodeId) {
        self.dispatch_element_event(element, FocusEventType::Blur, None, FocusType::Page);
        if self.dom.focused_element(document) == Some(element) {
            self.dispatch_element_event(element, FocusEventType::FocusOut, None, FocusType::Page);
            if self.dom.focused_element(document) == Some(element) {
                self.dispatch_element_event(element, FocusEventType::DomFocusOut, None, FocusType::Page);
            }
        }
    }

    pub(crate) fn dispatch_focus_event(&mut self, document: DocumentId, element: NodeId) {
        self.dispatch_element_event(element, FocusEventType::Focus, None, FocusType::Page);
        if self.dom.focused_element(document) == Some(element) {
            self.dispatch_element_event(element, FocusEventType::FocusIn, None, FocusType::Page);
            if self.dom.focused_element(document) == Some(element) {
                self.dispatch_element_event(element, FocusEventType::DomFocusIn, None, FocusType::Page);
            }
        }
    }

    pub(crate) fn dispatch_window_event(&mut self, frame: FrameId, event_type: FocusEventType) {
        self.dispatch_event(FocusEvent::new(event_type, EventTarget::Window(frame)));
    }

    pub fn event_log(&self) -> &[FocusEvent] {
        &self.event_log
    }

    pub fn take_event_log(&mut self) -> Vec<FocusEvent> {
        std::mem::take(&mut self.event_log)
    }
}
