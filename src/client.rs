//! Hooks from the focus engine out to whatever embeds the page.

use std::cell::{Cell, RefCell};

use crate::dom::{FrameId, NodeId};
use crate::focus::FocusType;

/// Capabilities the browser shell lends to a page. Every hook has a no-op
/// default so embedders implement only what they care about.
pub trait ChromeClient {
    /// Whether the shell wants focus once tabbing runs off the end of the
    /// page.
    fn can_take_focus(&self, _direction: FocusType) -> bool {
        false
    }

    fn take_focus(&self, _direction: FocusType) {}

    fn will_set_input_method_state(&self) {}

    fn focused_node_changed(&self, _old: Option<NodeId>, _new: Option<NodeId>) {}

    fn frame_focused(&self, _frame: FrameId) {}

    /// Asks the process rendering `remote` to continue sequential
    /// navigation. One-way: nothing comes back to this page.
    fn advance_focus_in_remote_frame(&self, _remote: FrameId, _direction: FocusType, _source: FrameId) {}

    fn handle_initial_focus(&self) {}

    fn page_activation_changed(&self, _active: bool) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyChromeClient;

impl ChromeClient for EmptyChromeClient {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    TakeFocus(FocusType),
    WillSetInputMethodState,
    FocusedNodeChanged(Option<NodeId>, Option<NodeId>),
    FrameFocused(FrameId),
    AdvanceFocusInRemoteFrame {
        remote: FrameId,
        direction: FocusType,
        source: FrameId,
    },
    HandleInitialFocus,
    PageActivationChanged(bool),
}

/// Client that records every call it receives, for tests and for the CLI
/// trail.
#[derive(Debug, Default)]
pub struct RecordingClient {
    calls: RefCell<Vec<ClientCall>>,
    accepts_focus: Cell<bool>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_accepts_focus(&self, accepts: bool) {
        self.accepts_focus.set(accepts);
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<ClientCall> {
        self.calls.take()
    }

    fn record(&self, call: ClientCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl ChromeClient for RecordingClient {
    fn can_take_focus(&self, _direction: FocusType) -> bool {
        self.accepts_focus.get()
    }

    fn take_focus(&self, direction: FocusType) {
        self.record(ClientCall::TakeFocus(direction));
    }

    fn will_set_input_method_state(&self) {
        self.record(ClientCall::WillSetInputMethodState);
    }

    fn focused_node_changed(&self, old: Option<NodeId>, new: Option<NodeId>) {
        self.record(ClientCall::FocusedNodeChanged(old, new));
    }

    fn frame_focused(&self, frame: FrameId) {
        self.record(ClientCall::FrameFocused(frame));
    }

    fn advance_focus_in_remote_frame(&self, remote: FrameId, direction: FocusType, source: FrameId) {
        self.record(ClientCall::AdvanceFocusInRemoteFrame {
            remote,
            direction,
            source,
        });
    }

    fn handle_initial_focus(&self) {
        self.record(ClientCall::HandleInitialFocus);
    }

    fn page_activation_changed(&self, active: bool) {
        self.record(ClientCall::PageActivationChanged(active));
    }
}
