//! A page: its frame tree, the focus controller, the embedder client and
//! the registered focus listeners.

use std::collections::HashMap;
use std::rc::Rc;

use crate::client::{ChromeClient, EmptyChromeClient};
use crate::dom::{DocumentId, Dom, FrameId, NodeId};
use crate::focus::events::Listener;
use crate::focus::{EventTarget, FocusController, FocusEvent};
use crate::settings::FocusSettings;

pub struct Page {
    pub(crate) dom: Dom,
    pub(crate) main_frame: FrameId,
    pub(crate) focus: FocusController,
    pub(crate) settings: FocusSettings,
    pub(crate) client: Rc<dyn ChromeClient>,
    pub(crate) listeners: HashMap<EventTarget, Vec<Listener>>,
    pub(crate) event_log: Vec<FocusEvent>,
    defers_loading: bool,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").finish_non_exhaustive()
    }
}

impl Page {
    /// A page whose main frame is local, with an empty main document.
    pub fn new(settings: FocusSettings, client: Rc<dyn ChromeClient>) -> Self {
        let mut dom = Dom::new();
        let main_frame = dom.create_local_frame(None, None);
        Self::from_dom(dom, main_frame, settings, client)
    }

    /// A page whose main frame lives in another process. Only its local
    /// subframes are available here.
    pub fn with_remote_main_frame(settings: FocusSettings, client: Rc<dyn ChromeClient>) -> Self {
        let mut dom = Dom::new();
        let main_frame = dom.create_remote_frame(None, None);
        Self::from_dom(dom, main_frame, settings, client)
    }

    pub fn from_dom(dom: Dom, main_frame: FrameId, settings: FocusSettings, client: Rc<dyn ChromeClient>) -> Self {
        Self {
            dom,
            main_frame,
            focus: FocusController::new(),
            settings,
            client,
            listeners: HashMap::new(),
            event_log: Vec::new(),
            defers_loading: false,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FocusSettings::default(), Rc::new(EmptyChromeClient))
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Direct tree access for building content. Focus state must still be
    /// changed through the controller entry points.
    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn main_frame(&self) -> FrameId {
        self.main_frame
    }

    /// Document of the main frame, when the main frame is local.
    pub fn main_document(&self) -> Option<DocumentId> {
        self.dom.frame_document(self.main_frame)
    }

    pub fn settings(&self) -> &FocusSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut FocusSettings {
        &mut self.settings
    }

    pub fn focus_controller(&self) -> &FocusController {
        &self.focus
    }

    /// While loading is deferred (a modal dialog is up) window-level focus
    /// changes fire no events.
    pub fn set_defers_loading(&mut self, defers: bool) {
        self.defers_loading = defers;
    }

    pub fn defers_loading(&self) -> bool {
        self.defers_loading
    }

    /// Removes `node` from its tree. Frames it owned are detached and the
    /// controller drops a focused frame that went with them.
    pub fn remove_node(&mut self, node: NodeId) {
        self.dom.remove_node(node);
        self.forget_detached_focused_frame();
    }

    pub fn detach_frame(&mut self, frame: FrameId) {
        self.dom.detach_frame(frame);
        self.forget_detached_focused_frame();
    }

    fn forget_detached_focused_frame(&mut self) {
        if let Some(frame) = self.focus.focused_frame {
            if self.dom.is_frame_detached(frame) {
                tracing::debug!(target: "focus", %frame, "focused frame detached");
                self.focus.focused_frame = None;
            }
        }
    }

    /// Element with the given id in any frame of the page.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.dom.element_by_id(id)
    }
}
