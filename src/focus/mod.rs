//! Sequential (Tab / Shift-Tab) and directional focus navigation.

mod controller;
mod document;
pub(crate) mod events;
mod scanner;
mod scope;
mod sequential;
mod spatial;

use std::fmt;

use serde::Serialize;

pub use controller::FocusController;
pub use events::{EventHandler, EventTarget, FocusEvent, FocusEventType};
pub use scanner::{
    find_element_with_exact_tab_index, next_element_with_greater_tab_index, next_focusable_element,
    previous_element_with_lower_tab_index, previous_focusable_element,
};
pub use scope::{adjusted_tab_index, should_visit, FocusScope, ScopeOwnerKind};
pub use sequential::{
    adjust_to_element, find_focusable_element, find_focusable_element_across_focus_scopes,
    find_focusable_element_descending_down_into_frame_document, find_focusable_element_in_shadow_host,
    find_focusable_element_recursively,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusType {
    None,
    Forward,
    Backward,
    Up,
    Down,
    Left,
    Right,
    Mouse,
    Page,
}

impl FocusType {
    pub fn is_sequential(self) -> bool {
        matches!(self, FocusType::Forward | FocusType::Backward)
    }

    pub fn is_directional(self) -> bool {
        matches!(self, FocusType::Up | FocusType::Down | FocusType::Left | FocusType::Right)
    }
}

impl fmt::Display for FocusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FocusType::None => "none",
            FocusType::Forward => "forward",
            FocusType::Backward => "backward",
            FocusType::Up => "up",
            FocusType::Down => "down",
            FocusType::Left => "left",
            FocusType::Right => "right",
            FocusType::Mouse => "mouse",
            FocusType::Page => "page",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionBehaviorOnFocus {
    Reset,
    Restore,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusParams {
    pub selection_behavior: SelectionBehaviorOnFocus,
    pub focus_type: FocusType,
}

impl FocusParams {
    pub fn new(selection_behavior: SelectionBehaviorOnFocus, focus_type: FocusType) -> Self {
        Self {
            selection_behavior,
            focus_type,
        }
    }
}

impl Default for FocusParams {
    fn default() -> Self {
        Self::new(SelectionBehaviorOnFocus::None, FocusType::None)
    }
}
