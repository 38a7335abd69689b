//! Sequential focus navigation across nested focus scopes.
//!
//! Order follows the HTML sequential navigation rules (positive tab indices
//! ascending, then tab index 0 in tree order) with each shadow tree's order
//! spliced in where its host sits. Scopes nest through shadow hosts,
//! `<shadow>` insertion points and frame owner elements.

use super::scanner::{next_focusable_element, previous_focusable_element};
use super::scope::{
    is_keyboard_focusable_shadow_host, is_non_focusable_focus_scope_owner, is_shadow_host_delegates_focus,
    is_shadow_host_without_custom_focus_logic, FocusScope,
};
use super::FocusType;
use crate::dom::{Dom, NodeId};

fn find_focusable_element_internal(
    dom: &Dom,
    direction: FocusType,
    scope: &FocusScope,
    element: Option<NodeId>,
) -> Option<NodeId> {
    match direction {
        FocusType::Forward => next_focusable_element(dom, scope, element),
        _ => previous_focusable_element(dom, scope, element),
    }
}

/// `start` is exclusive.
fn find_focusable_element_recursively_forward(dom: &Dom, scope: &FocusScope, start: Option<NodeId>) -> Option<NodeId> {
    let mut found = find_focusable_element_internal(dom, FocusType::Forward, scope, start);
    while let Some(candidate) = found {
        if is_shadow_host_delegates_focus(dom, candidate) {
            if dom.tab_index(candidate) >= 0 && is_shadow_host_without_custom_focus_logic(dom, candidate) {
                if let Some(inner) = FocusScope::owned_by_shadow_host(dom, candidate) {
                    if let Some(inside) = find_focusable_element_recursively_forward(dom, &inner, None) {
                        return Some(inside);
                    }
                }
            }
            // A delegating host never takes focus itself.
            found = find_focusable_element_internal(dom, FocusType::Forward, scope, Some(candidate));
            continue;
        }
        if !is_non_focusable_focus_scope_owner(dom, candidate) {
            return Some(candidate);
        }

        if let Some(inner) = FocusScope::owned_by_non_focusable_scope_owner(dom, candidate) {
            if let Some(inside) = find_focusable_element_recursively_forward(dom, &inner, None) {
                return Some(inside);
            }
        }
        found = find_focusable_element_internal(dom, FocusType::Forward, scope, Some(candidate));
    }
    None
}

/// `start` is exclusive.
fn find_focusable_element_recursively_backward(dom: &Dom, scope: &FocusScope, start: Option<NodeId>) -> Option<NodeId> {
    let mut found = find_focusable_element_internal(dom, FocusType::Backward, scope, start);
    while let Some(candidate) = found {
        // A focusable host comes after its shadow content when going back.
        if is_keyboard_focusable_shadow_host(dom, candidate) {
            if let Some(inner) = FocusScope::owned_by_shadow_host(dom, candidate) {
                if let Some(inside) = find_focusable_element_recursively_backward(dom, &inner, None) {
                    return Some(inside);
                }
            }
            if is_shadow_host_delegates_focus(dom, candidate) {
                found = find_focusable_element_internal(dom, FocusType::Backward, scope, Some(candidate));
                continue;
            }
            return Some(candidate);
        }

        // Negative tab index on a delegating host hides its whole shadow tree.
        if is_shadow_host_delegates_focus(dom, candidate) && dom.tab_index(candidate) < 0 {
            found = find_focusable_element_internal(dom, FocusType::Backward, scope, Some(candidate));
            continue;
        }

        if is_non_focusable_focus_scope_owner(dom, candidate) {
            if let Some(inner) = FocusScope::owned_by_non_focusable_scope_owner(dom, candidate) {
                if let Some(inside) = find_focusable_element_recursively_backward(dom, &inner, None) {
                    return Some(inside);
                }
            }
            found = find_focusable_element_internal(dom, FocusType::Backward, scope, Some(candidate));
            continue;
        }
        if !is_shadow_host_delegates_focus(dom, candidate) {
            return Some(candidate);
        }
        found = find_focusable_element_internal(dom, FocusType::Backward, scope, Some(candidate));
    }
    None
}

/// Next (or previous) focusable element inside `scope` and the scopes it
/// owns, without climbing out of `scope`. `start` is exclusive.
pub fn find_focusable_element_recursively(
    dom: &Dom,
    direction: FocusType,
    scope: &FocusScope,
    start: Option<NodeId>,
) -> Option<NodeId> {
    match direction {
        FocusType::Forward => find_focusable_element_recursively_forward(dom, scope, start),
        _ => find_focusable_element_recursively_backward(dom, scope, start),
    }
}

/// Replaces a frame owner candidate with the first focusable element of its
/// local content document, repeatedly. Stops at the deepest element found;
/// a frame owner whose content yields nothing is itself the destination.
pub fn find_focusable_element_descending_down_into_frame_document(
    dom: &Dom,
    direction: FocusType,
    element: Option<NodeId>,
) -> Option<NodeId> {
    let mut element = element;
    while let Some(current) = element {
        if !dom.is_frame_owner_element(current) {
            break;
        }
        let Some(inner) = FocusScope::owned_by_iframe(dom, current) else {
            break;
        };
        let Some(found) = find_focusable_element_recursively(dom, direction, &inner, None) else {
            break;
        };
        debug_assert_ne!(found, current);
        element = Some(found);
    }
    element
}

fn find_focusable_element_across_focus_scopes_forward(
    dom: &Dom,
    scope: &FocusScope,
    current: Option<NodeId>,
) -> Option<NodeId> {
    // Any shadow host start, focusable or not, enters its own scope first.
    let mut found = match current {
        Some(host) if is_shadow_host_without_custom_focus_logic(dom, host) => {
            FocusScope::owned_by_shadow_host(dom, host)
                .and_then(|inner| find_focusable_element_recursively_forward(dom, &inner, None))
                .or_else(|| find_focusable_element_recursively_forward(dom, scope, current))
        }
        _ => find_focusable_element_recursively_forward(dom, scope, current),
    };

    // Climb out through scope owners until something turns up.
    let mut current_scope = *scope;
    while found.is_none() {
        let Some(owner) = current_scope.owner(dom) else {
            break;
        };
        current_scope = FocusScope::of_element(dom, owner);
        found = find_focusable_element_recursively_forward(dom, &current_scope, Some(owner));
    }
    find_focusable_element_descending_down_into_frame_document(dom, FocusType::Forward, found)
}

fn find_focusable_element_across_focus_scopes_backward(
    dom: &Dom,
    scope: &FocusScope,
    current: Option<NodeId>,
) -> Option<NodeId> {
    // Shadow content sits after its host, so a host start looks before it.
    let mut found = find_focusable_element_recursively_backward(dom, scope, current);

    let mut current_scope = *scope;
    while found.is_none() {
        let Some(owner) = current_scope.owner(dom) else {
            break;
        };
        current_scope = FocusScope::of_element(dom, owner);
        if is_keyboard_focusable_shadow_host(dom, owner) && !is_shadow_host_delegates_focus(dom, owner) {
            found = Some(owner);
            break;
        }
        found = find_focusable_element_recursively_backward(dom, &current_scope, Some(owner));
    }
    find_focusable_element_descending_down_into_frame_document(dom, FocusType::Backward, found)
}

/// Next (or previous) focusable element after `current`, climbing out of
/// exhausted scopes and descending into local frames. `None` means the
/// frame's tabbing order is exhausted; wrapping is left to the caller.
pub fn find_focusable_element_across_focus_scopes(
    dom: &Dom,
    direction: FocusType,
    scope: &FocusScope,
    current: Option<NodeId>,
) -> Option<NodeId> {
    match direction {
        FocusType::Forward => find_focusable_element_across_focus_scopes_forward(dom, scope, current),
        _ => find_focusable_element_across_focus_scopes_backward(dom, scope, current),
    }
}

pub fn find_focusable_element(dom: &Dom, direction: FocusType, element: NodeId) -> Option<NodeId> {
    debug_assert!(direction.is_sequential());
    find_focusable_element_across_focus_scopes(dom, direction, &FocusScope::of_element(dom, element), Some(element))
}

/// First focusable element in the shadow tree of `host`, used when a
/// delegating host is asked to take focus.
pub fn find_focusable_element_in_shadow_host(dom: &Dom, host: NodeId) -> Option<NodeId> {
    debug_assert!(dom.author_shadow_root(host).is_some());
    let scope = FocusScope::owned_by_shadow_host(dom, host)?;
    find_focusable_element_across_focus_scopes(dom, FocusType::Forward, &scope, None)
}

/// Turns a non-element starting node into an exclusive start element: the
/// preceding element when moving forward, the following one when moving
/// backward.
pub fn adjust_to_element(dom: &Dom, node: Option<NodeId>, direction: FocusType) -> Option<NodeId> {
    debug_assert!(direction.is_sequential());
    let node = node?;
    if dom.is_element(node) {
        return Some(node);
    }
    match direction {
        FocusType::Forward => dom.previous_element(node),
        _ => dom.next_element(node),
    }
}
