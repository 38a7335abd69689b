//! Linear tab-index scans over the preorder of one focus scope.
//!
//! Every scan is inclusive of its start element. Exclusive starts are the
//! caller's job.

use super::scope::{adjusted_tab_index, should_visit, FocusScope};
use super::FocusType;
use crate::dom::{Dom, NodeId};

/// One above the largest tab index authors can meaningfully set.
const TAB_INDEX_CEILING: i32 = i16::MAX as i32 + 1;

pub fn find_element_with_exact_tab_index(
    dom: &Dom,
    start: Option<NodeId>,
    tab_index: i32,
    direction: FocusType,
) -> Option<NodeId> {
    let mut cursor = start;
    while let Some(element) = cursor {
        if should_visit(dom, element) && adjusted_tab_index(dom, element) == tab_index {
            return Some(element);
        }
        cursor = match direction {
            FocusType::Forward => dom.next_element(element),
            _ => dom.previous_element(element),
        };
    }
    None
}

/// Lowest adjusted tab index above `tab_index` from `start` to the end of
/// the scope; the earliest element wins a tie.
pub fn next_element_with_greater_tab_index(dom: &Dom, start: Option<NodeId>, tab_index: i32) -> Option<NodeId> {
    let mut winning_tab_index = TAB_INDEX_CEILING;
    let mut winner = None;
    let mut cursor = start;
    while let Some(element) = cursor {
        let current = adjusted_tab_index(dom, element);
        if should_visit(dom, element) && current > tab_index && current < winning_tab_index {
            winner = Some(element);
            winning_tab_index = current;
        }
        cursor = dom.next_element(element);
    }
    winner
}

/// Highest positive adjusted tab index below `tab_index`, scanning
/// backward from `start`; the latest element in document order wins a tie.
pub fn previous_element_with_lower_tab_index(dom: &Dom, start: Option<NodeId>, tab_index: i32) -> Option<NodeId> {
    let mut winning_tab_index = 0;
    let mut winner = None;
    let mut cursor = start;
    while let Some(element) = cursor {
        let current = adjusted_tab_index(dom, element);
        if should_visit(dom, element) && current < tab_index && current > winning_tab_index {
            winner = Some(element);
            winning_tab_index = current;
        }
        cursor = dom.previous_element(element);
    }
    winner
}

pub fn next_focusable_element(dom: &Dom, scope: &FocusScope, start: Option<NodeId>) -> Option<NodeId> {
    if let Some(start) = start {
        let tab_index = adjusted_tab_index(dom, start);
        if tab_index < 0 {
            // Outside the tabbing cycle: plain tree order decides.
            let mut cursor = dom.next_element(start);
            while let Some(element) = cursor {
                if should_visit(dom, element) && adjusted_tab_index(dom, element) >= 0 {
                    return Some(element);
                }
                cursor = dom.next_element(element);
            }
        } else if let Some(winner) =
            find_element_with_exact_tab_index(dom, dom.next_element(start), tab_index, FocusType::Forward)
        {
            return Some(winner);
        }
        if tab_index == 0 {
            // Last element of the 0 class ends the tabbing order.
            return None;
        }
    }

    let first = scope.first_element(dom);
    let threshold = start.map_or(0, |start| adjusted_tab_index(dom, start));
    if let Some(winner) = next_element_with_greater_tab_index(dom, first, threshold) {
        return Some(winner);
    }

    find_element_with_exact_tab_index(dom, first, 0, FocusType::Forward)
}

pub fn previous_focusable_element(dom: &Dom, scope: &FocusScope, start: Option<NodeId>) -> Option<NodeId> {
    let last = scope.last_element(dom);

    let (start_element, mut start_tab_index) = match start {
        Some(start) => (dom.previous_element(start), adjusted_tab_index(dom, start)),
        None => (last, 0),
    };

    if start_tab_index < 0 {
        let mut cursor = start_element;
        while let Some(element) = cursor {
            if should_visit(dom, element) && adjusted_tab_index(dom, element) >= 0 {
                return Some(element);
            }
            cursor = dom.previous_element(element);
        }
    } else if let Some(winner) =
        find_element_with_exact_tab_index(dom, start_element, start_tab_index, FocusType::Backward)
    {
        return Some(winner);
    }

    if start.is_none() || start_tab_index == 0 {
        start_tab_index = i16::MAX as i32;
    }
    previous_element_with_lower_tab_index(dom, last, start_tab_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DocumentId;

    fn document_with_tab_indices(indices: &[Option<i32>]) -> (Dom, DocumentId, Vec<NodeId>) {
        let mut dom = Dom::new();
        let frame = dom.create_local_frame(None, None);
        let document = dom.frame_document(frame).unwrap();
        let root = dom.document_root(document);
        let nodes = indices
            .iter()
            .map(|index| {
                let node = dom.create_element(document, "button");
                if let Some(index) = index {
                    dom.element_mut(node)
                        .unwrap()
                        .set_attribute("tabindex", &index.to_string());
                }
                dom.append_child(root, node);
                node
            })
            .collect();
        (dom, document, nodes)
    }

    #[test]
    fn greater_tab_index_tie_goes_to_first() {
        let (dom, document, n) = document_with_tab_indices(&[Some(3), Some(5), Some(5), Some(7)]);
        let scope = FocusScope::of_document(&dom, document);
        let first = scope.first_element(&dom);
        assert_eq!(next_element_with_greater_tab_index(&dom, first, 3), Some(n[1]));
    }

    #[test]
    fn lower_tab_index_tie_goes_to_last() {
        let (dom, document, n) = document_with_tab_indices(&[Some(2), Some(2), Some(4)]);
        let scope = FocusScope::of_document(&dom, document);
        let last = scope.last_element(&dom);
        assert_eq!(previous_element_with_lower_tab_index(&dom, last, 4), Some(n[1]));
    }

    #[test]
    fn forward_order_positive_then_zero() {
        let (dom, document, n) = document_with_tab_indices(&[None, Some(2), Some(1), None]);
        let scope = FocusScope::of_document(&dom, document);
        let mut order = Vec::new();
        let mut cursor = next_focusable_element(&dom, &scope, None);
        while let Some(element) = cursor {
            order.push(element);
            cursor = next_focusable_element(&dom, &scope, Some(element));
        }
        assert_eq!(order, vec![n[2], n[1], n[0], n[3]]);
    }

    #[test]
    fn backward_order_is_reverse_of_forward() {
        let (dom, document, n) = document_with_tab_indices(&[None, Some(2), Some(1), None]);
        let scope = FocusScope::of_document(&dom, document);
        let mut order = Vec::new();
        let mut cursor = previous_focusable_element(&dom, &scope, None);
        while let Some(element) = cursor {
            order.push(element);
            cursor = previous_focusable_element(&dom, &scope, Some(element));
        }
        assert_eq!(order, vec![n[3], n[0], n[1], n[2]]);
    }

    #[test]
    fn negative_start_continues_in_tree_order() {
        let (dom, document, n) = document_with_tab_indices(&[Some(1), Some(-1), None, Some(2)]);
        let scope = FocusScope::of_document(&dom, document);
        assert_eq!(next_focusable_element(&dom, &scope, Some(n[1])), Some(n[2]));
        assert_eq!(previous_focusable_element(&dom, &scope, Some(n[1])), Some(n[0]));
    }

    #[test]
    fn exact_scan_is_inclusive_of_start() {
        let (dom, _document, n) = document_with_tab_indices(&[None, None]);
        assert_eq!(
            find_element_with_exact_tab_index(&dom, Some(n[0]), 0, FocusType::Forward),
            Some(n[0])
        );
        assert_eq!(
            find_element_with_exact_tab_index(&dom, Some(n[1]), 0, FocusType::Backward),
            Some(n[1])
        );
    }
}
