//! Directional (arrow key) navigation.
//!
//! Candidates are scored by distance from the starting rect along the
//! direction of travel, following the WICD focus handling heuristic.
//! Navigation works one container at a time, where a container is a
//! scrollable box or a frame's document, and climbs outward until a
//! container consumes the move by focusing something or scrolling.

use super::{FocusParams, FocusType, SelectionBehaviorOnFocus};
use crate::dom::{FrameId, NodeId};
use crate::geometry::{Point, Rect};
use crate::page::Page;

/// Shrink applied to overlapping rects so that touching edges do not count
/// as overlap.
const FUDGE_FACTOR: f64 = 2.0;

const MAX_DISTANCE: f64 = f64::MAX;

#[derive(Debug, Clone)]
struct FocusCandidate {
    visible_node: Option<NodeId>,
    focusable_node: Option<NodeId>,
    enclosing_scrollable_box: Option<NodeId>,
    distance: f64,
    rect: Rect,
    is_offscreen: bool,
    is_offscreen_after_scrolling: bool,
}

impl FocusCandidate {
    /// The starting point of a search: the focused element, if any, at
    /// `rect`.
    fn origin(rect: Rect, focused: Option<NodeId>) -> Self {
        Self {
            visible_node: focused,
            focusable_node: focused,
            enclosing_scrollable_box: None,
            distance: MAX_DISTANCE,
            rect,
            is_offscreen: true,
            is_offscreen_after_scrolling: true,
        }
    }

    fn new(page: &Page, element: NodeId, direction: FocusType) -> Option<Self> {
        if !page.dom.is_rendered(element) {
            return None;
        }
        Some(Self {
            visible_node: Some(element),
            focusable_node: Some(element),
            enclosing_scrollable_box: None,
            distance: MAX_DISTANCE,
            rect: page.absolute_rect(element),
            is_offscreen: page.has_offscreen_rect(element, None),
            is_offscreen_after_scrolling: page.has_offscreen_rect(element, Some(direction)),
        })
    }
}

/// Whether `a` lies below `b`. Overlapping rects count when both of `a`'s
/// vertical edges are below `b`'s.
fn below(a: &Rect, b: &Rect) -> bool {
    a.y >= b.max_y() || (a.y >= b.y && a.max_y() > b.max_y() && a.x < b.max_x() && a.max_x() > b.x)
}

fn right_of(a: &Rect, b: &Rect) -> bool {
    a.x >= b.max_x() || (a.x >= b.x && a.max_x() > b.max_x() && a.y < b.max_y() && a.max_y() > b.y)
}

fn is_rect_in_direction(direction: FocusType, current: &Rect, target: &Rect) -> bool {
    match direction {
        FocusType::Left => right_of(current, target),
        FocusType::Right => right_of(target, current),
        FocusType::Up => below(current, target),
        FocusType::Down => below(target, current),
        _ => false,
    }
}

fn deflate_if_overlapped(a: &mut Rect, b: &mut Rect) {
    if !a.intersects(b) || a.contains_rect(b) || b.contains_rect(a) {
        return;
    }
    let deflate = -FUDGE_FACTOR;
    // Never deflate into a negative size.
    if a.width + 2.0 * deflate > 0.0 && a.height + 2.0 * deflate > 0.0 {
        *a = a.inflate(deflate);
    }
    if b.width + 2.0 * deflate > 0.0 && b.height + 2.0 * deflate > 0.0 {
        *b = b.inflate(deflate);
    }
}

/// Closest pair of points between the two rects along `direction`: where
/// navigation leaves `starting` and where it enters `potential`.
fn entry_and_exit_points(direction: FocusType, starting: &Rect, potential: &Rect) -> (Point, Point) {
    let mut exit = Point::default();
    let mut entry = Point::default();

    match direction {
        FocusType::Left => {
            exit.x = starting.x;
            entry.x = if potential.max_x() < starting.x {
                potential.max_x()
            } else {
                starting.x
            };
        }
        FocusType::Up => {
            exit.y = starting.y;
            entry.y = if potential.max_y() < starting.y {
                potential.max_y()
            } else {
                starting.y
            };
        }
        FocusType::Right => {
            exit.x = starting.max_x();
            entry.x = if potential.x > starting.max_x() {
                potential.x
            } else {
                starting.max_x()
            };
        }
        FocusType::Down => {
            exit.y = starting.max_y();
            entry.y = if potential.y > starting.max_y() {
                potential.y
            } else {
                starting.max_y()
            };
        }
        _ => {}
    }

    match direction {
        FocusType::Left | FocusType::Right => {
            if below(starting, potential) {
                exit.y = starting.y;
                entry.y = if potential.max_y() < starting.y {
                    potential.max_y()
                } else {
                    starting.y
                };
            } else if below(potential, starting) {
                exit.y = starting.max_y();
                entry.y = if potential.y > starting.max_y() {
                    potential.y
                } else {
                    starting.max_y()
                };
            } else {
                exit.y = starting.y.max(potential.y);
                entry.y = exit.y;
            }
        }
        FocusType::Up | FocusType::Down => {
            if right_of(starting, potential) {
                exit.x = starting.x;
                entry.x = if potential.max_x() < starting.x {
                    potential.max_x()
                } else {
                    starting.x
                };
            } else if right_of(potential, starting) {
                exit.x = starting.max_x();
                entry.x = if potential.x > starting.max_x() {
                    potential.x
                } else {
                    starting.max_x()
                };
            } else {
                exit.x = starting.x.max(potential.x);
                entry.x = exit.x;
            }
        }
        _ => {}
    }

    (exit, entry)
}

/// Zero-width rect on the edge of `rect` that navigation in `direction`
/// starts from when nothing inside is focused.
fn virtual_rect_for_direction(direction: FocusType, rect: Rect) -> Rect {
    let mut virtual_rect = rect;
    match direction {
        FocusType::Left => {
            virtual_rect.x = rect.max_x();
            virtual_rect.width = 0.0;
        }
        FocusType::Up => {
            virtual_rect.y = rect.max_y();
            virtual_rect.height = 0.0;
        }
        FocusType::Right => virtual_rect.width = 0.0,
        FocusType::Down => virtual_rect.height = 0.0,
        _ => {}
    }
    virtual_rect
}

fn distance(direction: FocusType, current: &Rect, candidate: &Rect) -> f64 {
    let mut current = *current;
    let mut candidate = *candidate;
    deflate_if_overlapped(&mut current, &mut candidate);
    if !is_rect_in_direction(direction, &current, &candidate) {
        return MAX_DISTANCE;
    }

    let (exit, entry) = entry_and_exit_points(direction, &current, &candidate);
    let x_axis = exit.x - entry.x;
    let y_axis = exit.y - entry.y;
    let (navigation_axis, orthogonal_axis) = match direction {
        FocusType::Left | FocusType::Right => (x_axis.abs(), y_axis.abs()),
        _ => (y_axis.abs(), x_axis.abs()),
    };

    let euclidian = (x_axis * x_axis + y_axis * y_axis).sqrt();
    let intersection = current.intersection(&candidate);
    let overlap = intersection.width * intersection.height;
    euclidian + navigation_axis + orthogonal_axis * 2.0 - overlap.sqrt()
}

impl Page {
    /// Box of `node` in its own document's coordinates, after scrolling of
    /// enclosing boxes in that document.
    fn document_rect(&self, node: NodeId) -> Rect {
        let Some(element) = self.dom.element(node) else {
            return Rect::default();
        };
        let mut rect = element.layout.rect;
        let mut cursor = self.dom.parent_or_shadow_host(node);
        while let Some(ancestor) = cursor {
            if let Some(scroll) = self.dom.element(ancestor).and_then(|element| element.layout.scroll) {
                rect = rect.translate(-scroll.offset.x, -scroll.offset.y);
            }
            cursor = self.dom.parent_or_shadow_host(ancestor);
        }
        rect
    }

    /// [`Self::document_rect`] clipped by every enclosing box that clips its
    /// overflow.
    fn clipped_document_rect(&self, node: NodeId) -> Rect {
        let mut rect = self.document_rect(node);
        let mut cursor = self.dom.parent_or_shadow_host(node);
        while let Some(ancestor) = cursor {
            if let Some(layout) = self.dom.element(ancestor).map(|element| &element.layout) {
                if layout.scroll.is_some() || layout.overflow_hidden {
                    let origin = self.document_rect(ancestor).origin();
                    let size = layout.scroll.map_or(layout.rect.size(), |scroll| scroll.client);
                    rect = rect.intersection(&Rect::from_origin_size(origin, size));
                    if rect.is_empty() {
                        return rect;
                    }
                }
            }
            cursor = self.dom.parent_or_shadow_host(ancestor);
        }
        rect
    }

    /// Maps a rect in `frame`'s document coordinates up to the main
    /// document.
    fn frame_rect_to_absolute(&self, frame: FrameId, rect: Rect) -> Rect {
        let mut rect = rect;
        let mut cursor = Some(frame);
        while let Some(current) = cursor {
            if let Some(owner) = self.dom.frame_owner(current) {
                if let Some(document) = self.dom.frame_document(current) {
                    let offset = self.dom.document(document).viewport.offset;
                    rect = rect.translate(-offset.x, -offset.y);
                }
                let origin = self.document_rect(owner).origin();
                rect = rect.translate(origin.x, origin.y);
            }
            cursor = self.dom.frame_parent(current);
        }
        rect
    }

    /// Rect of `node` in main document coordinates. A document node maps to
    /// the visible part of its frame.
    pub fn absolute_rect(&self, node: NodeId) -> Rect {
        let document = self.dom.document_of(node);
        let Some(frame) = self.dom.document_frame(document) else {
            return self.document_rect(node);
        };
        if self.dom.is_document_node(node) {
            let viewport = self.dom.document(document).viewport;
            return self.frame_rect_to_absolute(frame, Rect::from_origin_size(viewport.offset, viewport.client));
        }
        if let Some(data) = self.dom.shadow_root_data(node) {
            return self.absolute_rect(data.host);
        }
        self.frame_rect_to_absolute(frame, self.document_rect(node))
    }

    /// Whether `node` lies outside its document's viewport. With a
    /// direction, the viewport first grows by one scroll step that way, so
    /// an element one scroll away counts as visible.
    fn has_offscreen_rect(&self, node: NodeId, direction: Option<FocusType>) -> bool {
        let document = self.dom.document_of(node);
        if !self
            .dom
            .document_frame(document)
            .is_some_and(|frame| self.dom.frame_has_view(frame))
        {
            return true;
        }

        let viewport = self.dom.document(document).viewport;
        let mut visible = Rect::from_origin_size(viewport.offset, viewport.client);
        let step = self.settings.scroll_step;
        match direction {
            Some(FocusType::Left) => {
                visible.x -= step;
                visible.width += step;
            }
            Some(FocusType::Right) => visible.width += step,
            Some(FocusType::Up) => {
                visible.y -= step;
                visible.height += step;
            }
            Some(FocusType::Down) => visible.height += step,
            _ => {}
        }

        let rect = self.clipped_document_rect(node);
        if rect.is_empty() {
            return true;
        }
        !visible.intersects(&rect)
    }

    fn is_scrollable_node(&self, node: NodeId) -> bool {
        self.dom
            .element(node)
            .is_some_and(|element| element.layout.scroll.is_some())
            && self.dom.has_children(node)
    }

    /// Whether `node` (a scrollable box or a document) has room to scroll
    /// in `direction`.
    pub fn can_scroll_in_direction(&self, node: NodeId, direction: FocusType) -> bool {
        let scroll = if self.dom.is_document_node(node) {
            let document = self.dom.document_of(node);
            if !self
                .dom
                .document_frame(document)
                .is_some_and(|frame| self.dom.frame_has_view(frame))
            {
                return false;
            }
            self.dom.document(document).viewport
        } else {
            if !self.is_scrollable_node(node) {
                return false;
            }
            let Some(layout) = self.dom.element(node).map(|element| &element.layout) else {
                return false;
            };
            if layout.overflow_hidden {
                return false;
            }
            let Some(scroll) = layout.scroll else {
                return false;
            };
            scroll
        };

        match direction {
            FocusType::Left => scroll.offset.x > 0.0,
            FocusType::Up => scroll.offset.y > 0.0,
            FocusType::Right => scroll.offset.x + scroll.client.width < scroll.content.width,
            FocusType::Down => scroll.offset.y + scroll.client.height < scroll.content.height,
            _ => false,
        }
    }

    /// Scrolls `container` one step in `direction`, if it can scroll.
    fn scroll_in_direction(&mut self, container: NodeId, direction: FocusType) -> bool {
        if !self.can_scroll_in_direction(container, direction) {
            return false;
        }
        let step = self.settings.scroll_step;
        let (dx, dy) = match direction {
            FocusType::Left => (-step, 0.0),
            FocusType::Right => (step, 0.0),
            FocusType::Up => (0.0, -step),
            FocusType::Down => (0.0, step),
            _ => return false,
        };

        tracing::debug!(target: "focus", node = %container, dx, dy, "scrolling for directional navigation");
        if self.dom.is_document_node(container) {
            let document = self.dom.document_of(container);
            self.dom.document_mut(document).viewport.scroll_by(dx, dy);
        } else if let Some(scroll) = self
            .dom
            .element_mut(container)
            .and_then(|element| element.layout.scroll.as_mut())
        {
            scroll.scroll_by(dx, dy);
        }
        true
    }

    /// Nearest ancestor of `node` that can scroll in `direction`, else the
    /// enclosing document. From a document this climbs into the parent
    /// frame through its owner element.
    fn scrollable_enclosing_box_or_parent_frame(&self, direction: FocusType, node: NodeId) -> Option<NodeId> {
        let mut parent = node;
        loop {
            let next = if self.dom.is_document_node(parent) {
                self.dom
                    .document_frame(self.dom.document_of(parent))
                    .and_then(|frame| self.dom.frame_owner(frame))
            } else {
                self.dom.parent_or_shadow_host(parent)
            };
            parent = next?;
            if self.can_scroll_in_direction(parent, direction) || self.dom.is_document_node(parent) {
                return Some(parent);
            }
        }
    }

    fn can_be_scrolled_into_view(&self, direction: FocusType, candidate: &FocusCandidate) -> bool {
        let Some(visible) = candidate.visible_node else {
            return false;
        };
        let mut cursor = self.dom.parent_or_shadow_host(visible);
        while let Some(parent) = cursor {
            let parent_rect = self.absolute_rect(parent);
            if !candidate.rect.intersects(&parent_rect)
                && self
                    .dom
                    .element(parent)
                    .is_some_and(|element| element.layout.overflow_hidden)
            {
                return false;
            }
            if Some(parent) == candidate.enclosing_scrollable_box {
                return self.can_scroll_in_direction(parent, direction);
            }
            cursor = self.dom.parent_or_shadow_host(parent);
        }
        true
    }

    fn containing_block(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = self.dom.parent_or_shadow_host(node);
        while let Some(current) = cursor {
            match self.dom.element(current) {
                Some(element) if !element.layout.inline => return Some(current),
                None if self.dom.is_document_node(current) => return Some(current),
                _ => cursor = self.dom.parent_or_shadow_host(current),
            }
        }
        None
    }

    /// Two inline boxes in one containing block whose rects touch, i.e.
    /// pieces of the same line of text.
    fn are_elements_on_same_line(&self, first: &FocusCandidate, second: &FocusCandidate) -> bool {
        let (Some(a), Some(b)) = (first.visible_node, second.visible_node) else {
            return false;
        };
        if !first.rect.intersects(&second.rect) {
            return false;
        }
        let inline = |node: NodeId| self.dom.element(node).is_some_and(|element| element.layout.inline);
        if !inline(a) || !inline(b) {
            return false;
        }
        self.containing_block(a) == self.containing_block(b)
    }

    fn distance_data_for_node(&self, direction: FocusType, current: &FocusCandidate, candidate: &mut FocusCandidate) {
        if self.are_elements_on_same_line(current, candidate)
            && ((direction == FocusType::Up && current.rect.y > candidate.rect.y)
                || (direction == FocusType::Down && candidate.rect.y > current.rect.y))
        {
            candidate.distance = 0.0;
            return;
        }
        candidate.distance = distance(direction, &current.rect, &candidate.rect);
    }

    fn update_focus_candidate_if_needed(
        &self,
        direction: FocusType,
        current: &FocusCandidate,
        mut candidate: FocusCandidate,
        closest: &mut Option<FocusCandidate>,
    ) {
        let Some(visible) = candidate.visible_node else {
            return;
        };

        // Frames without content or without a box are not destinations.
        if self.dom.is_frame_owner_element(visible)
            && (self.dom.content_frame(visible).is_none() || candidate.rect.is_empty())
        {
            return;
        }

        if candidate.is_offscreen && !self.can_be_scrolled_into_view(direction, &candidate) {
            return;
        }

        self.distance_data_for_node(direction, current, &mut candidate);
        if candidate.distance == MAX_DISTANCE || candidate.is_offscreen_after_scrolling {
            return;
        }

        let Some(best) = closest.as_ref() else {
            *closest = Some(candidate);
            return;
        };

        let intersection = candidate.rect.intersection(&best.rect);
        if !intersection.is_empty()
            && !self.are_elements_on_same_line(best, &candidate)
            && intersection == candidate.rect
        {
            // Overlapping boxes: whichever is painted on top wins.
            if let Some(hit) = self.hit_test(intersection.center()) {
                if self.dom.is_shadow_including_inclusive_ancestor(visible, hit) {
                    *closest = Some(candidate);
                    return;
                }
                if best
                    .visible_node
                    .is_some_and(|node| self.dom.is_shadow_including_inclusive_ancestor(node, hit))
                {
                    return;
                }
            }
        }

        if candidate.distance < best.distance {
            *closest = Some(candidate);
        }
    }

    /// Topmost rendered element under `point`, in main document
    /// coordinates. Higher z-index wins, then later paint order. Clipping
    /// is ignored.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        let document = self.dom.frame_document(self.main_frame)?;
        let mut paint_order = 0;
        let mut best = None;
        self.hit_test_within(self.dom.document_root(document), point, &mut paint_order, &mut best);
        best.map(|(_, _, node)| node)
    }

    fn hit_test_within(
        &self,
        root: NodeId,
        point: Point,
        paint_order: &mut usize,
        best: &mut Option<(i32, usize, NodeId)>,
    ) {
        for child in self.dom.children(root) {
            let Some(element) = self.dom.element(child) else {
                continue;
            };
            if element.has_attribute("hidden") {
                continue;
            }
            *paint_order += 1;
            if self.absolute_rect(child).contains_point(point) {
                let key = (element.layout.z_index, *paint_order);
                if best.map_or(true, |(z, order, _)| key > (z, order)) {
                    *best = Some((key.0, key.1, child));
                }
            }
            for shadow_root in self.dom.shadow_roots(child) {
                self.hit_test_within(*shadow_root, point, paint_order, best);
            }
            if let Some(document) = self
                .dom
                .content_frame(child)
                .and_then(|frame| self.dom.frame_document(frame))
            {
                self.hit_test_within(self.dom.document_root(document), point, paint_order, best);
            }
            if self.dom.renders_light_children(child) {
                self.hit_test_within(child, point, paint_order, best);
            }
        }
    }

    fn find_focus_candidate_in_container(
        &self,
        container: NodeId,
        starting_rect: Rect,
        direction: FocusType,
    ) -> Option<FocusCandidate> {
        let focused = self
            .focused_frame()
            .and_then(|frame| self.dom.frame_document(frame))
            .and_then(|document| self.dom.focused_element(document));
        let current = FocusCandidate::origin(starting_rect, focused);

        let mut closest = None;
        let mut cursor = self.dom.first_element_within(container);
        while let Some(element) = cursor {
            // Frames and scrollers are searched as containers of their own.
            let opaque =
                self.dom.is_frame_owner_element(element) || self.can_scroll_in_direction(element, direction);
            cursor = if opaque {
                self.dom
                    .next_element_skipping_children(element, Some(container))
            } else {
                self.dom.next_element_within(element, Some(container))
            };

            if Some(element) == focused || (!self.dom.is_keyboard_focusable(element) && !opaque) {
                continue;
            }
            let Some(mut candidate) = FocusCandidate::new(self, element, direction) else {
                continue;
            };
            candidate.enclosing_scrollable_box = Some(container);
            self.update_focus_candidate_if_needed(direction, &current, candidate, &mut closest);
        }
        closest
    }

    /// The focused element's rect as a starting point, or an empty rect when
    /// nothing visible is focused.
    fn focused_starting_rect(&self) -> Rect {
        let frame = self.focused_or_main_frame();
        self.dom
            .frame_document(frame)
            .and_then(|document| self.dom.focused_element(document))
            .filter(|focused| !self.has_offscreen_rect(*focused, None))
            .map(|focused| self.absolute_rect(focused))
            .unwrap_or_default()
    }

    fn advance_focus_directionally_in_container(
        &mut self,
        container: NodeId,
        starting_rect: Rect,
        direction: FocusType,
    ) -> bool {
        let starting_rect = if starting_rect.is_empty() {
            virtual_rect_for_direction(direction, self.absolute_rect(container))
        } else {
            starting_rect
        };

        let Some(candidate) = self.find_focus_candidate_in_container(container, starting_rect, direction) else {
            // Nothing to focus here; scroll instead, or let the caller move
            // on to the enclosing container.
            return self.scroll_in_direction(container, direction);
        };
        let (Some(visible), Some(focusable)) = (candidate.visible_node, candidate.focusable_node) else {
            return false;
        };

        if let Some(document) = self
            .dom
            .content_frame(visible)
            .and_then(|frame| self.dom.frame_document(frame))
        {
            // Step into the frame, and look further out if it had nothing.
            let rect = self.focused_starting_rect();
            let root = self.dom.document_root(document);
            if !self.advance_focus_directionally_in_container(root, rect, direction) {
                let rect = self.absolute_rect(visible);
                return self.advance_focus_directionally_in_container(container, rect, direction);
            }
            return true;
        }

        if self.can_scroll_in_direction(visible, direction) {
            let rect = self.focused_starting_rect();
            return self.advance_focus_directionally_in_container(visible, rect, direction);
        }

        self.focus_element(focusable, FocusParams::new(SelectionBehaviorOnFocus::Reset, direction));
        true
    }

    pub fn advance_focus_directionally(&mut self, direction: FocusType) -> bool {
        debug_assert!(direction.is_directional());
        // Hit testing needs the main frame's layout.
        if self.dom.is_remote_frame(self.main_frame) {
            tracing::debug!(target: "focus", %direction, "directional navigation needs a local main frame");
            return false;
        }
        let frame = self.focused_or_main_frame();
        let Some(document) = self.dom.frame_document(frame) else {
            return false;
        };

        let mut container = self.dom.document_root(document);
        let mut starting_rect = Rect::default();
        if let Some(focused) = self.dom.focused_element(document) {
            if !self.has_offscreen_rect(focused, None) {
                if let Some(enclosing) = self.scrollable_enclosing_box_or_parent_frame(direction, focused) {
                    container = enclosing;
                }
                starting_rect = self.absolute_rect(focused);
            }
        }

        let mut container = Some(container);
        while let Some(current) = container {
            if self.advance_focus_directionally_in_container(current, starting_rect, direction) {
                return true;
            }
            starting_rect = self.absolute_rect(current);
            container = self.scrollable_enclosing_box_or_parent_frame(direction, current);
        }
        false
    }
}
