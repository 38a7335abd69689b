use std::rc::Rc;

use frontier_focus::focus::{
    EventTarget, FocusEvent, FocusEventType, FocusParams, FocusType, SelectionBehaviorOnFocus,
};
use frontier_focus::{load_page_with_client, ClientCall, FocusSettings, NodeId, Page, RecordingClient};

fn focused_page(html: &str) -> (Page, Rc<RecordingClient>) {
    let client = Rc::new(RecordingClient::new());
    let mut page = load_page_with_client(html, FocusSettings::default(), client.clone()).unwrap();
    page.set_active(true);
    page.set_focused(true);
    page.take_event_log();
    client.take_calls();
    (page, client)
}

fn element_events(page: &mut Page) -> Vec<(FocusEventType, NodeId)> {
    page.take_event_log()
        .into_iter()
        .filter_map(|event| match event.target {
            EventTarget::Element(node) => Some((event.event_type, node)),
            EventTarget::Window(_) => None,
        })
        .collect()
}

/// Blur-side events on the old element precede focus-side events on the
/// new one
#[test]
fn test_event_order_on_focus_change() {
    let (mut page, client) = focused_page(r#"<button id="a"></button><button id="b"></button>"#);
    let a = page.element_by_id("a").unwrap();
    let b = page.element_by_id("b").unwrap();
    assert!(page.focus_element(a, FocusParams::default()));
    page.take_event_log();
    client.take_calls();

    let params = FocusParams::new(SelectionBehaviorOnFocus::Reset, FocusType::Forward);
    assert!(page.focus_element(b, params));
    assert_eq!(
        element_events(&mut page),
        [
            (FocusEventType::Blur, a),
            (FocusEventType::FocusOut, a),
            (FocusEventType::DomFocusOut, a),
            (FocusEventType::Focus, b),
            (FocusEventType::FocusIn, b),
            (FocusEventType::DomFocusIn, b),
        ]
    );
    assert!(client.calls().contains(&ClientCall::FocusedNodeChanged(Some(a), Some(b))));
}

/// Events carry the related element and the kind of navigation
#[test]
fn test_events_carry_related_target_and_type() {
    let (mut page, _client) = focused_page(r#"<button id="a"></button><button id="b"></button>"#);
    let a = page.element_by_id("a").unwrap();
    let b = page.element_by_id("b").unwrap();
    assert!(page.focus_element(a, FocusParams::default()));
    page.take_event_log();

    assert!(page.advance_focus(FocusType::Forward, false));
    let log = page.take_event_log();
    let blur = log
        .iter()
        .find(|event| event.event_type == FocusEventType::Blur)
        .unwrap();
    assert_eq!(blur.related_target, Some(b));
    assert_eq!(blur.focus_type, FocusType::Forward);
    let focus = log
        .iter()
        .find(|event| event.event_type == FocusEventType::Focus)
        .unwrap();
    assert_eq!(focus.related_target, Some(a));
}

/// A blur listener that moves focus elsewhere wins over the original
/// request
#[test]
fn test_blur_listener_redirects_focus() {
    let (mut page, _client) = focused_page(
        r#"<button id="a"></button><button id="b"></button><button id="c"></button>"#,
    );
    let a = page.element_by_id("a").unwrap();
    let b = page.element_by_id("b").unwrap();
    let c = page.element_by_id("c").unwrap();
    assert!(page.focus_element(a, FocusParams::default()));

    page.add_event_listener(
        EventTarget::Element(a),
        FocusEventType::Blur,
        Rc::new(move |page: &mut Page, _event: &FocusEvent| {
            page.focus_element(c, FocusParams::default());
        }),
    );

    assert!(!page.focus_element(b, FocusParams::default()));
    let document = page.main_document().unwrap();
    assert_eq!(page.dom().focused_element(document), Some(c));
    assert!(!element_events(&mut page).contains(&(FocusEventType::Focus, b)));
}

/// A focus listener that removes its element makes the change fail
#[test]
fn test_focus_listener_detaching_target() {
    let (mut page, _client) = focused_page(r#"<button id="a"></button><button id="b"></button>"#);
    let b = page.element_by_id("b").unwrap();

    page.add_event_listener(
        EventTarget::Element(b),
        FocusEventType::Focus,
        Rc::new(move |page: &mut Page, _event: &FocusEvent| {
            page.remove_node(b);
        }),
    );

    assert!(!page.focus_element(b, FocusParams::default()));
    let document = page.main_document().unwrap();
    assert_eq!(page.dom().focused_element(document), None);
    assert!(!element_events(&mut page).contains(&(FocusEventType::FocusIn, b)));
}

/// An unfocused page changes focus silently
#[test]
fn test_unfocused_page_fires_no_element_events() {
    let client = Rc::new(RecordingClient::new());
    let mut page = load_page_with_client(
        r#"<button id="a"></button>"#,
        FocusSettings::default(),
        client,
    )
    .unwrap();
    let a = page.element_by_id("a").unwrap();
    assert!(page.focus_element(a, FocusParams::default()));
    assert!(element_events(&mut page).is_empty());
    assert!(page.dom().element(a).unwrap().matches_focus());
}

/// Losing and regaining OS focus blurs and refocuses the focused element
/// along with its window
#[test]
fn test_page_focus_round_trip() {
    let (mut page, _client) = focused_page(r#"<button id="a"></button>"#);
    let a = page.element_by_id("a").unwrap();
    assert!(page.focus_element(a, FocusParams::default()));
    page.take_event_log();

    page.set_focused(false);
    let log = page.take_event_log();
    let kinds: Vec<_> = log.iter().map(|event| event.event_type).collect();
    assert_eq!(
        kinds,
        [
            FocusEventType::Blur,
            FocusEventType::FocusOut,
            FocusEventType::DomFocusOut,
            FocusEventType::Blur,
        ]
    );
    assert_eq!(log[3].target, EventTarget::Window(page.main_frame()));
    assert!(!page.dom().element(a).unwrap().matches_focus());

    page.set_focused(true);
    let kinds: Vec<_> = page
        .take_event_log()
        .iter()
        .map(|event| event.event_type)
        .collect();
    assert_eq!(
        kinds,
        [
            FocusEventType::Focus,
            FocusEventType::Focus,
            FocusEventType::FocusIn,
            FocusEventType::DomFocusIn,
        ]
    );
    assert!(page.dom().element(a).unwrap().matches_focus());
}

/// While loading is deferred, OS focus changes dispatch nothing
#[test]
fn test_deferred_loading_suppresses_events() {
    let (mut page, _client) = focused_page(r#"<button id="a"></button>"#);
    page.set_defers_loading(true);
    page.set_focused(false);
    assert!(page.event_log().is_empty());
}

/// Activation changes reach the embedder
#[test]
fn test_activation_reaches_embedder() {
    let (mut page, client) = focused_page(r#"<button id="a"></button>"#);
    page.set_active(false);
    page.set_active(false);
    assert_eq!(client.take_calls(), [ClientCall::PageActivationChanged(false)]);
}

/// Moving focus out of a text field drops its selection
#[test]
fn test_text_field_selection_cleared_on_focus_change() {
    let (mut page, _client) = focused_page(r#"<input id="field"><button id="b"></button>"#);
    let field = page.element_by_id("field").unwrap();
    let b = page.element_by_id("b").unwrap();
    let reset = FocusParams::new(SelectionBehaviorOnFocus::Reset, FocusType::None);
    assert!(page.focus_element(field, reset));
    let frame = page.main_frame();
    assert_eq!(page.dom().frame(frame).selection.anchor, Some(field));

    assert!(page.focus_element(b, reset));
    assert_eq!(page.dom().frame(frame).selection.anchor, None);
}
