use std::rc::Rc;

use frontier_focus::focus::FocusType;
use frontier_focus::{load_page_with_client, ClientCall, FocusSettings, Page, RecordingClient};

fn page_with_client(html: &str) -> (Page, Rc<RecordingClient>) {
    let client = Rc::new(RecordingClient::new());
    let page = load_page_with_client(html, FocusSettings::default(), client.clone()).unwrap();
    (page, client)
}

fn focused_id(page: &Page) -> Option<String> {
    let frame = page.focused_frame()?;
    let document = page.dom().frame_document(frame)?;
    let node = page.dom().focused_element(document)?;
    page.dom().element(node)?.id().map(str::to_string)
}

/// Tab walks into a local subframe and back out to the parent document
#[test]
fn test_tab_through_local_frame() {
    let (mut page, _client) = page_with_client(
        r#"
        <button id="a"></button>
        <iframe id="frame" srcdoc="<button id='x'></button><button id='y'></button>"></iframe>
        <button id="b"></button>
        "#,
    );
    let frame = page
        .dom()
        .content_frame(page.element_by_id("frame").unwrap())
        .unwrap();

    let mut order = Vec::new();
    let mut frames = Vec::new();
    for _ in 0..5 {
        assert!(page.advance_focus(FocusType::Forward, false));
        order.push(focused_id(&page).unwrap());
        frames.push(page.focused_frame().unwrap());
    }
    assert_eq!(order, ["a", "x", "y", "b", "a"]);
    assert_eq!(frames[1], frame);
    assert_eq!(frames[3], page.main_frame());

    // Leaving the frame cleared its focused element.
    let child_document = page.dom().frame_document(frame).unwrap();
    assert_eq!(page.dom().focused_element(child_document), None);
}

/// Shift+Tab from after a frame enters it at its last element
#[test]
fn test_backward_into_local_frame() {
    let (mut page, _client) = page_with_client(
        r#"
        <iframe id="frame" srcdoc="<button id='x'></button><button id='y'></button>"></iframe>
        <button id="b"></button>
        "#,
    );
    let b = page.element_by_id("b").unwrap();
    assert!(page.focus_element(b, Default::default()));
    assert!(page.advance_focus(FocusType::Backward, false));
    assert_eq!(focused_id(&page).as_deref(), Some("y"));
}

/// An empty frame takes focus itself instead of an element
#[test]
fn test_empty_frame_takes_focus() {
    let (mut page, client) = page_with_client(
        r#"
        <button id="a"></button>
        <iframe id="frame" srcdoc="<p>nothing to focus</p>"></iframe>
        "#,
    );
    let frame = page
        .dom()
        .content_frame(page.element_by_id("frame").unwrap())
        .unwrap();
    let a = page.element_by_id("a").unwrap();
    assert!(page.focus_element(a, Default::default()));
    client.take_calls();

    assert!(page.advance_focus(FocusType::Forward, false));
    assert_eq!(page.focused_frame(), Some(frame));
    assert_eq!(focused_id(&page), None);
    assert!(client.calls().contains(&ClientCall::FrameFocused(frame)));
}

/// A remote child frame is handed the navigation and gives it back
/// through the owner element
#[test]
fn test_remote_child_frame_round_trip() {
    let (mut page, client) = page_with_client(
        r#"
        <button id="a"></button>
        <iframe id="remote" data-remote></iframe>
        <button id="b"></button>
        "#,
    );
    let main = page.main_frame();
    let remote = page
        .dom()
        .content_frame(page.element_by_id("remote").unwrap())
        .unwrap();
    let a = page.element_by_id("a").unwrap();
    assert!(page.focus_element(a, Default::default()));
    client.take_calls();

    assert!(page.advance_focus(FocusType::Forward, false));
    assert_eq!(page.focused_frame(), None);
    assert_eq!(page.focus_controller().focused_frame(), Some(remote));
    let calls = client.take_calls();
    assert!(calls.contains(&ClientCall::FocusedNodeChanged(Some(a), None)));
    assert!(calls.contains(&ClientCall::AdvanceFocusInRemoteFrame {
        remote,
        direction: FocusType::Forward,
        source: main,
    }));

    // The remote frame ran out of elements and continues here.
    assert!(page.advance_focus_across_frames(FocusType::Forward, remote, main));
    assert_eq!(focused_id(&page).as_deref(), Some("b"));
}

/// A local subframe of a remote main frame hands off to the remote parent
/// when it runs out of elements
#[test]
fn test_local_frame_under_remote_main_frame() {
    let client = Rc::new(RecordingClient::new());
    let mut page = Page::with_remote_main_frame(FocusSettings::default(), client.clone());
    let main = page.main_frame();
    let local = page.dom_mut().create_local_frame(Some(main), None);
    let document = page.dom().frame_document(local).unwrap();
    let root = page.dom().document_root(document);
    let button = page.dom_mut().create_element(document, "button");
    page.dom_mut().append_child(root, button);

    assert!(page.advance_focus(FocusType::Forward, false));
    assert_eq!(page.dom().focused_element(document), Some(button));
    client.take_calls();

    assert!(page.advance_focus(FocusType::Forward, false));
    assert_eq!(page.dom().focused_element(document), None);
    assert!(client.calls().contains(&ClientCall::AdvanceFocusInRemoteFrame {
        remote: main,
        direction: FocusType::Forward,
        source: local,
    }));
}

/// Removing the focused frame's owner forgets the focused frame
#[test]
fn test_removing_frame_owner_forgets_focused_frame() {
    let (mut page, _client) = page_with_client(
        r#"<iframe id="frame" srcdoc="<button id='x'></button>"></iframe>"#,
    );
    assert!(page.advance_focus(FocusType::Forward, false));
    assert_eq!(focused_id(&page).as_deref(), Some("x"));

    let owner = page.element_by_id("frame").unwrap();
    page.remove_node(owner);
    assert_eq!(page.focused_frame(), None);
    assert_eq!(page.focused_or_main_frame(), page.main_frame());
}

/// Document focus follows the focused frame and the page's own state
#[test]
fn test_document_focus_follows_frames() {
    let (mut page, _client) = page_with_client(
        r#"<iframe id="frame" srcdoc="<button id='x'></button>"></iframe>"#,
    );
    let main_document = page.main_document().unwrap();
    page.set_active(true);
    page.set_focused(true);
    assert!(page.is_document_focused(main_document));

    assert!(page.advance_focus(FocusType::Forward, false));
    let frame = page.focused_frame().unwrap();
    let child_document = page.dom().frame_document(frame).unwrap();
    assert!(page.is_document_focused(child_document));
    assert!(page.is_document_focused(main_document));

    page.set_focused(false);
    assert!(!page.is_document_focused(child_document));
}

/// Detaching the focused frame directly also forgets it
#[test]
fn test_detaching_focused_frame_forgets_it() {
    let (mut page, _client) = page_with_client(
        r#"<iframe id="frame" srcdoc="<button id='x'></button>"></iframe>"#,
    );
    assert!(page.advance_focus(FocusType::Forward, false));
    let frame = page.focused_frame().unwrap();
    assert_ne!(frame, page.main_frame());

    page.detach_frame(frame);
    assert!(page.dom().is_frame_detached(frame));
    assert_eq!(page.focused_frame(), None);
    assert_eq!(page.focus_controller().focused_frame(), None);
}
