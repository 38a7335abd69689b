//! Builds pages from HTML markup.
//!
//! Layout is not computed; boxes come from `data-*` attributes:
//!
//! - `data-rect="x y w h"`: border box in document coordinates
//! - `data-inline`, `data-z="n"`, `data-overflow="hidden"`
//! - `data-scroll="w h"`: the element scrolls content of that size, with
//!   `data-scroll-offset="x y"` as its current offset
//! - `data-custom-focus`: the element manages focus of its shadow tree
//! - on `<html>`: `data-viewport="w h"`, `data-content="w h"` and
//!   `data-scroll-offset="x y"` describe the document viewport
//!
//! `<template shadowroot="open">` becomes a shadow root of its parent
//! (`delegatesfocus` makes it delegate), `<iframe srcdoc>` a local child
//! frame and `<iframe data-remote>` a remote one.

use std::fs;
use std::path::Path;
use std::rc::Rc;

use kuchiki::traits::*;
use kuchiki::{parse_html, NodeData, NodeRef};
use thiserror::Error;

use crate::client::{ChromeClient, EmptyChromeClient};
use crate::dom::{DocumentId, Dom, FrameId, NodeId, ScrollArea};
use crate::geometry::{Point, Rect, Size};
use crate::page::Page;
use crate::settings::FocusSettings;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read page: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid {attribute} on <{tag}>: {value:?}")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        value: String,
    },
    #[error("shadow root template outside an element")]
    OrphanShadowRoot,
}

pub fn load_page(markup: &str, settings: FocusSettings) -> Result<Page, LoadError> {
    load_page_with_client(markup, settings, Rc::new(EmptyChromeClient))
}

pub fn load_page_with_client(
    markup: &str,
    settings: FocusSettings,
    client: Rc<dyn ChromeClient>,
) -> Result<Page, LoadError> {
    let mut dom = Dom::new();
    let main_frame = dom.create_local_frame(None, None);
    let mut builder = Builder { dom: &mut dom };
    builder.build_document(&parse_html().one(markup), main_frame)?;
    tracing::debug!(target: "focus", frames = dom.frames_in_preorder(main_frame).len(), "page loaded");
    Ok(Page::from_dom(dom, main_frame, settings, client))
}

pub fn load_page_from_path(
    path: &Path,
    settings: FocusSettings,
    client: Rc<dyn ChromeClient>,
) -> Result<Page, LoadError> {
    let markup = fs::read_to_string(path)?;
    load_page_with_client(&markup, settings, client)
}

struct Builder<'a> {
    dom: &'a mut Dom,
}

impl Builder<'_> {
    fn build_document(&mut self, source: &NodeRef, frame: FrameId) -> Result<(), LoadError> {
        let Some(document) = self.dom.frame_document(frame) else {
            return Ok(());
        };
        let root = self.dom.document_root(document);
        self.build_children(source, root, document, frame)?;
        self.apply_viewport(document)
    }

    fn build_children(
        &mut self,
        source: &NodeRef,
        parent: NodeId,
        document: DocumentId,
        frame: FrameId,
    ) -> Result<(), LoadError> {
        for child in source.children() {
            match child.data() {
                NodeData::Element(data) => {
                    let tag = data.name.local.to_ascii_lowercase().to_string();
                    let attributes = data.attributes.borrow();

                    if tag == "template"
                        && (attributes.contains("shadowroot") || attributes.contains("shadowrootmode"))
                    {
                        if !self.dom.is_element(parent) {
                            return Err(LoadError::OrphanShadowRoot);
                        }
                        let delegates = attributes.contains("delegatesfocus")
                            || attributes.contains("shadowrootdelegatesfocus");
                        let shadow_root = self.dom.attach_shadow(parent, delegates);
                        if let Some(contents) = &data.template_contents {
                            self.build_children(contents, shadow_root, document, frame)?;
                        }
                        continue;
                    }

                    let element = self.dom.create_element(document, &tag);
                    if let Some(target) = self.dom.element_mut(element) {
                        for (name, attribute) in attributes.map.iter() {
                            target.set_attribute(&name.local, &attribute.value);
                        }
                    }
                    self.apply_layout(element, &tag)?;
                    self.dom.append_child(parent, element);

                    if matches!(tag.as_str(), "iframe" | "frame") {
                        if let Some(srcdoc) = attributes.get("srcdoc") {
                            let child_frame = self.dom.create_local_frame(Some(frame), Some(element));
                            self.build_document(&parse_html().one(srcdoc), child_frame)?;
                        } else if attributes.contains("data-remote") {
                            self.dom.create_remote_frame(Some(frame), Some(element));
                        }
                    }
                    drop(attributes);

                    self.build_children(&child, element, document, frame)?;
                }
                NodeData::Text(text) => {
                    let text = text.borrow();
                    if !text.trim().is_empty() {
                        let node = self.dom.create_text(document, &text);
                        self.dom.append_child(parent, node);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn apply_layout(&mut self, element: NodeId, tag: &str) -> Result<(), LoadError> {
        let Some(data) = self.dom.element_mut(element) else {
            return Ok(());
        };

        if let Some(value) = data.attribute("data-rect") {
            let [x, y, width, height] = parse_numbers(tag, "data-rect", value)?;
            data.layout.rect = Rect::new(x, y, width, height);
        }
        data.layout.inline = data.has_attribute("data-inline");
        if let Some(value) = data.attribute("data-z") {
            let z_index = value
                .trim()
                .parse()
                .map_err(|_| invalid(tag, "data-z", value))?;
            data.layout.z_index = z_index;
        }
        data.layout.overflow_hidden = data
            .attribute("data-overflow")
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("hidden"));
        data.custom_focus_logic = data.has_attribute("data-custom-focus");

        if tag != "html" {
            if let Some(value) = data.attribute("data-scroll") {
                let [width, height] = parse_numbers(tag, "data-scroll", value)?;
                let mut scroll = ScrollArea::new(data.layout.rect.size(), Size::new(width, height));
                if let Some(offset) = data.attribute("data-scroll-offset") {
                    let [x, y] = parse_numbers(tag, "data-scroll-offset", offset)?;
                    scroll.scroll_by(x, y);
                }
                data.layout.scroll = Some(scroll);
            }
        }
        Ok(())
    }

    fn apply_viewport(&mut self, document: DocumentId) -> Result<(), LoadError> {
        let root = self.dom.document_root(document);
        let Some(html) = self
            .dom
            .children(root)
            .into_iter()
            .find(|child| self.dom.has_tag(*child, "html"))
        else {
            return Ok(());
        };
        let Some(data) = self.dom.element(html) else {
            return Ok(());
        };

        let mut viewport = self.dom.document(document).viewport;
        if let Some(value) = data.attribute("data-viewport") {
            let [width, height] = parse_numbers("html", "data-viewport", value)?;
            viewport.client = Size::new(width, height);
            viewport.content = viewport.client;
        }
        if let Some(value) = data.attribute("data-content") {
            let [width, height] = parse_numbers("html", "data-content", value)?;
            viewport.content = Size::new(width, height);
        }
        if let Some(value) = data.attribute("data-scroll-offset") {
            let [x, y] = parse_numbers("html", "data-scroll-offset", value)?;
            viewport.offset = Point::default();
            viewport.scroll_by(x, y);
        }
        self.dom.document_mut(document).viewport = viewport;
        Ok(())
    }
}

fn invalid(tag: &str, attribute: &str, value: &str) -> LoadError {
    LoadError::InvalidAttribute {
        tag: tag.to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

/// Parses exactly `N` numbers separated by whitespace or commas.
fn parse_numbers<const N: usize>(tag: &str, attribute: &str, value: &str) -> Result<[f64; N], LoadError> {
    let numbers = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid(tag, attribute, value))?;
    numbers
        .try_into()
        .map_err(|_| invalid(tag, attribute, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tree_with_attributes() {
        let page = load_page(
            r#"<button id="a" tabindex="2" data-rect="10 20 30 40">A</button>"#,
            FocusSettings::default(),
        )
        .unwrap();
        let button = page.element_by_id("a").unwrap();
        let data = page.dom().element(button).unwrap();
        assert_eq!(data.tab_index_attribute(), Some(2));
        assert_eq!(data.layout.rect, Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(page.dom().tag(page.dom().parent(button).unwrap()), Some("body"));
    }

    #[test]
    fn declarative_shadow_root() {
        let page = load_page(
            r#"<div id="host"><template shadowroot="open" delegatesfocus><input id="inner"></template></div>"#,
            FocusSettings::default(),
        )
        .unwrap();
        let host = page.element_by_id("host").unwrap();
        let inner = page.element_by_id("inner").unwrap();
        assert!(page.dom().delegates_focus(host));
        assert_eq!(page.dom().shadow_host(inner), Some(host));
        assert!(page.dom().children(host).is_empty());
    }

    #[test]
    fn srcdoc_and_remote_frames() {
        let page = load_page(
            r#"<iframe id="local" srcdoc="<button id='inside'></button>"></iframe><iframe id="remote" data-remote></iframe>"#,
            FocusSettings::default(),
        )
        .unwrap();
        let local = page.element_by_id("local").unwrap();
        let remote = page.element_by_id("remote").unwrap();
        let inside = page.element_by_id("inside").unwrap();
        let child = page.dom().content_frame(local).unwrap();
        assert_eq!(page.dom().document_frame(page.dom().document_of(inside)), Some(child));
        assert!(page.dom().is_remote_frame(page.dom().content_frame(remote).unwrap()));
    }

    #[test]
    fn uppercase_tags_are_lowered() {
        let page = load_page(
            r#"<DIV id="host"><TEMPLATE shadowroot="open"><BUTTON id="inner"></BUTTON></TEMPLATE></DIV><IFRAME id="frame" SRCDOC="<p>x</p>"></IFRAME>"#,
            FocusSettings::default(),
        )
        .unwrap();
        let host = page.element_by_id("host").unwrap();
        let inner = page.element_by_id("inner").unwrap();
        let frame = page.element_by_id("frame").unwrap();
        assert_eq!(page.dom().tag(host), Some("div"));
        assert_eq!(page.dom().shadow_host(inner), Some(host));
        assert!(page.dom().content_frame(frame).is_some());
    }

    #[test]
    fn viewport_from_html_element() {
        let page = load_page(
            r#"<html data-viewport="400 300" data-content="400 900" data-scroll-offset="0 100"><body></body></html>"#,
            FocusSettings::default(),
        )
        .unwrap();
        let viewport = page.dom().document(page.main_document().unwrap()).viewport;
        assert_eq!(viewport.client, Size::new(400.0, 300.0));
        assert_eq!(viewport.content, Size::new(400.0, 900.0));
        assert_eq!(viewport.offset, Point::new(0.0, 100.0));
    }

    #[test]
    fn loads_from_path() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"<input id="field">"#).unwrap();
        let page = load_page_from_path(file.path(), FocusSettings::default(), Rc::new(EmptyChromeClient)).unwrap();
        assert!(page.element_by_id("field").is_some());

        let missing = load_page_from_path(Path::new("/nonexistent/page.html"), FocusSettings::default(), Rc::new(EmptyChromeClient));
        assert!(matches!(missing, Err(LoadError::Io(_))));
    }

    #[test]
    fn rejects_bad_rect() {
        let err = load_page(r#"<div data-rect="1 2 3"></div>"#, FocusSettings::default()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidAttribute { .. }));
    }
}
