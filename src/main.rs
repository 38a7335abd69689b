use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use frontier_focus::focus::FocusEvent;
use frontier_focus::html::load_page_from_path;
use frontier_focus::input::parse_key;
use frontier_focus::{EmptyChromeClient, FocusSettings, NodeId, Page};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Serialize)]
struct FocusedElement {
    node: NodeId,
    tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

#[derive(Serialize)]
struct StepReport {
    key: String,
    handled: bool,
    focused: Option<FocusedElement>,
    events: Vec<FocusEvent>,
}

fn main() -> Result<()> {
    let subscriber_result = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if subscriber_result.is_err() {
        // tracing was already initialised; continue silently
    }

    let mut args = std::env::args().skip(1);
    let Some(raw_input) = args.next() else {
        bail!("usage: frontier-focus <page.html | file:// url> [key...]");
    };
    let path = page_path(&raw_input)?;

    let settings = FocusSettings::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to load focus settings; using defaults");
        FocusSettings::default()
    });

    let mut page = load_page_from_path(&path, settings, Rc::new(EmptyChromeClient))
        .with_context(|| format!("failed to load {}", path.display()))?;
    page.set_active(true);
    page.set_focused(true);
    page.take_event_log();

    for raw_key in args {
        let event = parse_key(&raw_key).with_context(|| format!("invalid key {raw_key:?}"))?;
        let handled = page.handle_key_event(&event);
        let report = StepReport {
            key: raw_key,
            handled,
            focused: focused_element(&page),
            events: page.take_event_log(),
        };
        println!("{}", serde_json::to_string(&report)?);
    }

    Ok(())
}

fn page_path(raw: &str) -> Result<PathBuf> {
    match Url::parse(raw) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map_err(|_| anyhow::anyhow!("not a local file url: {url}")),
        Ok(url) if url.scheme().len() > 1 => bail!("unsupported url scheme: {}", url.scheme()),
        // Plain paths, including Windows drive letters that parse as a scheme.
        _ => Ok(PathBuf::from(raw)),
    }
}

fn focused_element(page: &Page) -> Option<FocusedElement> {
    let frame = page.focused_frame()?;
    let document = page.dom().frame_document(frame)?;
    let node = page.dom().focused_element(document)?;
    let element = page.dom().element(node)?;
    Some(FocusedElement {
        node,
        tag: element.tag.clone(),
        id: element.id().map(str::to_string),
    })
}
