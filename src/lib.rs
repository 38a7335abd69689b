// Library exports for the focus engine and its tests

pub mod client;
pub mod dom;
pub mod focus;
pub mod geometry;
pub mod html;
pub mod input;
pub mod page;
pub mod settings;

// Re-export commonly used types for tests
pub use client::{ChromeClient, ClientCall, EmptyChromeClient, RecordingClient};
pub use dom::{DocumentId, Dom, FrameId, NodeId};
pub use focus::{FocusController, FocusEvent, FocusEventType, FocusParams, FocusType, SelectionBehaviorOnFocus};
pub use html::{load_page, load_page_with_client, LoadError};
pub use page::Page;
pub use settings::FocusSettings;
