use keyboard_types::{Key, KeyState, KeyboardEvent, Modifiers};
use thiserror::Error;

use crate::focus::FocusType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("key is empty")]
    Empty,
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

/// Parses a key press written as `Shift+Tab`, `ArrowDown` or `a` into a
/// key-down event.
pub fn parse_key(raw: &str) -> Result<KeyboardEvent, ParseKeyError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseKeyError::Empty);
    }

    let mut parts: Vec<&str> = trimmed.split('+').map(str::trim).collect();
    let key_name = parts.pop().unwrap_or_default();
    if key_name.is_empty() {
        return Err(ParseKeyError::UnknownKey(trimmed.to_string()));
    }

    let mut modifiers = Modifiers::empty();
    for part in parts {
        modifiers |= match part.to_ascii_lowercase().as_str() {
            "shift" => Modifiers::SHIFT,
            "ctrl" | "control" => Modifiers::CONTROL,
            "alt" => Modifiers::ALT,
            "meta" | "cmd" => Modifiers::META,
            _ => return Err(ParseKeyError::UnknownModifier(part.to_string())),
        };
    }

    let key = match key_name {
        "Space" | "space" => Key::Character(" ".to_string()),
        name => name
            .parse::<Key>()
            .map_err(|_| ParseKeyError::UnknownKey(name.to_string()))?,
    };

    Ok(KeyboardEvent {
        state: KeyState::Down,
        key,
        modifiers,
        ..Default::default()
    })
}

/// Navigation step a key press asks for: Tab and Shift+Tab move through
/// the tab order, arrows move directionally.
pub fn direction_for_event(event: &KeyboardEvent) -> Option<FocusType> {
    if event.state != KeyState::Down {
        return None;
    }
    let shift = event.modifiers.contains(Modifiers::SHIFT);
    let other = event
        .modifiers
        .intersects(Modifiers::CONTROL | Modifiers::ALT | Modifiers::META);
    if other {
        return None;
    }

    match event.key {
        Key::Tab if shift => Some(FocusType::Backward),
        Key::Tab => Some(FocusType::Forward),
        Key::ArrowUp if !shift => Some(FocusType::Up),
        Key::ArrowDown if !shift => Some(FocusType::Down),
        Key::ArrowLeft if !shift => Some(FocusType::Left),
        Key::ArrowRight if !shift => Some(FocusType::Right),
        _ => None,
    }
}
