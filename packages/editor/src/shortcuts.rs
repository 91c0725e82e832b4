//! Keyboard shortcuts for the canvas
//!
//! | keys                     | action                  |
//! |--------------------------|-------------------------|
//! | `Delete` / `Backspace`   | delete selected element |
//! | `Ctrl+D` / `Cmd+D`       | duplicate selected      |
//! | `Escape`                 | clear selection         |
//!
//! Nothing fires while an editable text field has focus.

use crate::mutations::MutationOutcome;
use crate::properties::{delete_selected, duplicate_selected};
use crate::sink::MutationSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    /// An input, textarea or contenteditable has focus
    pub text_input_focused: bool,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            text_input_focused: false,
        }
    }

    pub fn in_text_input(mut self) -> Self {
        self.text_input_focused = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    DeleteSelected,
    DuplicateSelected,
    ClearSelection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShortcutResult {
    /// Not a shortcut, or typing into a field; let the key through
    Ignored,
    /// Selection cleared; the host also cancels any drag in progress
    SelectionCleared,
    Applied(Shortcut, MutationOutcome),
}

pub fn resolve_shortcut(event: &KeyEvent) -> Option<Shortcut> {
    if event.text_input_focused {
        return None;
    }

    match event.key {
        Key::Delete | Key::Backspace => Some(Shortcut::DeleteSelected),
        Key::Char(c) if event.modifiers.command() && c.eq_ignore_ascii_case(&'d') => {
            Some(Shortcut::DuplicateSelected)
        }
        Key::Escape => Some(Shortcut::ClearSelection),
        Key::Char(_) => None,
    }
}

pub fn handle_shortcut(sink: &mut impl MutationSink, event: &KeyEvent) -> ShortcutResult {
    match resolve_shortcut(event) {
        None => ShortcutResult::Ignored,
        Some(Shortcut::ClearSelection) => {
            sink.select(None);
            ShortcutResult::SelectionCleared
        }
        Some(shortcut @ Shortcut::DeleteSelected) => {
            ShortcutResult::Applied(shortcut, delete_selected(sink))
        }
        Some(shortcut @ Shortcut::DuplicateSelected) => {
            ShortcutResult::Applied(shortcut, duplicate_selected(sink))
        }
    }
}
