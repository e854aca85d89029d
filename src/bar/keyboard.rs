//! Keyboard navigation between bar links
//!
//! - Alt + `[` / `-`: previous link
//! - Alt + `]` / `=`: next link
//! - Alt + 1-9: link by position, 1-based
//! - Alt + letter: next link whose shortcut is that letter
//! - Escape: leave the bar
//! - Releasing Alt: open the focused link
//!
//! [`Navigator`] only decides; focusing and opening links is left to the front end.
//! The script in `templates/bar.html` follows the same rules.

/// Keys the navigator reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Alt,
    Char(char),
    Other,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" => Self::Escape,
            "Alt" => Self::Alt,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub alt: bool,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self { key, alt: false }
    }

    pub fn alt(key: Key) -> Self {
        Self { key, alt: true }
    }
}

/// What the presentation layer should do in response to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    None,
    Focus(usize),
    Blur,
    Activate(usize),
}

/// Focus state over `n` links with optional shortcut letters
#[derive(Debug, Clone)]
pub struct Navigator {
    shortcuts: Vec<Option<char>>,
    focused: Option<usize>,
}

impl Navigator {
    pub fn new(shortcuts: Vec<Option<char>>) -> Self {
        Self {
            shortcuts,
            focused: None,
        }
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Record a focus change made outside the navigator, e.g. by the mouse
    pub fn set_focus(&mut self, focused: Option<usize>) {
        self.focused = focused.filter(|i| *i < self.shortcuts.len());
    }

    pub fn key_down(&mut self, event: &KeyEvent) -> NavAction {
        let n = self.shortcuts.len();
        if n == 0 {
            return NavAction::None;
        }

        if event.key == Key::Escape && self.focused.is_some() {
            self.focused = None;
            return NavAction::Blur;
        }
        if !event.alt {
            return NavAction::None;
        }

        let Key::Char(c) = event.key else {
            return NavAction::None;
        };
        match c {
            '[' | '-' => {
                let current = self.focused.unwrap_or(0);
                self.focus((current + n - 1) % n)
            }
            ']' | '=' => {
                let next = self.focused.map_or(0, |current| (current + 1) % n);
                self.focus(next)
            }
            digit if digit.is_ascii_digit() => {
                let position = digit.to_digit(10).unwrap_or(0) as usize;
                self.focus((position + n - 1) % n)
            }
            letter => {
                let key = letter.to_lowercase().next();
                let start = self.focused.map_or(0, |current| current + 1);
                (0..n)
                    .map(|offset| (start + offset) % n)
                    .find(|&i| self.shortcuts[i].is_some() && self.shortcuts[i] == key)
                    .map_or(NavAction::None, |i| self.focus(i))
            }
        }
    }

    pub fn key_up(&mut self, key: Key) -> NavAction {
        match (key, self.focused.take()) {
            (Key::Alt, Some(index)) => NavAction::Activate(index),
            (_, focused) => {
                self.focused = focused;
                NavAction::None
            }
        }
    }

    fn focus(&mut self, index: usize) -> NavAction {
        self.focused = Some(index);
        NavAction::Focus(index)
    }
}
