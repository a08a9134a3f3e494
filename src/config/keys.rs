//! Keybinding configuration types and parsing
//!
//! This module provides types for representing keyboard shortcuts and
//! parsing vim-style key notation (e.g., "C-x", "M-S-w", "<CR>").

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyModifiers};
use serde::Deserialize;

/// A key combination (key code + modifiers)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Create a KeyCombo from a crossterm KeyEvent
    ///
    /// Uppercase characters are normalized to lowercase + SHIFT so that "G"
    /// in config matches Shift+g key events.
    pub fn from_key_event(event: &crossterm::event::KeyEvent) -> Self {
        match event.code {
            KeyCode::Char(c) if c.is_ascii_uppercase() => Self {
                code: KeyCode::Char(c.to_ascii_lowercase()),
                modifiers: event.modifiers | KeyModifiers::SHIFT,
            },
            _ => Self {
                code: event.code,
                modifiers: event.modifiers,
            },
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("C");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("M");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("S");
        }

        let key_str = match self.code {
            KeyCode::Char(' ') => "<Space>".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "<CR>".to_string(),
            KeyCode::Esc => "<Esc>".to_string(),
            KeyCode::Tab => "<Tab>".to_string(),
            KeyCode::BackTab => "<S-Tab>".to_string(),
            KeyCode::Backspace => "<BS>".to_string(),
            KeyCode::Up => "<Up>".to_string(),
            KeyCode::Down => "<Down>".to_string(),
            KeyCode::Left => "<Left>".to_string(),
            KeyCode::Right => "<Right>".to_string(),
            KeyCode::PageUp => "<PageUp>".to_string(),
            KeyCode::PageDown => "<PageDown>".to_string(),
            KeyCode::Home => "<Home>".to_string(),
            KeyCode::End => "<End>".to_string(),
            KeyCode::F(n) => format!("<F{}>", n),
            _ => format!("{:?}", self.code),
        };

        if parts.is_empty() {
            write!(f, "{}", key_str)
        } else {
            parts.push(&key_str);
            write!(f, "{}", parts.join("-"))
        }
    }
}

impl FromStr for KeyCombo {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_notation(s)
    }
}

/// Where a binding applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyContext {
    /// A dialog is open
    Dialog,
    /// No dialog is open
    App,
}

/// Something a key can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    // Dialog
    SelectNext,
    SelectPrev,
    Confirm,
    Cancel,
    FocusCancel,
    ScrollUp,
    ScrollDown,
    // App
    Quit,
    ToggleTheme,
}

impl KeyAction {
    pub fn context(self) -> KeyContext {
        match self {
            KeyAction::Quit | KeyAction::ToggleTheme => KeyContext::App,
            _ => KeyContext::Dialog,
        }
    }

    /// Parse the config name of an action (`confirm`, `select_next`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let action = match name {
            "select_next" => KeyAction::SelectNext,
            "select_prev" => KeyAction::SelectPrev,
            "confirm" => KeyAction::Confirm,
            "cancel" => KeyAction::Cancel,
            "focus_cancel" => KeyAction::FocusCancel,
            "scroll_up" => KeyAction::ScrollUp,
            "scroll_down" => KeyAction::ScrollDown,
            "quit" => KeyAction::Quit,
            "toggle_theme" => KeyAction::ToggleTheme,
            _ => return None,
        };
        Some(action)
    }
}

/// Keybindings grouped by context, plus global bindings that apply everywhere
#[derive(Debug, Clone, Default)]
pub struct KeybindingConfig {
    pub global: HashMap<KeyCombo, KeyAction>,
    pub context: HashMap<KeyContext, HashMap<KeyCombo, KeyAction>>,
}

impl KeybindingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in bindings.
    pub fn defaults() -> Self {
        let mut config = Self::new();
        config
            .global
            .insert(KeyCombo::new(KeyCode::Char('c'), KeyModifiers::CONTROL), KeyAction::Quit);

        let dialog = [
            (KeyCombo::plain(KeyCode::Down), KeyAction::SelectNext),
            (KeyCombo::plain(KeyCode::Char('j')), KeyAction::SelectNext),
            (KeyCombo::plain(KeyCode::Up), KeyAction::SelectPrev),
            (KeyCombo::plain(KeyCode::Char('k')), KeyAction::SelectPrev),
            (KeyCombo::plain(KeyCode::Enter), KeyAction::Confirm),
            (KeyCombo::plain(KeyCode::Esc), KeyAction::Cancel),
            (KeyCombo::plain(KeyCode::Tab), KeyAction::FocusCancel),
            (KeyCombo::plain(KeyCode::PageUp), KeyAction::ScrollUp),
            (KeyCombo::plain(KeyCode::PageDown), KeyAction::ScrollDown),
        ];
        config
            .context
            .insert(KeyContext::Dialog, dialog.into_iter().collect());

        let app = [
            (KeyCombo::plain(KeyCode::Char('q')), KeyAction::Quit),
            (KeyCombo::plain(KeyCode::Char('t')), KeyAction::ToggleTheme),
        ];
        config.context.insert(KeyContext::App, app.into_iter().collect());
        config
    }

    /// Look up an action for a key combo in a given context
    /// First checks context-specific bindings, then falls back to global
    pub fn get_action(&self, key: &KeyCombo, context: KeyContext) -> Option<KeyAction> {
        self.context
            .get(&context)
            .and_then(|bindings| bindings.get(key))
            .or_else(|| self.global.get(key))
            .copied()
    }

    /// Replace every binding of `action` in its context with `keys`.
    pub fn rebind(&mut self, action: KeyAction, keys: Vec<KeyCombo>) {
        let bindings = self.context.entry(action.context()).or_default();
        bindings.retain(|_, bound| *bound != action);
        for key in keys {
            bindings.insert(key, action);
        }
    }

    /// First key bound to `action`, for instruction hints.
    pub fn hint_for(&self, action: KeyAction) -> Option<String> {
        let mut keys: Vec<String> = self
            .context
            .get(&action.context())
            .into_iter()
            .flatten()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| key.to_string())
            .collect();
        keys.sort();
        keys.into_iter().next()
    }
}

/// Parse a vim-style key notation string into a KeyCombo
///
/// Supported notation:
/// - `C-x` for Ctrl+x
/// - `M-x` for Alt+x (Meta)
/// - `S-x` for Shift+x
/// - `C-S-x` for Ctrl+Shift+x
/// - `<CR>`, `<Esc>`, `<Tab>`, `<BS>`, `<Space>`
/// - `<Up>`, `<Down>`, `<Left>`, `<Right>`, `<PageUp>`, `<PageDown>`, `<Home>`, `<End>`
/// - `<F1>` through `<F12>` for function keys
pub fn parse_key_notation(s: &str) -> Result<KeyCombo, KeyParseError> {
    let s = s.trim();

    if s.is_empty() {
        return Err(KeyParseError::Empty);
    }

    if s.starts_with('<') && s.ends_with('>') && s.len() > 2 {
        return parse_special_key(s);
    }

    // Parse modifier-key combinations like "C-x", "M-S-w"
    let parts: Vec<&str> = s.split('-').collect();

    let mut modifiers = KeyModifiers::NONE;
    let mut key_part = None;

    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1;
        match *part {
            "C" if !is_last => modifiers |= KeyModifiers::CONTROL,
            "M" if !is_last => modifiers |= KeyModifiers::ALT,
            "S" if !is_last => modifiers |= KeyModifiers::SHIFT,
            _ => key_part = Some(*part),
        }
    }

    let key_str = key_part.ok_or(KeyParseError::NoKey)?;
    let (code, needs_shift) = parse_key_code(key_str)?;

    // "G" -> lowercase g + SHIFT
    if needs_shift {
        modifiers |= KeyModifiers::SHIFT;
    }

    Ok(KeyCombo::new(code, modifiers))
}

/// Parse a special key notation like <CR>, <Esc>, <C-CR>.
fn parse_special_key(s: &str) -> Result<KeyCombo, KeyParseError> {
    let inner = s
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| KeyParseError::InvalidSpecialKey(s.to_string()))?;

    let mut modifiers = KeyModifiers::NONE;
    let mut parts = inner.rsplit('-');
    let key_name = parts.next().ok_or(KeyParseError::NoKey)?;
    for part in parts {
        match part {
            "C" => modifiers |= KeyModifiers::CONTROL,
            "M" => modifiers |= KeyModifiers::ALT,
            "S" => modifiers |= KeyModifiers::SHIFT,
            _ => return Err(KeyParseError::InvalidModifier(part.to_string())),
        }
    }

    let upper = key_name.to_uppercase();
    let code = match upper.as_str() {
        "CR" | "ENTER" | "RETURN" => KeyCode::Enter,
        "ESC" | "ESCAPE" => KeyCode::Esc,
        "TAB" if modifiers.contains(KeyModifiers::SHIFT) => {
            modifiers.remove(KeyModifiers::SHIFT);
            KeyCode::BackTab
        }
        "TAB" => KeyCode::Tab,
        "BS" | "BACKSPACE" => KeyCode::Backspace,
        "UP" => KeyCode::Up,
        "DOWN" => KeyCode::Down,
        "LEFT" => KeyCode::Left,
        "RIGHT" => KeyCode::Right,
        "PAGEUP" | "PGUP" => KeyCode::PageUp,
        "PAGEDOWN" | "PGDN" => KeyCode::PageDown,
        "HOME" => KeyCode::Home,
        "END" => KeyCode::End,
        "SPACE" => KeyCode::Char(' '),
        f if f.starts_with('F') && f.len() > 1 => {
            let num: u8 = f[1..]
                .parse()
                .map_err(|_| KeyParseError::InvalidKey(key_name.to_string()))?;
            if num == 0 || num > 12 {
                return Err(KeyParseError::InvalidKey(key_name.to_string()));
            }
            KeyCode::F(num)
        }
        _ => return Err(KeyParseError::InvalidSpecialKey(key_name.to_string())),
    };

    Ok(KeyCombo::new(code, modifiers))
}

/// Parse a single key code (not a special key)
/// Returns the KeyCode and whether SHIFT should be added (for uppercase chars)
fn parse_key_code(s: &str) -> Result<(KeyCode, bool), KeyParseError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok((KeyCode::Char(c.to_ascii_lowercase()), c.is_ascii_uppercase())),
        _ => match s.to_uppercase().as_str() {
            "SPACE" => Ok((KeyCode::Char(' '), false)),
            "TAB" => Ok((KeyCode::Tab, false)),
            "ENTER" | "CR" | "RETURN" => Ok((KeyCode::Enter, false)),
            "ESC" | "ESCAPE" => Ok((KeyCode::Esc, false)),
            "BS" | "BACKSPACE" => Ok((KeyCode::Backspace, false)),
            _ => Err(KeyParseError::InvalidKey(s.to_string())),
        },
    }
}

/// Error type for key parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("empty key notation")]
    Empty,
    #[error("no key specified")]
    NoKey,
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("invalid modifier: {0}")]
    InvalidModifier(String),
    #[error("invalid special key: {0}")]
    InvalidSpecialKey(String),
}
