//! Runtime-switchable theme for dialog colors.
//!
//! Themes are injected rather than global: the render layer holds a
//! [`ThemeProvider`] and re-derives its cached styles whenever the provider's
//! revision changes.
//!
//! # Usage
//!
//! ```rust,ignore
//! let provider = Arc::new(SharedTheme::new(Theme::default_dark()));
//! let mut styles = ThemedStyles::new(provider.clone());
//!
//! // Read styles (cheap, re-derived only after a theme change)
//! let message = styles.get().message;
//!
//! // Change theme (rare, user-initiated)
//! provider.toggle();
//! ```

mod builtin;
mod types;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use ratatui::style::{Color, Modifier, Style};

pub use builtin::{get_builtin, list_builtin};
pub use types::{to_color, Theme, ThemeInfo, ThemeOverrides};

use crate::dialog::TextStyle;

// =============================================================================
// Provider
// =============================================================================

/// Source of the active theme.
///
/// `active_theme` may return `None` when no theme is loaded; styles then fall
/// back to plain colors chosen by `is_dark`.
pub trait ThemeProvider: Send + Sync {
    fn active_theme(&self) -> Option<Theme>;

    fn is_dark(&self) -> bool;

    /// Monotonically increasing counter, bumped on every theme change.
    fn revision(&self) -> u64;
}

/// Thread-safe, switchable theme holder.
pub struct SharedTheme {
    theme: RwLock<Option<Theme>>,
    dark: AtomicBool,
    revision: AtomicU64,
}

impl SharedTheme {
    pub fn new(theme: Theme) -> Self {
        let dark = !theme.is_light;
        Self {
            theme: RwLock::new(Some(theme)),
            dark: AtomicBool::new(dark),
            revision: AtomicU64::new(0),
        }
    }

    /// A provider with no theme, only a dark/light preference.
    pub fn unthemed(is_dark: bool) -> Self {
        Self {
            theme: RwLock::new(None),
            dark: AtomicBool::new(is_dark),
            revision: AtomicU64::new(0),
        }
    }

    /// Set a new theme. Takes effect on the next render.
    pub fn set_theme(&self, theme: Theme) {
        self.dark.store(!theme.is_light, Ordering::Relaxed);
        *self.theme.write() = Some(theme);
        self.revision.fetch_add(1, Ordering::Relaxed);
    }

    /// Load and apply a built-in theme by name.
    pub fn load_by_name(&self, name: &str) -> bool {
        match get_builtin(name) {
            Some(theme) => {
                tracing::info!(
                    requested = name,
                    applied = %theme.name,
                    is_light = theme.is_light,
                    "Theme applied by name"
                );
                self.set_theme(theme);
                true
            }
            None => {
                tracing::info!(requested = name, "Theme not found");
                false
            }
        }
    }

    /// Toggle between light and dark themes.
    pub fn toggle(&self) {
        if self.is_dark() {
            self.set_theme(Theme::default_light());
        } else {
            self.set_theme(Theme::default_dark());
        }
    }

    pub fn current_name(&self) -> Option<String> {
        self.theme.read().as_ref().map(|t| t.name.clone())
    }
}

impl Default for SharedTheme {
    fn default() -> Self {
        Self::new(Theme::default_dark())
    }
}

impl ThemeProvider for SharedTheme {
    fn active_theme(&self) -> Option<Theme> {
        self.theme.read().clone()
    }

    fn is_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }

    fn revision(&self) -> u64 {
        self.revision.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Derived styles
// =============================================================================

/// Default style of the dialog's markdown message.
///
/// Uses the theme's primary text color, or white on dark and black on light
/// when no theme is loaded.
pub fn message_text_style(theme: Option<&Theme>, is_dark: bool) -> Style {
    let fg = match theme {
        Some(theme) => theme.text_primary,
        None if is_dark => Color::White,
        None => Color::Black,
    };
    Style::default().fg(fg)
}

/// Layer a caller's text style over a base style.
pub fn apply_text_style(base: Style, overrides: &TextStyle) -> Style {
    let mut style = base;
    if let Some(color) = overrides.color {
        style = style.fg(to_color(color));
    }
    if let Some(background) = overrides.background {
        style = style.bg(to_color(background));
    }
    match overrides.bold {
        Some(true) => style = style.add_modifier(Modifier::BOLD),
        Some(false) => style = style.remove_modifier(Modifier::BOLD),
        None => {}
    }
    match overrides.italic {
        Some(true) => style = style.add_modifier(Modifier::ITALIC),
        Some(false) => style = style.remove_modifier(Modifier::ITALIC),
        None => {}
    }
    style
}

/// Colors used when rendering markdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkdownPalette {
    pub heading: Color,
    pub subheading: Color,
    pub link: Color,
    pub bullet: Color,
    pub quote: Color,
    pub code: Color,
    pub code_bg: Color,
    pub inline_code: Color,
    pub inline_code_bg: Color,
    pub rule: Color,
}

impl MarkdownPalette {
    fn from_theme(theme: Option<&Theme>, is_dark: bool) -> Self {
        match theme {
            Some(t) => Self {
                heading: t.accent_secondary,
                subheading: t.accent_primary,
                link: t.accent_primary,
                bullet: t.accent_primary,
                quote: t.text_secondary,
                code: t.text_bright,
                code_bg: t.markdown_code_bg,
                inline_code: t.accent_warning,
                inline_code_bg: t.markdown_inline_code_bg,
                rule: t.border_default,
            },
            None => Self::plain(is_dark),
        }
    }

    /// Palette used without a theme.
    pub fn plain(is_dark: bool) -> Self {
        let (code_bg, inline_bg) = if is_dark {
            (Color::Rgb(30, 30, 30), Color::Rgb(40, 40, 40))
        } else {
            (Color::Rgb(235, 235, 240), Color::Rgb(225, 225, 232))
        };
        Self {
            heading: Color::Magenta,
            subheading: Color::Cyan,
            link: Color::Blue,
            bullet: Color::Cyan,
            quote: Color::Gray,
            code: Color::Green,
            code_bg,
            inline_code: Color::Yellow,
            inline_code_bg: inline_bg,
            rule: Color::DarkGray,
        }
    }
}

/// Every style the dialog widget needs, derived from one theme revision.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogStyles {
    pub surface: Style,
    pub border: Style,
    pub title: Style,
    pub message: Style,
    pub action: Style,
    pub description: Style,
    pub selected: Style,
    pub key_hint: Style,
    pub hint: Style,
    pub cancel: Style,
    pub cancel_focused: Style,
    pub scrollbar: Style,
    pub markdown: MarkdownPalette,
}

impl DialogStyles {
    pub fn derive(theme: Option<&Theme>, is_dark: bool) -> Self {
        let message = message_text_style(theme, is_dark);
        let markdown = MarkdownPalette::from_theme(theme, is_dark);
        match theme {
            Some(t) => Self {
                surface: Style::default().bg(t.bg_elevated),
                border: Style::default().fg(t.border_focused),
                title: Style::default()
                    .fg(t.text_bright)
                    .add_modifier(Modifier::BOLD),
                message,
                action: Style::default().fg(t.text_primary),
                description: Style::default().fg(t.text_secondary),
                selected: Style::default()
                    .fg(t.text_bright)
                    .bg(t.bg_highlight)
                    .add_modifier(Modifier::BOLD),
                key_hint: Style::default().fg(t.accent_primary),
                hint: Style::default().fg(t.text_muted),
                cancel: Style::default().fg(t.text_secondary),
                cancel_focused: Style::default()
                    .fg(t.accent_primary)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
                scrollbar: Style::default().fg(t.text_muted),
                markdown,
            },
            None => {
                let (fg, muted) = if is_dark {
                    (Color::White, Color::DarkGray)
                } else {
                    (Color::Black, Color::Gray)
                };
                Self {
                    surface: Style::default(),
                    border: Style::default().fg(fg),
                    title: Style::default().fg(fg).add_modifier(Modifier::BOLD),
                    message,
                    action: Style::default().fg(fg),
                    description: Style::default().fg(muted),
                    selected: Style::default().add_modifier(Modifier::REVERSED),
                    key_hint: Style::default().fg(Color::Cyan),
                    hint: Style::default().fg(muted),
                    cancel: Style::default().fg(muted),
                    cancel_focused: Style::default().add_modifier(Modifier::REVERSED),
                    scrollbar: Style::default().fg(muted),
                    markdown,
                }
            }
        }
    }
}

/// Caches [`DialogStyles`] and re-derives them when the provider's revision changes.
pub struct ThemedStyles {
    provider: Arc<dyn ThemeProvider>,
    revision: u64,
    styles: DialogStyles,
}

impl ThemedStyles {
    pub fn new(provider: Arc<dyn ThemeProvider>) -> Self {
        let revision = provider.revision();
        let styles = DialogStyles::derive(provider.active_theme().as_ref(), provider.is_dark());
        Self {
            provider,
            revision,
            styles,
        }
    }

    pub fn provider(&self) -> &Arc<dyn ThemeProvider> {
        &self.provider
    }

    pub fn get(&mut self) -> &DialogStyles {
        let revision = self.provider.revision();
        if revision != self.revision {
            let theme = self.provider.active_theme();
            self.styles = DialogStyles::derive(theme.as_ref(), self.provider.is_dark());
            self.revision = revision;
            tracing::debug!(revision, "Dialog styles re-derived");
        }
        &self.styles
    }
}
