//! The color roles a dialog is drawn with, and config overrides on top of them.

use ratatui::style::Color;

use crate::dialog::Rgb;

/// Colors by role. Themes are chosen by name in config; only overrides are
/// stored as colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Display name
    pub name: String,
    pub is_light: bool,

    /// Backdrop behind the dialog
    pub bg_base: Color,
    /// Dialog surface
    pub bg_elevated: Color,
    /// Focused row
    pub bg_highlight: Color,
    pub markdown_code_bg: Color,
    pub markdown_inline_code_bg: Color,

    /// Title and selected row
    pub text_bright: Color,
    /// Message body and action labels
    pub text_primary: Color,
    /// Descriptions, quotes and the cancel control
    pub text_secondary: Color,
    /// Hint text and scrollbar
    pub text_muted: Color,

    /// Key hints, links and the focused cancel control
    pub accent_primary: Color,
    /// Markdown headings
    pub accent_secondary: Color,
    /// Inline code
    pub accent_warning: Color,
    pub border_default: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

impl Theme {
    /// Layer `[theme]` color overrides onto this theme.
    ///
    /// A background override also decides lightness and the focused-row
    /// shade; a text override also decides the muted text shade.
    pub fn with_overrides(mut self, overrides: &ThemeOverrides) -> Self {
        if let Some(surface) = overrides.background {
            self.is_light = surface.is_light();
            let shade_toward = if self.is_light { Rgb::BLACK } else { Rgb::WHITE };
            self.bg_elevated = to_color(surface);
            self.bg_highlight = to_color(surface.mix(shade_toward, 0.1));
        }
        if let Some(text) = overrides.text {
            self.text_primary = to_color(text);
            self.text_muted = match from_color(self.bg_elevated) {
                Some(surface) => to_color(text.mix(surface, 0.5)),
                None => to_color(text),
            };
        }
        if let Some(accent) = overrides.accent {
            self.accent_primary = to_color(accent);
            self.border_focused = to_color(accent);
        }
        self
    }
}

/// Colors from the `[theme]` config section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeOverrides {
    pub background: Option<Rgb>,
    pub text: Option<Rgb>,
    pub accent: Option<Rgb>,
}

impl ThemeOverrides {
    pub fn is_empty(&self) -> bool {
        *self == ThemeOverrides::default()
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn from_color(color: Color) -> Option<Rgb> {
    match color {
        Color::Rgb(r, g, b) => Some(Rgb(r, g, b)),
        _ => None,
    }
}

/// A catalog entry as printed by `--list-themes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeInfo {
    /// Name accepted by config and `load_by_name`
    pub name: String,
    pub display_name: String,
    pub is_light: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_override_decides_lightness() {
        let theme = Theme::default_dark().with_overrides(&ThemeOverrides {
            background: Some(Rgb(250, 250, 250)),
            ..Default::default()
        });
        assert!(theme.is_light);
        assert_eq!(theme.bg_elevated, Color::Rgb(250, 250, 250));
        assert_eq!(theme.bg_highlight, Color::Rgb(225, 225, 225));
    }

    #[test]
    fn test_text_override_derives_muted_from_surface() {
        let theme = Theme::default_dark().with_overrides(&ThemeOverrides {
            background: Some(Rgb(0, 0, 0)),
            text: Some(Rgb(200, 100, 0)),
            ..Default::default()
        });
        assert_eq!(theme.text_primary, Color::Rgb(200, 100, 0));
        assert_eq!(theme.text_muted, Color::Rgb(100, 50, 0));
    }

    #[test]
    fn test_accent_override_sets_focus_border() {
        let theme = Theme::default_dark().with_overrides(&ThemeOverrides {
            accent: Some(Rgb(255, 0, 0)),
            ..Default::default()
        });
        assert_eq!(theme.accent_primary, Color::Rgb(255, 0, 0));
        assert_eq!(theme.border_focused, Color::Rgb(255, 0, 0));
    }
}
