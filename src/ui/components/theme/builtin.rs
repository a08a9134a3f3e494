//! Themes compiled into the binary, addressable by name from config and the CLI.

use ratatui::style::Color;

use super::types::{Theme, ThemeInfo};

/// Catalog order is the order `--list-themes` prints.
const CATALOG: &[(&str, fn() -> Theme)] = &[
    ("default-dark", Theme::default_dark),
    ("default-light", Theme::default_light),
    ("dracula", Theme::dracula),
];

const fn hex(rgb: u32) -> Color {
    Color::from_u32(rgb)
}

/// Look a theme up by catalog name; `default` is an alias for `default-dark`.
pub fn get_builtin(name: &str) -> Option<Theme> {
    let name = if name == "default" { "default-dark" } else { name };
    CATALOG
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, build)| build())
}

pub fn list_builtin() -> Vec<ThemeInfo> {
    CATALOG
        .iter()
        .map(|(entry, build)| {
            let theme = build();
            ThemeInfo {
                name: (*entry).to_string(),
                display_name: theme.name,
                is_light: theme.is_light,
            }
        })
        .collect()
}

impl Theme {
    pub fn default_dark() -> Self {
        Self {
            name: "Default".to_string(),
            is_light: false,
            bg_base: hex(0x16161e),
            bg_elevated: hex(0x282834),
            bg_highlight: hex(0x323746),
            markdown_code_bg: hex(0x1e1e1e),
            markdown_inline_code_bg: hex(0x282828),
            text_bright: hex(0xfafaff),
            text_primary: hex(0xdcdce6),
            text_secondary: hex(0xa0a0b4),
            text_muted: hex(0x646478),
            accent_primary: hex(0x82aaff),
            accent_secondary: hex(0xb48cff),
            accent_warning: hex(0xe6b464),
            border_default: hex(0x323241),
            border_focused: hex(0x82aaff),
        }
    }

    pub fn default_light() -> Self {
        Self {
            name: "Default Light".to_string(),
            is_light: true,
            bg_base: hex(0xfafafc),
            bg_elevated: hex(0xe6e6ee),
            bg_highlight: hex(0xd2d7e1),
            markdown_code_bg: hex(0xebebf0),
            markdown_inline_code_bg: hex(0xe1e1e8),
            text_bright: hex(0x0f0f14),
            text_primary: hex(0x23232d),
            text_secondary: hex(0x5a5a69),
            text_muted: hex(0x8c8c9b),
            accent_primary: hex(0x3c78dc),
            accent_secondary: hex(0x8250c8),
            accent_warning: hex(0xc88c1e),
            border_default: hex(0xc8c8d2),
            border_focused: hex(0x3c78dc),
        }
    }

    /// Dracula, with the dialog surface lifted above the palette background.
    pub fn dracula() -> Self {
        Self {
            name: "Dracula".to_string(),
            is_light: false,
            bg_base: hex(0x282a36),
            bg_elevated: hex(0x4e5164),
            bg_highlight: hex(0x585b6e),
            markdown_code_bg: hex(0x232531),
            markdown_inline_code_bg: hex(0x44475a),
            text_bright: hex(0xf8f8f2),
            text_primary: hex(0xebebe6),
            text_secondary: hex(0xb4b9c8),
            text_muted: hex(0x6272a4),
            accent_primary: hex(0xbd93f9),
            accent_secondary: hex(0xff79c6),
            accent_warning: hex(0xffb86c),
            border_default: hex(0x44475a),
            border_focused: hex(0xbd93f9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_theme_loads_by_name() {
        for info in list_builtin() {
            let theme = get_builtin(&info.name).expect("listed theme should load");
            assert_eq!(theme.is_light, info.is_light);
            assert_eq!(theme.name, info.display_name);
        }
    }

    #[test]
    fn test_default_alias_and_unknown_name() {
        assert_eq!(get_builtin("default"), Some(Theme::default_dark()));
        assert!(get_builtin("solarized").is_none());
    }

    #[test]
    fn test_hex_channels() {
        assert_eq!(hex(0x82aaff), Color::Rgb(130, 170, 255));
    }
}
