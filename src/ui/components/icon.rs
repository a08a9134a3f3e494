//! Action row icons.

use ratatui::{style::Style, text::Span};

use super::theme::to_color;
use crate::dialog::{IconSource, PropMap, Rgb};

/// Glyph drawn for Material Community names missing from the table.
pub const FALLBACK_GLYPH: &str = "•";

/// Material Community icon names mapped to single-width terminal glyphs.
const MATERIAL_COMMUNITY: &[(&str, &str)] = &[
    ("alert", "⚠"),
    ("alert-circle", "⚠"),
    ("arrow-left", "←"),
    ("arrow-right", "→"),
    ("check", "✓"),
    ("check-circle", "✔"),
    ("close", "✕"),
    ("close-circle", "✖"),
    ("cog", "⚙"),
    ("content-copy", "⧉"),
    ("content-save", "⎙"),
    ("delete", "⌫"),
    ("heart", "♥"),
    ("help-circle", "?"),
    ("information", "ℹ"),
    ("information-outline", "ℹ"),
    ("pencil", "✎"),
    ("plus", "+"),
    ("refresh", "↻"),
    ("share", "⇪"),
    ("star", "★"),
    ("star-outline", "☆"),
];

/// Look up a Material Community icon by name.
pub fn material_glyph(name: &str) -> Option<&'static str> {
    MATERIAL_COMMUNITY
        .iter()
        .find(|(icon, _)| *icon == name)
        .map(|(_, glyph)| *glyph)
}

/// Resolve an action's icon to a styled span, or `None` when it has no icon.
///
/// A `"color"` entry in `props` overrides the base style's foreground.
pub fn icon_span(icon: &IconSource, props: &PropMap, base: Style) -> Option<Span<'static>> {
    let glyph = match icon {
        IconSource::None => return None,
        IconSource::Glyph(glyph) => glyph.clone(),
        IconSource::MaterialCommunity(name) => material_glyph(name)
            .unwrap_or_else(|| {
                tracing::debug!(icon = %name, "Unknown icon name, using fallback glyph");
                FALLBACK_GLYPH
            })
            .to_string(),
    };

    let style = match prop_color(props) {
        Some(color) => base.fg(color),
        None => base,
    };
    Some(Span::styled(glyph, style))
}

/// Read a hex `"color"` prop.
pub fn prop_color(props: &PropMap) -> Option<ratatui::style::Color> {
    props
        .get("color")
        .and_then(|v| v.as_str())
        .and_then(|hex| hex.parse::<Rgb>().ok())
        .map(to_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_glyph_drawn_as_is() {
        let span = icon_span(&IconSource::Glyph("★".into()), &PropMap::new(), Style::default());
        assert_eq!(span.map(|s| s.content.into_owned()), Some("★".to_string()));
    }

    #[test]
    fn test_material_lookup_and_fallback() {
        let known = icon_span(
            &IconSource::MaterialCommunity("check".into()),
            &PropMap::new(),
            Style::default(),
        );
        assert_eq!(known.map(|s| s.content.into_owned()), Some("✓".to_string()));

        let unknown = icon_span(
            &IconSource::MaterialCommunity("no-such-icon".into()),
            &PropMap::new(),
            Style::default(),
        );
        assert_eq!(unknown.map(|s| s.content.into_owned()), Some(FALLBACK_GLYPH.to_string()));
    }

    #[test]
    fn test_no_icon() {
        assert!(icon_span(&IconSource::None, &PropMap::new(), Style::default()).is_none());
    }

    #[test]
    fn test_color_prop() {
        let mut props = PropMap::new();
        props.insert("color".into(), "#ff0000".into());
        let span = icon_span(&IconSource::Glyph("x".into()), &props, Style::default());
        assert_eq!(span.and_then(|s| s.style.fg), Some(Color::Rgb(255, 0, 0)));
    }

    #[test]
    fn test_signed_hex_color_prop_is_ignored() {
        let mut props = PropMap::new();
        props.insert("color".into(), "#+f+f+f".into());
        assert_eq!(prop_color(&props), None);

        props.insert("color".into(), "#0f0".into());
        assert_eq!(prop_color(&props), Some(Color::Rgb(0, 255, 0)));
    }
}
