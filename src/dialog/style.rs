//! Toolkit-neutral style fragments carried by a dialog request.
//!
//! The render adapter converts these into its own style types; the dialog
//! core never depends on a rendering crate.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Default upper bound for the message scroll area, in rows.
pub const DEFAULT_SCROLL_MAX_HEIGHT: u16 = 300;

/// An RGB color, written as `#RGB` or `#RRGGBB` in config and request files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        // from_str_radix alone would also take a sign
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("invalid color: {s}"));
        }
        let channel = |range: std::ops::Range<usize>, scale: u8| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .map(|v| v * scale)
        };

        let parsed = match hex.len() {
            3 => channel(0..1, 17)
                .zip(channel(1..2, 17))
                .zip(channel(2..3, 17))
                .map(|((r, g), b)| Rgb(r, g, b)),
            // Alpha in #RRGGBBAA is ignored
            6 | 8 => channel(0..2, 1)
                .zip(channel(2..4, 1))
                .zip(channel(4..6, 1))
                .map(|((r, g), b)| Rgb(r, g, b)),
            _ => None,
        };

        parsed.ok_or_else(|| format!("invalid color: {s}"))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Blend each channel toward `other` by `t`, clamped to `0.0..=1.0`.
    pub fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let blend = |from: u8, to: u8| {
            let (from, to) = (f32::from(from), f32::from(to));
            (from + (to - from) * t).round() as u8
        };
        Rgb(
            blend(self.0, other.0),
            blend(self.1, other.1),
            blend(self.2, other.2),
        )
    }

    /// Perceived brightness on the 0-255 scale, BT.601 weights.
    pub fn brightness(self) -> u8 {
        let weighted =
            299 * u32::from(self.0) + 587 * u32::from(self.1) + 114 * u32::from(self.2);
        u8::try_from(weighted / 1000).unwrap_or(u8::MAX)
    }

    pub fn is_light(self) -> bool {
        self.brightness() > 127
    }
}

/// Text style override for the message body.
///
/// Fields left as `None` keep the theme-derived value when merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub color: Option<Rgb>,
    pub background: Option<Rgb>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
}

impl TextStyle {
    pub fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merged(self, other: &TextStyle) -> TextStyle {
        TextStyle {
            color: other.color.or(self.color),
            background: other.background.or(self.background),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
        }
    }
}

/// Layout override for the dialog content area.
///
/// Transient: the broker resets it to empty once a request resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContentStyle {
    /// Dialog width in columns
    pub width: Option<u16>,
    pub padding_x: Option<u16>,
    pub padding_y: Option<u16>,
    pub border_color: Option<Rgb>,
}

impl ContentStyle {
    pub fn is_empty(&self) -> bool {
        *self == ContentStyle::default()
    }
}

/// Constraints for the scrollable message area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScrollStyle {
    pub max_height: u16,
}

impl ScrollStyle {
    pub fn with_max_height(max_height: u16) -> Self {
        Self { max_height }
    }
}

impl Default for ScrollStyle {
    fn default() -> Self {
        Self {
            max_height: DEFAULT_SCROLL_MAX_HEIGHT,
        }
    }
}
