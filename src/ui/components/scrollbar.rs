//! Scrollbar for the dialog's message area.

use ratatui::prelude::StatefulWidget;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
};

#[derive(Debug, Clone, Copy)]
pub struct ScrollbarSymbols {
    pub begin: Option<&'static str>,
    pub end: Option<&'static str>,
    pub track: &'static str,
    pub thumb: &'static str,
}

impl ScrollbarSymbols {
    pub fn standard() -> Self {
        Self {
            begin: Some("▲"),
            end: Some("▼"),
            track: "│",
            thumb: "█",
        }
    }

    /// Track and thumb only, for short content areas.
    pub fn minimal() -> Self {
        Self {
            begin: None,
            end: None,
            track: "│",
            thumb: "┃",
        }
    }

    /// Pick symbols that fit an area of the given height.
    pub fn for_height(height: u16) -> Self {
        if height < 4 {
            Self::minimal()
        } else {
            Self::standard()
        }
    }
}

impl Default for ScrollbarSymbols {
    fn default() -> Self {
        Self::standard()
    }
}

/// Render a vertical scrollbar on the right edge if content overflows.
///
/// Returns true if a scrollbar was drawn.
pub fn render_vertical_scrollbar(
    area: Rect,
    buf: &mut Buffer,
    total: usize,
    visible: usize,
    offset: usize,
    style: Style,
) -> bool {
    if total <= visible || area.height == 0 {
        return false;
    }

    let symbols = ScrollbarSymbols::for_height(area.height);
    let max_scroll = total.saturating_sub(visible);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(symbols.begin)
        .end_symbol(symbols.end)
        .track_symbol(Some(symbols.track))
        .thumb_symbol(symbols.thumb)
        .style(style);

    let mut scrollbar_state = ScrollbarState::new(max_scroll).position(offset.min(max_scroll));
    scrollbar.render(area, buf, &mut scrollbar_state);
    true
}
