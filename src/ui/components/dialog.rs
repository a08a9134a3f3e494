//! Reusable dialog frame and instruction bar components

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget},
};

/// A centered dialog frame with an optional title and border
pub struct DialogFrame<'a> {
    title: Option<&'a str>,
    width: u16,
    height: u16,
    border_style: Style,
    title_style: Style,
    surface: Style,
    padding: Padding,
}

impl<'a> DialogFrame<'a> {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            title: None,
            width,
            height,
            border_style: Style::default(),
            title_style: Style::default(),
            surface: Style::default(),
            padding: Padding::horizontal(1),
        }
    }

    pub fn title(mut self, title: Option<&'a str>) -> Self {
        self.title = title.filter(|t| !t.is_empty());
        self
    }

    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    pub fn title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }

    pub fn surface(mut self, style: Style) -> Self {
        self.surface = style;
        self
    }

    pub fn padding(mut self, horizontal: u16, vertical: u16) -> Self {
        self.padding = Padding::new(horizontal, horizontal, vertical, vertical);
        self
    }

    /// Centered area the frame occupies within `area`, capped to its size.
    pub fn area(&self, area: Rect) -> Rect {
        let width = self.width.min(area.width.saturating_sub(4));
        let height = self.height.min(area.height.saturating_sub(2));

        Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        }
    }

    /// Render the dialog frame and return the inner area for content
    pub fn render(&self, area: Rect, buf: &mut Buffer) -> Rect {
        let dialog_area = self.area(area);

        Clear.render(dialog_area, buf);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.border_style)
            .style(self.surface)
            .padding(self.padding);
        if let Some(title) = self.title {
            block = block.title(Span::styled(format!(" {title} "), self.title_style));
        }

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        inner
    }
}

/// An instruction bar showing keyboard shortcuts
pub struct InstructionBar<'a> {
    instructions: Vec<(&'a str, &'a str)>,
    key_style: Style,
    text_style: Style,
}

impl<'a> InstructionBar<'a> {
    pub fn new(instructions: Vec<(&'a str, &'a str)>) -> Self {
        Self {
            instructions,
            key_style: Style::default(),
            text_style: Style::default(),
        }
    }

    pub fn styles(mut self, key_style: Style, text_style: Style) -> Self {
        self.key_style = key_style;
        self.text_style = text_style;
        self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, (key, desc)) in self.instructions.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*key, self.key_style));
            spans.push(Span::styled(format!(" {desc}"), self.text_style));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_is_centered_and_capped() {
        let frame = DialogFrame::new(40, 100);
        let area = frame.area(Rect::new(0, 0, 80, 24));
        assert_eq!(area, Rect::new(20, 1, 40, 22));
    }

    #[test]
    fn test_frame_without_title_draws_plain_border() {
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        let inner = DialogFrame::new(10, 4).title(Some("")).render(area, &mut buf);
        assert_eq!(inner.height, 2);
        let top: String = (5..15).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(top, "┌────────┐");
    }
}
