//! Markdown to ratatui text for dialog messages.

use pulldown_cmark::{Alignment, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};
use unicode_width::UnicodeWidthStr;

use super::theme::MarkdownPalette;

/// Markdown renderer with table support.
///
/// Plain text uses `base_style`, which the dialog derives from the theme and
/// the request's message style.
pub struct MarkdownRenderer {
    base_style: Style,
    palette: MarkdownPalette,
}

#[derive(Default)]
struct TableState {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    alignments: Vec<Alignment>,
}

impl MarkdownRenderer {
    pub fn new(base_style: Style, palette: MarkdownPalette) -> Self {
        Self {
            base_style,
            palette,
        }
    }

    /// Render markdown string to ratatui Text
    pub fn render(&self, markdown: &str) -> Text<'static> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut style_stack: Vec<Style> = vec![self.base_style];

        let mut table: Option<TableState> = None;
        // 0 = unordered
        let mut list_counters: Vec<u64> = Vec::new();
        let mut code_block: Option<String> = None;

        let current = |stack: &[Style]| *stack.last().unwrap_or(&self.base_style);

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(tag) => match tag {
                    Tag::Heading { level, .. } => style_stack.push(self.heading_style(level)),
                    Tag::BlockQuote(_) => {
                        spans.push(Span::styled("│ ", Style::default().fg(self.palette.rule)));
                        style_stack.push(
                            Style::default()
                                .fg(self.palette.quote)
                                .add_modifier(Modifier::ITALIC),
                        );
                    }
                    Tag::CodeBlock(_) => code_block = Some(String::new()),
                    Tag::List(start) => list_counters.push(start.unwrap_or(0)),
                    Tag::Item => {
                        let indent = "  ".repeat(list_counters.len().saturating_sub(1));
                        let bullet = match list_counters.last_mut() {
                            Some(n) if *n > 0 => {
                                let bullet = format!("{indent}{n}. ");
                                *n += 1;
                                bullet
                            }
                            _ => format!("{indent}• "),
                        };
                        spans.push(Span::styled(bullet, Style::default().fg(self.palette.bullet)));
                    }
                    Tag::Emphasis => {
                        style_stack.push(current(&style_stack).add_modifier(Modifier::ITALIC))
                    }
                    Tag::Strong => {
                        style_stack.push(current(&style_stack).add_modifier(Modifier::BOLD))
                    }
                    Tag::Strikethrough => {
                        style_stack.push(current(&style_stack).add_modifier(Modifier::CROSSED_OUT))
                    }
                    Tag::Link { .. } => style_stack.push(
                        Style::default()
                            .fg(self.palette.link)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                    Tag::Table(alignments) => {
                        table = Some(TableState {
                            alignments,
                            ..Default::default()
                        })
                    }
                    Tag::TableHead | Tag::TableRow => {
                        if let Some(t) = table.as_mut() {
                            t.row.clear();
                        }
                    }
                    Tag::TableCell => {
                        if let Some(t) = table.as_mut() {
                            t.cell.clear();
                        }
                    }
                    _ => {}
                },
                Event::End(tag_end) => match tag_end {
                    TagEnd::Paragraph => {
                        flush(&mut lines, &mut spans);
                        lines.push(Line::default());
                    }
                    TagEnd::Heading(_) => {
                        style_stack.pop();
                        flush(&mut lines, &mut spans);
                        lines.push(Line::default());
                    }
                    TagEnd::BlockQuote(_) => {
                        style_stack.pop();
                        flush(&mut lines, &mut spans);
                    }
                    TagEnd::CodeBlock => {
                        let content = code_block.take().unwrap_or_default();
                        let code_style = Style::default()
                            .fg(self.palette.code)
                            .bg(self.palette.code_bg);
                        for code_line in content.lines() {
                            lines.push(Line::from(Span::styled(format!(" {code_line} "), code_style)));
                        }
                        lines.push(Line::default());
                    }
                    TagEnd::List(_) => {
                        list_counters.pop();
                        if list_counters.is_empty() {
                            lines.push(Line::default());
                        }
                    }
                    TagEnd::Item => flush(&mut lines, &mut spans),
                    TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                        style_stack.pop();
                    }
                    TagEnd::Table => {
                        if let Some(t) = table.take() {
                            self.render_table(&t.rows, &t.alignments, &mut lines);
                        }
                        lines.push(Line::default());
                    }
                    TagEnd::TableHead | TagEnd::TableRow => {
                        if let Some(t) = table.as_mut() {
                            if !t.row.is_empty() {
                                let row = std::mem::take(&mut t.row);
                                t.rows.push(row);
                            }
                        }
                    }
                    TagEnd::TableCell => {
                        if let Some(t) = table.as_mut() {
                            let cell = std::mem::take(&mut t.cell);
                            t.row.push(cell);
                        }
                    }
                    _ => {}
                },
                Event::Text(text) => {
                    if let Some(code) = code_block.as_mut() {
                        code.push_str(&text);
                    } else if let Some(t) = table.as_mut() {
                        t.cell.push_str(&text);
                    } else {
                        spans.push(Span::styled(text.to_string(), current(&style_stack)));
                    }
                }
                Event::Code(code) => {
                    if let Some(t) = table.as_mut() {
                        t.cell.push_str(&format!("`{code}`"));
                    } else {
                        spans.push(Span::styled(
                            code.to_string(),
                            Style::default()
                                .fg(self.palette.inline_code)
                                .bg(self.palette.inline_code_bg),
                        ));
                    }
                }
                Event::SoftBreak => match table.as_mut() {
                    Some(t) => t.cell.push(' '),
                    None => spans.push(Span::styled(" ", current(&style_stack))),
                },
                Event::HardBreak => {
                    if table.is_none() {
                        lines.push(Line::from(std::mem::take(&mut spans)));
                    }
                }
                Event::Rule => {
                    lines.push(Line::from(Span::styled(
                        "─".repeat(40),
                        Style::default().fg(self.palette.rule),
                    )));
                    lines.push(Line::default());
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "☑ " } else { "☐ " };
                    spans.push(Span::styled(marker, current(&style_stack)));
                }
                _ => {}
            }
        }

        flush(&mut lines, &mut spans);

        // Drop the trailing blank line left by the last block
        while lines.last().is_some_and(|l| l.width() == 0) {
            lines.pop();
        }

        Text::from(lines)
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => Style::default()
                .fg(self.palette.heading)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            HeadingLevel::H2 => Style::default()
                .fg(self.palette.subheading)
                .add_modifier(Modifier::BOLD),
            _ => self.base_style.add_modifier(Modifier::BOLD),
        }
    }

    fn render_table(&self, rows: &[Vec<String>], alignments: &[Alignment], lines: &mut Vec<Line<'static>>) {
        if rows.is_empty() {
            return;
        }

        let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![3usize; num_cols];
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        let border_style = Style::default().fg(self.palette.rule);
        let header_style = self.base_style.add_modifier(Modifier::BOLD);

        lines.push(Line::from(Span::styled(table_border(&widths, '┌', '┬', '┐'), border_style)));

        for (row_idx, row) in rows.iter().enumerate() {
            let style = if row_idx == 0 { header_style } else { self.base_style };
            let mut spans = vec![Span::styled("│", border_style)];

            for (col_idx, width) in widths.iter().enumerate() {
                let cell = row.get(col_idx).map(String::as_str).unwrap_or_default();
                let alignment = alignments.get(col_idx).copied().unwrap_or(Alignment::None);
                spans.push(Span::styled(format!(" {} ", align_text(cell, *width, alignment)), style));
                spans.push(Span::styled("│", border_style));
            }
            lines.push(Line::from(spans));

            if row_idx == 0 && rows.len() > 1 {
                lines.push(Line::from(Span::styled(table_border(&widths, '├', '┼', '┤'), border_style)));
            }
        }

        lines.push(Line::from(Span::styled(table_border(&widths, '└', '┴', '┘'), border_style)));
    }
}

fn flush(lines: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>) {
    if !spans.is_empty() {
        lines.push(Line::from(std::mem::take(spans)));
    }
}

fn table_border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", segments.join(&mid.to_string()))
}

fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let text_width = text.width();
    if text_width >= width {
        return text.to_string();
    }

    let padding = width - text_width;
    match alignment {
        Alignment::Left | Alignment::None => format!("{text}{}", " ".repeat(padding)),
        Alignment::Right => format!("{}{text}", " ".repeat(padding)),
        Alignment::Center => {
            let left = padding / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(padding - left))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new(Style::default().fg(Color::White), MarkdownPalette::plain(true))
    }

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_paragraph_uses_base_style() {
        let text = renderer().render("Delete **all** files?");
        assert_eq!(plain(&text), vec!["Delete all files?"]);
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::White));
        assert!(text.lines[0].spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_simple_table() {
        let md = r#"
| Name | Age |
|------|-----|
| Alice | 30 |
| Bob | 25 |
"#;
        let lines = plain(&renderer().render(md));
        assert_eq!(lines[0], "┌───────┬─────┐");
        assert_eq!(lines[1], "│ Name  │ Age │");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_ordered_list() {
        let lines = plain(&renderer().render("1. one\n2. two\n"));
        assert_eq!(lines, vec!["1. one", "2. two"]);
    }

    #[test]
    fn test_code_block() {
        let md = "```rust\nfn main() {}\n```\n";
        let text = renderer().render(md);
        assert_eq!(plain(&text), vec![" fn main() {} "]);
        assert_eq!(text.lines[0].spans[0].style.bg, Some(Color::Rgb(30, 30, 30)));
    }
}
