//! Modal prompt rendered from the dialog store.
//!
//! `PromptDialog` draws a [`DialogState`] snapshot; `PromptDialogState` keeps
//! the view-only bits (selection, scroll offset) and turns keys into
//! dismissals. The widget never writes to the store except through the
//! [`Dismisser`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, StatefulWidget, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

use super::dialog::{DialogFrame, InstructionBar};
use super::icon::{icon_span, prop_color};
use super::markdown::MarkdownRenderer;
use super::scrollbar::render_vertical_scrollbar;
use super::theme::{apply_text_style, to_color, DialogStyles};
use crate::config::{KeyAction, KeyCombo, KeyContext, KeybindingConfig};
use crate::dialog::{ActionDescriptor, DialogContent, DialogState, Dismisser};

/// Dialog width when the request does not set one.
pub const DEFAULT_DIALOG_WIDTH: u16 = 60;

/// What Enter activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Action(usize),
    Cancel,
}

/// View state for the prompt dialog
#[derive(Debug)]
pub struct PromptDialogState {
    dismisser: Dismisser,
    request_id: Option<Uuid>,
    focus: Option<Focus>,
    scroll: u16,
    /// Body rows visible in the last render
    page: u16,
    /// Body rows in total in the last render
    body_rows: u16,
}

impl PromptDialogState {
    pub fn new(dismisser: Dismisser) -> Self {
        Self {
            dismisser,
            request_id: None,
            focus: None,
            scroll: 0,
            page: 0,
            body_rows: 0,
        }
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Reset selection and scroll when a different request is loaded.
    pub fn sync(&mut self, dialog: &DialogState) {
        if dialog.request_id == self.request_id {
            return;
        }
        self.request_id = dialog.request_id;
        self.focus = initial_focus(dialog);
        self.scroll = 0;
        self.page = 0;
        self.body_rows = 0;
    }

    /// Handle a key while the dialog is visible. Returns true if consumed.
    pub fn handle_key(
        &mut self,
        key: &KeyEvent,
        dialog: &DialogState,
        bindings: &KeybindingConfig,
    ) -> bool {
        if !dialog.is_visible {
            return false;
        }
        self.sync(dialog);

        let combo = KeyCombo::from_key_event(key);
        if let Some(action) = bindings.get_action(&combo, KeyContext::Dialog) {
            return self.apply(action, dialog);
        }

        let KeyCode::Char(c) = key.code else {
            return false;
        };
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }

        // Quick-select
        if let Some(digit) = c.to_digit(10).filter(|d| (1..=9).contains(d)) {
            if let Some(action) = dialog.actions.get(digit as usize - 1) {
                self.dismisser.dismiss(action.key.clone());
                return true;
            }
        }

        // Offer the key to interactive content
        for content in [&dialog.pre, &dialog.post].into_iter().flatten() {
            if let DialogContent::Interactive(content) = content {
                if content.handle_char(c, &self.dismisser) {
                    return true;
                }
            }
        }
        false
    }

    fn apply(&mut self, action: KeyAction, dialog: &DialogState) -> bool {
        match action {
            KeyAction::SelectNext => self.step(dialog, 1),
            KeyAction::SelectPrev => self.step(dialog, -1),
            KeyAction::Confirm => match self.focus {
                Some(Focus::Action(i)) => match dialog.actions.get(i) {
                    Some(action) => self.dismisser.dismiss(action.key.clone()),
                    None => return false,
                },
                Some(Focus::Cancel) => self.dismisser.cancel(),
                None => return false,
            },
            KeyAction::Cancel => {
                // Without a cancel control only an action can close the dialog;
                // the key is still swallowed so it does not reach the app.
                if dialog.cancel_text.is_some() {
                    self.dismisser.cancel();
                }
            }
            KeyAction::FocusCancel => {
                if dialog.cancel_text.is_none() {
                    return false;
                }
                self.focus = Some(Focus::Cancel);
            }
            KeyAction::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(self.page.max(1));
            }
            KeyAction::ScrollDown => {
                let max_scroll = self.body_rows.saturating_sub(self.page);
                self.scroll = self.scroll.saturating_add(self.page.max(1)).min(max_scroll);
            }
            KeyAction::Quit | KeyAction::ToggleTheme => return false,
        }
        true
    }

    /// Move focus through the actions and the cancel control, wrapping.
    fn step(&mut self, dialog: &DialogState, delta: isize) {
        let has_cancel = dialog.cancel_text.is_some();
        let count = dialog.actions.len() + usize::from(has_cancel);
        if count == 0 {
            return;
        }
        let current = match self.focus {
            Some(Focus::Action(i)) => i,
            Some(Focus::Cancel) => dialog.actions.len(),
            None => count - 1,
        };
        let next = (current as isize + delta).rem_euclid(count as isize) as usize;
        self.focus = if next < dialog.actions.len() {
            Some(Focus::Action(next))
        } else {
            Some(Focus::Cancel)
        };
    }
}

fn initial_focus(dialog: &DialogState) -> Option<Focus> {
    if !dialog.actions.is_empty() {
        Some(Focus::Action(0))
    } else if dialog.cancel_text.is_some() {
        Some(Focus::Cancel)
    } else {
        None
    }
}

/// Prompt dialog widget
pub struct PromptDialog<'a> {
    dialog: &'a DialogState,
    styles: &'a DialogStyles,
    hints: Vec<(String, &'static str)>,
}

impl<'a> PromptDialog<'a> {
    pub fn new(dialog: &'a DialogState, styles: &'a DialogStyles) -> Self {
        Self {
            dialog,
            styles,
            hints: Vec::new(),
        }
    }

    /// Instruction bar entries built from the active keybindings.
    pub fn hints_from(mut self, bindings: &KeybindingConfig) -> Self {
        let hint = |action, label| bindings.hint_for(action).map(|key| (key, label));
        let close = if self.dialog.cancel_text.is_some() {
            hint(KeyAction::Cancel, "close")
        } else {
            None
        };
        self.hints = [
            hint(KeyAction::SelectNext, "select"),
            hint(KeyAction::Confirm, "confirm"),
            close,
        ]
        .into_iter()
        .flatten()
        .collect();
        self
    }

    fn message_style(&self) -> Style {
        match &self.dialog.message_style {
            Some(overrides) => apply_text_style(self.styles.message, overrides),
            None => self.styles.message,
        }
    }

    /// Pre content, message and post content as one scrollable text.
    fn body(&self) -> Text<'static> {
        let base = self.message_style();
        let renderer = MarkdownRenderer::new(base, self.styles.markdown);
        let mut lines: Vec<Line<'static>> = Vec::new();

        let mut push_block = |block: Vec<Line<'static>>| {
            if block.is_empty() {
                return;
            }
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.extend(block);
        };

        if let Some(pre) = &self.dialog.pre {
            push_block(content_lines(pre, &renderer, base));
        }
        if let Some(message) = self.dialog.message.as_deref().filter(|m| !m.is_empty()) {
            push_block(renderer.render(message).lines);
        }
        if let Some(post) = &self.dialog.post {
            push_block(content_lines(post, &renderer, base));
        }
        Text::from(lines)
    }

    fn action_line(&self, index: usize, action: &ActionDescriptor, focused: bool) -> Line<'static> {
        let mut title_style = self.styles.action;
        if let Some(color) = prop_color(&action.row_props) {
            title_style = title_style.fg(color);
        }
        if action.row_props.get("bold").and_then(|v| v.as_bool()) == Some(true) {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }
        if focused {
            title_style = title_style.patch(self.styles.selected);
        }

        let mut spans = Vec::new();
        let marker = if index < 9 {
            format!("{} ", index + 1)
        } else {
            "  ".to_string()
        };
        spans.push(Span::styled(marker, self.styles.key_hint));
        if let Some(icon) = icon_span(&action.icon, &action.icon_props, title_style) {
            spans.push(icon);
            spans.push(Span::styled(" ", title_style));
        }
        spans.push(Span::styled(action.title.clone(), title_style));
        if let Some(description) = action.description.as_deref().filter(|d| !d.is_empty()) {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(description.to_string(), self.styles.description));
        }
        Line::from(spans)
    }
}

fn content_lines(content: &DialogContent, renderer: &MarkdownRenderer, base: Style) -> Vec<Line<'static>> {
    match content {
        DialogContent::Text(text) => text.lines().map(|l| Line::styled(l.to_string(), base)).collect(),
        DialogContent::Markdown(md) => renderer.render(md).lines,
        DialogContent::Interactive(content) => content
            .lines()
            .into_iter()
            .map(|l| Line::styled(l, base))
            .collect(),
    }
}

/// Rows a set of lines takes when wrapped to `width`.
fn wrapped_rows(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines.iter().map(|l| l.width().max(1).div_ceil(width)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

impl StatefulWidget for PromptDialog<'_> {
    type State = PromptDialogState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut PromptDialogState) {
        if !self.dialog.is_visible {
            return;
        }
        state.sync(self.dialog);

        // Style values come from the request; keep the layout math saturating
        let content_style = &self.dialog.content_style;
        let padding_x = content_style.padding_x.unwrap_or(1);
        let padding_y = content_style.padding_y.unwrap_or(0);
        let dialog_width = content_style.width.unwrap_or(DEFAULT_DIALOG_WIDTH);
        let frame_width = dialog_width.min(area.width.saturating_sub(4));
        let inner_width =
            frame_width.saturating_sub(padding_x.saturating_mul(2).saturating_add(2));

        let body = self.body();
        // One column for the scrollbar
        let body_width = inner_width.saturating_sub(1);
        let body_rows = wrapped_rows(&body.lines, body_width);
        let has_body = body_rows > 0 && !body.lines.is_empty();

        let actions = &self.dialog.actions;
        let action_rows = u16::try_from(actions.len()).unwrap_or(u16::MAX);
        let cancel_rows = u16::from(self.dialog.cancel_text.is_some());
        // Leave the hints out when they cannot fit
        let hint_width: usize = self.hints.iter().map(|(k, l)| k.width() + l.width() + 3).sum();
        let show_hints = !self.hints.is_empty() && hint_width <= usize::from(inner_width) + 2;
        let hint_rows = u16::from(show_hints);
        let control_rows = action_rows.saturating_add(cancel_rows);
        let gap = u16::from(has_body && control_rows > 0);
        let fixed_rows = control_rows.saturating_add(hint_rows).saturating_add(gap);

        // Borders, vertical padding and everything that does not scroll
        let chrome = padding_y
            .saturating_mul(2)
            .saturating_add(2)
            .saturating_add(fixed_rows);
        let available = area.height.saturating_sub(2).saturating_sub(chrome);
        let body_height = if has_body {
            body_rows
                .min(self.dialog.scroll_style.max_height.max(1))
                .min(available)
        } else {
            0
        };

        let mut border = self.styles.border;
        if let Some(color) = content_style.border_color {
            border = border.fg(to_color(color));
        }
        let frame = DialogFrame::new(dialog_width, chrome.saturating_add(body_height))
            .title(self.dialog.title.as_deref())
            .title_style(self.styles.title)
            .border_style(border)
            .surface(self.styles.surface)
            .padding(padding_x, padding_y);
        let inner = frame.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        state.page = body_height;
        state.body_rows = body_rows;
        state.scroll = state.scroll.min(body_rows.saturating_sub(body_height));

        let bottom = inner.bottom();
        let rows_bottom = bottom.saturating_sub(hint_rows);
        let mut y = inner.y;
        let mut row = |height: u16| -> Option<Rect> {
            if height == 0 || y.saturating_add(height) > rows_bottom {
                return None;
            }
            let rect = Rect::new(inner.x, y, inner.width, height);
            y += height;
            Some(rect)
        };

        if let Some(body_area) = row(body_height) {
            let text_area = Rect {
                width: body_width,
                ..body_area
            };
            Paragraph::new(body)
                .wrap(Wrap { trim: false })
                .scroll((state.scroll, 0))
                .render(text_area, buf);
            render_vertical_scrollbar(
                body_area,
                buf,
                usize::from(body_rows),
                usize::from(body_height),
                usize::from(state.scroll),
                self.styles.scrollbar,
            );
        }
        if gap > 0 {
            row(gap);
        }

        for (index, action) in actions.iter().enumerate() {
            let Some(action_area) = row(1) else {
                break;
            };
            let focused = state.focus == Some(Focus::Action(index));
            let line = self.action_line(index, action, focused);
            let paragraph = if focused {
                Paragraph::new(line).style(self.styles.selected)
            } else {
                Paragraph::new(line)
            };
            paragraph.render(action_area, buf);
        }

        if let Some(cancel_text) = &self.dialog.cancel_text {
            if let Some(cancel_area) = row(1) {
                let style = if state.focus == Some(Focus::Cancel) {
                    self.styles.cancel_focused
                } else {
                    self.styles.cancel
                };
                Paragraph::new(Span::styled(format!(" {cancel_text} "), style))
                    .alignment(Alignment::Center)
                    .render(cancel_area, buf);
            }
        }

        if show_hints {
            let hints: Vec<(&str, &str)> = self
                .hints
                .iter()
                .map(|(key, label)| (key.as_str(), *label))
                .collect();
            InstructionBar::new(hints)
                .styles(self.styles.key_hint, self.styles.hint)
                .render(Rect::new(inner.x, bottom - 1, inner.width, 1), buf);
        }
    }
}
