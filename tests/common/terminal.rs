//! TUI testing utilities using Ratatui's TestBackend
//!
//! Renders the dialog layer into a test buffer and converts the output to
//! strings for assertions.

use dialog_broker::DialogLayer;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

/// Create a test terminal with standard dimensions (80x24)
pub fn create_test_terminal() -> Terminal<TestBackend> {
    create_test_terminal_sized(80, 24)
}

/// Create a test terminal with custom dimensions
pub fn create_test_terminal_sized(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).expect("Failed to create test terminal")
}

/// Draw the dialog layer full-screen and return a copy of the buffer.
pub fn render_layer(terminal: &mut Terminal<TestBackend>, layer: &mut DialogLayer) -> Buffer {
    terminal
        .draw(|f| {
            let area = f.area();
            layer.render(area, f.buffer_mut());
        })
        .expect("Failed to draw dialog layer");
    terminal.backend().buffer().clone()
}

/// One string per buffer row, trailing whitespace trimmed.
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.y..area.y + area.height)
        .map(|y| {
            let row: String = (area.x..area.x + area.width)
                .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol()))
                .collect();
            row.trim_end().to_string()
        })
        .collect()
}

/// Check if the buffer contains a string anywhere
pub fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
    buffer_lines(buffer).iter().any(|line| line.contains(text))
}

/// Position of the first cell where `text` starts, scanning row by row.
pub fn find_text(buffer: &Buffer, text: &str) -> Option<(u16, u16)> {
    let area = buffer.area;
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let mut tail = String::new();
            for cx in x..area.x + area.width {
                if let Some(cell) = buffer.cell((cx, y)) {
                    tail.push_str(cell.symbol());
                }
                if tail.len() >= text.len() {
                    break;
                }
            }
            if tail.starts_with(text) {
                return Some((x, y));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_buffer_lines_trim_trailing_space() {
        let mut terminal = create_test_terminal_sized(10, 2);
        terminal
            .draw(|f| f.render_widget(Paragraph::new("Hi"), f.area()))
            .unwrap();

        let lines = buffer_lines(terminal.backend().buffer());
        assert_eq!(lines, vec!["Hi".to_string(), String::new()]);
    }

    #[test]
    fn test_find_text() {
        let mut terminal = create_test_terminal_sized(20, 3);
        terminal
            .draw(|f| f.render_widget(Paragraph::new("\n  needle"), f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(find_text(buffer, "needle"), Some((2, 1)));
        assert!(find_text(buffer, "haystack").is_none());
        assert!(buffer_contains(buffer, "needle"));
    }
}
