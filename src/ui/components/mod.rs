mod dialog;
mod icon;
mod markdown;
pub mod prompt_dialog;
mod scrollbar;
pub mod theme;

pub use dialog::{DialogFrame, InstructionBar};
pub use icon::{icon_span, material_glyph, FALLBACK_GLYPH};
pub use markdown::MarkdownRenderer;
pub use prompt_dialog::{Focus, PromptDialog, PromptDialogState, DEFAULT_DIALOG_WIDTH};
pub use scrollbar::{render_vertical_scrollbar, ScrollbarSymbols};
pub use theme::{
    message_text_style, DialogStyles, MarkdownPalette, SharedTheme, Theme, ThemeInfo,
    ThemeProvider, ThemedStyles,
};
