//! The terminal render layer against live requests: what is drawn, how keys
//! resolve requests, and theme changes.

use std::sync::Arc;

use super::common::store::WAIT;
use super::common::terminal::{
    buffer_contains, buffer_lines, create_test_terminal, find_text, render_layer,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dialog_broker::config::KeybindingConfig;
use dialog_broker::demo::confirm_request;
use dialog_broker::dialog::{DialogContent, ScrollStyle, ShortcutContent};
use dialog_broker::ui::components::theme::SharedTheme;
use dialog_broker::{
    ActionDescriptor, DialogDefaults, DialogError, DialogLayer, DialogProvider, DialogRequest,
    DismissalKey,
};
use tokio::task::JoinHandle;
use tokio::time::timeout;

struct Harness {
    provider: DialogProvider,
    layer: DialogLayer,
    theme: Arc<SharedTheme>,
}

impl Harness {
    fn new() -> Self {
        let provider = DialogProvider::mount(DialogDefaults::default());
        let theme = Arc::new(SharedTheme::default());
        let layer = DialogLayer::new(
            &provider,
            theme.clone(),
            Arc::new(KeybindingConfig::defaults()),
        );
        Self {
            provider,
            layer,
            theme,
        }
    }

    /// Spawn `show` and wait until the layer sees the dialog open.
    async fn show(
        &mut self,
        request: DialogRequest,
    ) -> JoinHandle<Result<DismissalKey, DialogError>> {
        let broker = self.provider.broker();
        let task = tokio::spawn(async move { broker.show(request).await });
        timeout(WAIT, async {
            while !self.layer.is_open() {
                self.layer.changed().await;
            }
        })
        .await
        .expect("dialog never opened");
        task
    }

    fn press(&mut self, code: KeyCode) -> bool {
        self.layer
            .handle_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }
}

async fn resolved(task: JoinHandle<Result<DismissalKey, DialogError>>) -> DismissalKey {
    timeout(WAIT, task)
        .await
        .expect("request never resolved")
        .expect("request task panicked")
        .expect("request failed")
}

#[tokio::test]
async fn test_confirm_dialog_renders_actions_without_cancel() {
    let mut harness = Harness::new();
    let task = harness.show(confirm_request()).await;

    let mut terminal = create_test_terminal();
    let buffer = render_layer(&mut terminal, &mut harness.layer);

    assert!(buffer_contains(&buffer, "Delete file?"));
    assert!(buffer_contains(&buffer, "notes.txt"));
    assert!(buffer_contains(&buffer, "cannot"));
    assert!(!buffer_contains(&buffer, "**cannot**"));
    assert!(buffer_contains(&buffer, "Delete"));
    assert!(buffer_contains(&buffer, "Keep"));
    assert!(!buffer_contains(&buffer, "Close"));

    // Actions keep their order; the title row also says "Delete"
    let lines = buffer_lines(&buffer);
    let row_of = |needle: &str| {
        lines
            .iter()
            .position(|l| l.contains(needle) && !l.contains("file?"))
            .unwrap()
    };
    assert!(row_of("Delete") < row_of("Keep"));
    assert!(!buffer_contains(&buffer, "close"));

    // Esc is swallowed: no cancel outcome exists for this request
    assert!(harness.press(KeyCode::Esc));
    assert!(harness.layer.is_open());

    assert!(harness.press(KeyCode::Char('2')));
    assert_eq!(resolved(task).await, "no");
}

#[tokio::test]
async fn test_default_cancel_control_resolves_cancel() {
    let mut harness = Harness::new();
    let task = harness
        .show(DialogRequest::new().title("Info").message("**bold**"))
        .await;

    let mut terminal = create_test_terminal();
    let buffer = render_layer(&mut terminal, &mut harness.layer);
    assert!(buffer_contains(&buffer, "bold"));
    assert!(!buffer_contains(&buffer, "**"));
    assert!(buffer_contains(&buffer, " Close "));

    // No actions: focus starts on the cancel control
    assert!(harness.press(KeyCode::Enter));
    assert!(resolved(task).await.is_cancel());
}

#[tokio::test]
async fn test_escape_resolves_cancel_when_control_shown() {
    let mut harness = Harness::new();
    let task = harness
        .show(
            DialogRequest::new()
                .title("Save?")
                .action(ActionDescriptor::new("save", "Save"))
                .cancel_text("Not now"),
        )
        .await;

    let mut terminal = create_test_terminal();
    let buffer = render_layer(&mut terminal, &mut harness.layer);
    assert!(buffer_contains(&buffer, "Not now"));

    assert!(harness.press(KeyCode::Esc));
    assert!(resolved(task).await.is_cancel());
}

#[tokio::test]
async fn test_body_order_and_interactive_content() {
    let mut harness = Harness::new();
    let task = harness
        .show(
            DialogRequest::new()
                .title("Order")
                .pre(DialogContent::interactive(
                    ShortcutContent::new("PRE: press y").shortcut('y', "yes"),
                ))
                .message("MESSAGE")
                .post(DialogContent::text("POST")),
        )
        .await;

    let mut terminal = create_test_terminal();
    let buffer = render_layer(&mut terminal, &mut harness.layer);
    let (_, pre) = find_text(&buffer, "PRE").unwrap();
    let (_, message) = find_text(&buffer, "MESSAGE").unwrap();
    let (_, post) = find_text(&buffer, "POST").unwrap();
    assert!(pre < message && message < post);

    assert!(harness.press(KeyCode::Char('y')));
    assert_eq!(resolved(task).await, "yes");
}

#[tokio::test]
async fn test_long_message_is_bounded_and_scrolls() {
    let mut harness = Harness::new();
    let message = (1..=40)
        .map(|i| format!("Line {i}"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let task = harness
        .show(
            DialogRequest::new()
                .title("Long")
                .message(message)
                .scroll_style(ScrollStyle::with_max_height(6)),
        )
        .await;

    let mut terminal = create_test_terminal();
    let buffer = render_layer(&mut terminal, &mut harness.layer);
    assert!(buffer_contains(&buffer, "Line 1"));
    assert!(!buffer_contains(&buffer, "Line 40"));
    let drawn = buffer_lines(&buffer)
        .iter()
        .filter(|line| line.contains("Line "))
        .count();
    assert!(drawn <= 6, "body exceeded max height: {drawn} rows");

    assert!(harness.press(KeyCode::PageDown));
    assert!(harness.layer.view().scroll() > 0);
    let buffer = render_layer(&mut terminal, &mut harness.layer);
    assert!(!buffer_contains(&buffer, "Line 1 "));

    assert!(harness.press(KeyCode::Esc));
    assert!(resolved(task).await.is_cancel());
}

#[tokio::test]
async fn test_next_request_redraws_with_fresh_focus() {
    let mut harness = Harness::new();
    let first = harness
        .show(
            DialogRequest::new()
                .title("First")
                .action(ActionDescriptor::new("a", "Alpha"))
                .action(ActionDescriptor::new("b", "Beta")),
        )
        .await;
    harness.press(KeyCode::Down);
    harness.press(KeyCode::Enter);
    assert_eq!(resolved(first).await, "b");
    harness.layer.refresh();
    assert!(!harness.layer.is_open());

    let second = harness
        .show(
            DialogRequest::new()
                .title("Second")
                .action(ActionDescriptor::new("c", "Gamma"))
                .action(ActionDescriptor::new("d", "Delta")),
        )
        .await;
    let mut terminal = create_test_terminal();
    let buffer = render_layer(&mut terminal, &mut harness.layer);
    assert!(buffer_contains(&buffer, "Second"));
    assert!(!buffer_contains(&buffer, "First"));

    harness.press(KeyCode::Enter);
    assert_eq!(resolved(second).await, "c");
}

#[tokio::test]
async fn test_theme_change_restyles_open_dialog() {
    let mut harness = Harness::new();
    let task = harness
        .show(DialogRequest::new().title("Themed").message("Body"))
        .await;

    let mut terminal = create_test_terminal();
    let buffer = render_layer(&mut terminal, &mut harness.layer);
    let (x, y) = find_text(&buffer, "Body").unwrap();
    let dark = buffer[(x, y)].style();

    harness.theme.toggle();
    let buffer = render_layer(&mut terminal, &mut harness.layer);
    let light = buffer[(x, y)].style();
    assert_ne!(dark.fg, light.fg);
    assert_ne!(dark.bg, light.bg);

    harness.provider.dismisser().cancel();
    assert!(resolved(task).await.is_cancel());
}

#[tokio::test]
async fn test_hidden_dialog_draws_nothing() {
    let mut harness = Harness::new();
    let mut terminal = create_test_terminal();
    let buffer = render_layer(&mut terminal, &mut harness.layer);
    assert!(buffer_lines(&buffer).iter().all(|line| line.is_empty()));
    assert!(!harness.press(KeyCode::Enter));
}
