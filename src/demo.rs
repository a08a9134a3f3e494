//! Scripted request sequences driven by the demo binary.
//!
//! Each scenario runs on its own task, awaits dialogs through the broker and
//! reports outcomes over a channel, the way application code would.

use clap::ValueEnum;
use tokio::sync::mpsc;

use crate::dialog::{
    ActionDescriptor, ContentStyle, DialogContent, DialogError, DialogRequest, RequestBroker, Rgb,
    ScrollStyle, ShortcutContent, TextStyle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoScenario {
    /// Yes/No confirmation mapped through a callback
    Confirm,
    /// Long scrollable message with only a cancel control
    Info,
    /// Several prompts, each depending on the previous answer
    Chain,
}

impl DemoScenario {
    /// Run the scenario to completion, sending one line per outcome.
    pub async fn run(
        self,
        broker: RequestBroker,
        log: mpsc::UnboundedSender<String>,
    ) -> Result<(), DialogError> {
        tracing::info!(scenario = ?self, "Demo scenario started");
        match self {
            DemoScenario::Confirm => confirm(&broker, &log).await?,
            DemoScenario::Info => info(&broker, &log).await?,
            DemoScenario::Chain => chain(&broker, &log).await?,
        }
        // Receiver gone means the UI has quit
        let _ = log.send("Scenario finished. Press q to quit.".to_string());
        Ok(())
    }
}

pub fn confirm_request() -> DialogRequest {
    DialogRequest::new()
        .title("Delete file?")
        .message("This will permanently delete `notes.txt`.\n\nThis **cannot** be undone.")
        .action(
            ActionDescriptor::new("yes", "Delete")
                .material_icon("delete")
                .icon_prop("color", "#ff5555")
                .row_prop("bold", true),
        )
        .action(ActionDescriptor::new("no", "Keep").material_icon("close"))
        .no_cancel()
}

async fn confirm(broker: &RequestBroker, log: &mpsc::UnboundedSender<String>) -> Result<(), DialogError> {
    let answer = broker
        .show_with(confirm_request(), |key| Ok(key.as_str().to_uppercase()))
        .await?;
    let _ = log.send(format!("confirm -> {answer}"));
    Ok(())
}

async fn info(broker: &RequestBroker, log: &mpsc::UnboundedSender<String>) -> Result<(), DialogError> {
    let mut message = String::from("# Release notes\n\n");
    for i in 1..=30 {
        message.push_str(&format!("- Change number {i}\n"));
    }
    message.push_str("\n| Area | Status |\n|------|--------|\n| Core | done |\n| UI | done |\n");

    let request = DialogRequest::new()
        .title("What's new")
        .message(message)
        .cancel_text("Got it")
        .scroll_style(ScrollStyle::with_max_height(12))
        .message_style(TextStyle::default().italic(true));
    let key = broker.show(request).await?;
    let _ = log.send(format!("info -> {key}"));
    Ok(())
}

async fn chain(broker: &RequestBroker, log: &mpsc::UnboundedSender<String>) -> Result<(), DialogError> {
    let language = broker
        .show(
            DialogRequest::new()
                .title("Pick a language")
                .actions([
                    ActionDescriptor::new("rust", "Rust").glyph("🦀").description("fast"),
                    ActionDescriptor::new("go", "Go").description("simple"),
                    ActionDescriptor::new("zig", "Zig").description("new"),
                ])
                .content_style(ContentStyle {
                    width: Some(48),
                    border_color: Some(Rgb(0xbd, 0x93, 0xf9)),
                    ..Default::default()
                }),
        )
        .await?;
    let _ = log.send(format!("chain[1] -> {language}"));
    if language.is_cancel() {
        return Ok(());
    }

    let confirmed = broker
        .show(
            DialogRequest::new()
                .title("Confirm")
                .pre(DialogContent::interactive(
                    ShortcutContent::new(format!("You picked {language}.\nPress y or n."))
                        .shortcut('y', "yes")
                        .shortcut('n', "no"),
                ))
                .post(DialogContent::markdown("_Esc closes without answering._"))
                .cancel_text("Back"),
        )
        .await?;
    let _ = log.send(format!("chain[2] -> {confirmed}"));
    Ok(())
}
