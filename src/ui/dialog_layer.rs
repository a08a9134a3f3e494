//! Render adapter: draws the dialog store and reports dismissals.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect, widgets::StatefulWidget};
use tokio::sync::watch;

use super::components::prompt_dialog::{PromptDialog, PromptDialogState};
use super::components::theme::{ThemeProvider, ThemedStyles};
use crate::config::KeybindingConfig;
use crate::dialog::{DialogProvider, DialogState};

/// Overlay that mirrors the dialog store into the terminal.
///
/// Holds the last committed snapshot; [`refresh`](Self::refresh) pulls newer
/// state before drawing or handling input.
pub struct DialogLayer {
    rx: watch::Receiver<DialogState>,
    snapshot: DialogState,
    view: PromptDialogState,
    styles: ThemedStyles,
    keys: Arc<KeybindingConfig>,
}

impl DialogLayer {
    pub fn new(
        provider: &DialogProvider,
        theme: Arc<dyn ThemeProvider>,
        keys: Arc<KeybindingConfig>,
    ) -> Self {
        let mut rx = provider.store().subscribe();
        let snapshot = rx.borrow_and_update().clone();
        let mut view = PromptDialogState::new(provider.dismisser());
        view.sync(&snapshot);
        Self {
            rx,
            snapshot,
            view,
            styles: ThemedStyles::new(theme),
            keys,
        }
    }

    /// Pull the latest committed state. Returns true if it changed.
    pub fn refresh(&mut self) -> bool {
        if !self.rx.has_changed().unwrap_or(false) {
            return false;
        }
        self.pull();
        true
    }

    /// Wait until the store commits a new state, then pull it.
    pub async fn changed(&mut self) {
        if self.rx.changed().await.is_err() {
            // Store dropped: nothing will change again
            std::future::pending::<()>().await;
        }
        self.pull();
    }

    fn pull(&mut self) {
        self.snapshot = self.rx.borrow_and_update().clone();
        self.view.sync(&self.snapshot);
        tracing::trace!(
            visible = self.snapshot.is_visible,
            request_id = ?self.snapshot.request_id,
            "Dialog layer refreshed"
        );
    }

    pub fn is_open(&self) -> bool {
        self.snapshot.is_visible
    }

    pub fn snapshot(&self) -> &DialogState {
        &self.snapshot
    }

    pub fn view(&self) -> &PromptDialogState {
        &self.view
    }

    /// Route a key to the dialog. Returns true if the dialog consumed it.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        self.refresh();
        self.view.handle_key(key, &self.snapshot, &self.keys)
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        if !self.snapshot.is_visible {
            return;
        }
        let styles = self.styles.get();
        PromptDialog::new(&self.snapshot, styles)
            .hints_from(&self.keys)
            .render(area, buf, &mut self.view);
    }
}
