//! Dialog state store.
//!
//! Holds the display fields of the active request, the visibility flag and the
//! most recent dismissal key. All writes go through the store's own methods and
//! are serialized by a write lock; readers subscribe to `watch` channels and
//! only ever observe committed state.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use uuid::Uuid;

use super::request::{ActionDescriptor, DialogContent, DismissalKey};
use super::style::{ContentStyle, ScrollStyle, TextStyle};

/// Snapshot of everything the render layer needs to draw the dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogState {
    pub is_visible: bool,
    /// Identifies the request currently loaded into the store
    pub request_id: Option<Uuid>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub pre: Option<DialogContent>,
    pub post: Option<DialogContent>,
    pub actions: Vec<ActionDescriptor>,
    /// `None` hides the cancel control
    pub cancel_text: Option<String>,
    pub content_style: ContentStyle,
    pub scroll_style: ScrollStyle,
    pub message_style: Option<TextStyle>,
    /// Last key reported by the render layer, cleared once consumed
    pub dismissal_key: Option<DismissalKey>,
    /// Request that was loaded when `dismissal_key` was written
    pub dismissed_request: Option<Uuid>,
}

/// Derived view of the fields that drive request resolution.
///
/// `generation` changes only when cancel text, the dismissal or visibility
/// change; writes to other fields leave the controller untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogController {
    pub cancel_text: Option<String>,
    pub dismissal_key: Option<DismissalKey>,
    pub dismissed_request: Option<Uuid>,
    pub is_visible: bool,
    pub generation: u64,
}

impl DialogController {
    fn matches(&self, state: &DialogState) -> bool {
        self.cancel_text == state.cancel_text
            && self.dismissal_key == state.dismissal_key
            && self.dismissed_request == state.dismissed_request
            && self.is_visible == state.is_visible
    }
}

pub struct DialogStore {
    state: watch::Sender<DialogState>,
    controller: watch::Sender<DialogController>,
    write_lock: Mutex<()>,
}

impl DialogStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(DialogState::default());
        let (controller, _) = watch::channel(DialogController::default());
        Self {
            state,
            controller,
            write_lock: Mutex::new(()),
        }
    }

    /// Clone of the committed state.
    pub fn state(&self) -> DialogState {
        self.state.borrow().clone()
    }

    /// Read the committed state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&DialogState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn controller(&self) -> DialogController {
        self.controller.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DialogState> {
        self.state.subscribe()
    }

    pub fn subscribe_controller(&self) -> watch::Receiver<DialogController> {
        self.controller.subscribe()
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().is_visible
    }

    // =========================================================================
    // Setters
    // =========================================================================

    pub fn set_request_id(&self, request_id: Option<Uuid>) {
        self.write(|s| s.request_id = request_id);
    }

    pub fn set_title(&self, title: Option<String>) {
        self.write(|s| s.title = title);
    }

    pub fn set_message(&self, message: Option<String>) {
        self.write(|s| s.message = message);
    }

    pub fn set_pre(&self, pre: Option<DialogContent>) {
        self.write(|s| s.pre = pre);
    }

    pub fn set_post(&self, post: Option<DialogContent>) {
        self.write(|s| s.post = post);
    }

    pub fn set_actions(&self, actions: Vec<ActionDescriptor>) {
        self.write(|s| s.actions = actions);
    }

    pub fn set_cancel_text(&self, cancel_text: Option<String>) {
        self.write(|s| s.cancel_text = cancel_text);
    }

    pub fn set_visible(&self, visible: bool) {
        self.write(|s| s.is_visible = visible);
    }

    pub fn set_content_style(&self, style: ContentStyle) {
        self.write(|s| s.content_style = style);
    }

    pub fn set_scroll_style(&self, style: ScrollStyle) {
        self.write(|s| s.scroll_style = style);
    }

    pub fn set_message_style(&self, style: Option<TextStyle>) {
        self.write(|s| s.message_style = style);
    }

    pub fn clear_dismissal(&self) {
        self.write(|s| {
            s.dismissal_key = None;
            s.dismissed_request = None;
        });
    }

    /// Clear the dismissal, but only if it was recorded against
    /// `dismissed_request`. A newer dismissal is left in place.
    pub(crate) fn clear_dismissal_for(&self, dismissed_request: Option<Uuid>) {
        self.write(|s| {
            if s.dismissed_request == dismissed_request {
                s.dismissal_key = None;
                s.dismissed_request = None;
            }
        });
    }

    /// Reset the content style, but only while `request_id` is still loaded.
    pub(crate) fn reset_content_style_for(&self, request_id: Uuid) {
        self.write(|s| {
            if s.request_id == Some(request_id) {
                s.content_style = ContentStyle::default();
            }
        });
    }

    /// Record the user's choice against the loaded request and hide the
    /// dialog in one write.
    ///
    /// Empty keys are ignored: they could never resolve a pending request.
    pub fn dismiss(&self, key: impl Into<DismissalKey>) {
        let key = key.into();
        if key.is_empty() {
            tracing::warn!("Ignoring dialog dismissal with an empty key");
            return;
        }
        tracing::debug!(key = %key, "Dialog dismissed");
        self.write(|s| {
            s.dismissal_key = Some(key);
            s.dismissed_request = s.request_id;
            s.is_visible = false;
        });
    }

    fn write(&self, f: impl FnOnce(&mut DialogState)) {
        let _guard = self.write_lock.lock();
        self.state.send_modify(f);

        let state = self.state.borrow();
        self.controller.send_if_modified(|controller| {
            if controller.matches(&state) {
                return false;
            }
            controller.cancel_text = state.cancel_text.clone();
            controller.dismissal_key = state.dismissal_key.clone();
            controller.dismissed_request = state.dismissed_request;
            controller.is_visible = state.is_visible;
            controller.generation += 1;
            true
        });
    }
}

impl Default for DialogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle given to the render layer. Dismissal is the only write it can make.
#[derive(Clone)]
pub struct Dismisser {
    store: Arc<DialogStore>,
}

impl Dismisser {
    pub fn new(store: Arc<DialogStore>) -> Self {
        Self { store }
    }

    pub fn dismiss(&self, key: impl Into<DismissalKey>) {
        self.store.dismiss(key);
    }

    /// Cancel control and implicit close gesture.
    pub fn cancel(&self) {
        self.store.dismiss(DismissalKey::cancel());
    }
}

impl std::fmt::Debug for Dismisser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dismisser").finish_non_exhaustive()
    }
}
