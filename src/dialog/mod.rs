//! Awaitable modal dialogs.
//!
//! A [`DialogProvider`] owns the state store, the request broker and the
//! dismissal watcher for one session. Application code awaits
//! [`RequestBroker::show`]; the render layer reads the store and reports the
//! user's choice through a [`Dismisser`].
//!
//! ```rust,ignore
//! let provider = DialogProvider::mount(DialogDefaults::default());
//! let broker = provider.broker();
//! let key = broker
//!     .show(DialogRequest::new().title("Delete?").action(ActionDescriptor::new("yes", "Yes")))
//!     .await?;
//! ```

mod broker;
pub mod deferred;
mod error;
mod request;
mod store;
pub mod style;
mod watcher;

use std::sync::Arc;

use tokio::task::JoinHandle;

pub use broker::{DialogDefaults, RequestBroker, SupersedePolicy};
pub use error::{DialogError, LivenessFailure};
pub use request::{
    ActionDescriptor, CancelText, DialogContent, DialogRequest, DismissalKey, IconSource,
    InteractiveContent, PropMap, ShortcutContent,
};
pub use store::{DialogController, DialogState, DialogStore, Dismisser};
pub use style::{ContentStyle, Rgb, ScrollStyle, TextStyle};
pub use watcher::DismissalWatcher;

use broker::PendingSlot;

/// Composition root for the dialog system.
///
/// Mounting spawns the dismissal watcher on the current tokio runtime.
/// Dropping the provider stops the watcher and abandons any pending request.
pub struct DialogProvider {
    store: Arc<DialogStore>,
    pending: Arc<PendingSlot>,
    broker: RequestBroker,
    watcher: JoinHandle<()>,
}

impl DialogProvider {
    /// Create the store and broker and start the watcher.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(defaults: DialogDefaults) -> Self {
        let store = Arc::new(DialogStore::new());
        let pending = Arc::new(PendingSlot::new());
        let broker = RequestBroker::new(store.clone(), pending.clone(), defaults);
        let watcher = DismissalWatcher::new(store.clone(), pending.clone()).spawn();

        tracing::debug!("Dialog provider mounted");
        Self {
            store,
            pending,
            broker,
            watcher,
        }
    }

    pub fn broker(&self) -> RequestBroker {
        self.broker.clone()
    }

    pub fn store(&self) -> Arc<DialogStore> {
        self.store.clone()
    }

    pub fn dismisser(&self) -> Dismisser {
        Dismisser::new(self.store.clone())
    }

    /// Whether a request is waiting for the user.
    pub fn has_pending(&self) -> bool {
        self.pending.current().is_some()
    }
}

impl Drop for DialogProvider {
    fn drop(&mut self) {
        self.watcher.abort();
        if let Some(abandoned) = self.pending.clear() {
            tracing::debug!(request_id = %abandoned.id(), "Provider dropped with a pending request");
        }
        self.store.set_visible(false);
    }
}
