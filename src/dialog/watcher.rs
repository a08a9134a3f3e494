//! Reaction that turns a dismissal key into a resolved request.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::broker::PendingSlot;
use super::request::DismissalKey;
use super::store::DialogStore;

/// Resolves the pending future once both a dismissal key and a pending
/// future exist, then clears both. Nothing else resolves a request.
///
/// A key only resolves the request it was given for: a key recorded against
/// another request is discarded once a different future is pending.
pub struct DismissalWatcher {
    store: Arc<DialogStore>,
    pending: Arc<PendingSlot>,
}

impl DismissalWatcher {
    pub(crate) fn new(store: Arc<DialogStore>, pending: Arc<PendingSlot>) -> Self {
        Self { store, pending }
    }

    /// Apply the rule once against committed state.
    ///
    /// Returns the key that resolved a request, if any.
    pub fn evaluate(&self) -> Option<DismissalKey> {
        let controller = self.store.controller();
        let key = controller.dismissal_key?;
        let pending = self.pending.current()?;

        if controller.dismissed_request != Some(pending.id()) {
            self.store.clear_dismissal_for(controller.dismissed_request);
            tracing::debug!(
                request_id = %pending.id(),
                key = %key,
                "Discarding dismissal recorded for another request"
            );
            return None;
        }

        let delivered = pending.resolve(key.clone());
        self.store.clear_dismissal_for(controller.dismissed_request);
        self.pending.clear_if(pending.id());

        tracing::debug!(
            request_id = %pending.id(),
            key = %key,
            delivered,
            "Dismissal consumed"
        );
        Some(key)
    }

    /// Run the rule on a background task, re-evaluating whenever the
    /// controller snapshot or the pending slot changes.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut controller_rx = self.store.subscribe_controller();
        let mut pending_rx = self.pending.subscribe();

        self.evaluate();
        loop {
            tokio::select! {
                changed = controller_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = pending_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            self.evaluate();
        }
        tracing::debug!("Dismissal watcher stopped");
    }
}
