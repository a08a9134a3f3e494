//! Public entry point for requesting a dialog and awaiting the user's choice.

use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::watch;
use uuid::Uuid;

use super::deferred::{deferred, Deferred, DeferredFuture, Dropped};
use super::error::{DialogError, LivenessFailure};
use super::request::{DialogRequest, DismissalKey};
use super::store::DialogStore;
use super::style::ScrollStyle;

/// What happens to a caller whose request can no longer resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupersedePolicy {
    /// Log the failure and leave the caller suspended
    #[default]
    Suspend,
    /// Return `DialogError::Superseded` / `DialogError::Abandoned`
    Reject,
}

/// Defaults applied to fields a request leaves unset.
#[derive(Debug, Clone)]
pub struct DialogDefaults {
    pub cancel_text: String,
    pub scroll_style: ScrollStyle,
    pub supersede: SupersedePolicy,
}

impl Default for DialogDefaults {
    fn default() -> Self {
        Self {
            cancel_text: "Close".to_string(),
            scroll_style: ScrollStyle::default(),
            supersede: SupersedePolicy::Suspend,
        }
    }
}

type PendingDeferred = Arc<Deferred<DismissalKey>>;

/// Holds the single pending future. Replacing it drops the previous one.
pub(crate) struct PendingSlot {
    tx: watch::Sender<Option<PendingDeferred>>,
}

impl PendingSlot {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub(crate) fn current(&self) -> Option<PendingDeferred> {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Option<PendingDeferred>> {
        self.tx.subscribe()
    }

    /// Install `deferred`, returning the one it replaced.
    pub(crate) fn install(&self, deferred: Deferred<DismissalKey>) -> Option<PendingDeferred> {
        self.tx.send_replace(Some(Arc::new(deferred)))
    }

    /// Clear the slot if it still holds the future with `id`.
    pub(crate) fn clear_if(&self, id: Uuid) {
        self.tx.send_if_modified(|slot| {
            if slot.as_ref().is_some_and(|d| d.id() == id) {
                *slot = None;
                true
            } else {
                false
            }
        });
    }

    pub(crate) fn clear(&self) -> Option<PendingDeferred> {
        self.tx.send_replace(None)
    }
}

/// Populates the store, creates the pending future and awaits it.
#[derive(Clone)]
pub struct RequestBroker {
    store: Arc<DialogStore>,
    pending: Arc<PendingSlot>,
    defaults: Arc<DialogDefaults>,
}

impl RequestBroker {
    pub(crate) fn new(
        store: Arc<DialogStore>,
        pending: Arc<PendingSlot>,
        defaults: DialogDefaults,
    ) -> Self {
        Self {
            store,
            pending,
            defaults: Arc::new(defaults),
        }
    }

    pub fn defaults(&self) -> &DialogDefaults {
        &self.defaults
    }

    /// Show `request` and wait for the user's choice.
    ///
    /// Any request still pending is superseded and will never resolve.
    /// No timeout applies: if nothing ever dismisses the dialog, this never
    /// returns.
    pub async fn show(&self, request: DialogRequest) -> Result<DismissalKey, DialogError> {
        let future = self.open(request);
        let request_id = future.id();

        match future.await {
            Ok(key) => {
                self.store.reset_content_style_for(request_id);
                tracing::debug!(request_id = %request_id, key = %key, "Dialog request resolved");
                Ok(key)
            }
            Err(Dropped) => self.unresolved(request_id).await,
        }
    }

    /// Show `request` and map the chosen key through `callback`.
    ///
    /// A failing callback is returned as `DialogError::Callback`.
    pub async fn show_with<R, F>(&self, request: DialogRequest, callback: F) -> Result<R, DialogError>
    where
        F: FnOnce(DismissalKey) -> anyhow::Result<R>,
    {
        let key = self.show(request).await?;
        Ok(callback(key)?)
    }

    /// Like [`show_with`](Self::show_with) for an async callback.
    pub async fn show_with_async<R, F, Fut>(
        &self,
        request: DialogRequest,
        callback: F,
    ) -> Result<R, DialogError>
    where
        F: FnOnce(DismissalKey) -> Fut,
        Fut: Future<Output = anyhow::Result<R>>,
    {
        let key = self.show(request).await?;
        Ok(callback(key).await?)
    }

    /// Write the request into the store and install a fresh pending future.
    fn open(&self, request: DialogRequest) -> DeferredFuture<DismissalKey> {
        let (completer, future) = deferred();
        let request_id = completer.id();

        let DialogRequest {
            title,
            message,
            pre,
            post,
            actions,
            cancel_text,
            content_style,
            scroll_style,
            message_style,
        } = request;

        tracing::debug!(
            request_id = %request_id,
            title = title.as_deref().unwrap_or_default(),
            actions = actions.len(),
            "Opening dialog request"
        );

        let store = &self.store;
        store.set_request_id(Some(request_id));
        store.set_title(title);
        store.set_cancel_text(cancel_text.resolve(&self.defaults.cancel_text));
        store.set_actions(actions);
        store.set_message(message);
        store.set_pre(pre);
        store.set_post(post);
        store.set_content_style(content_style);
        store.set_scroll_style(scroll_style.unwrap_or(self.defaults.scroll_style));
        store.set_message_style(message_style);
        store.clear_dismissal();
        store.set_visible(true);

        if let Some(previous) = self.pending.install(completer) {
            tracing::debug!(
                request_id = %request_id,
                superseded = %previous.id(),
                "Pending dialog request superseded"
            );
        }

        future
    }

    async fn unresolved<T>(&self, request_id: Uuid) -> Result<T, DialogError> {
        let loaded = self.store.with_state(|s| s.request_id);
        let failure = if loaded == Some(request_id) {
            LivenessFailure::Abandoned
        } else {
            LivenessFailure::Superseded
        };

        match self.defaults.supersede {
            SupersedePolicy::Reject => Err(DialogError::unresolved(failure, request_id)),
            SupersedePolicy::Suspend => {
                tracing::warn!(
                    request_id = %request_id,
                    failure = ?failure,
                    "Dialog request can no longer resolve; caller stays suspended"
                );
                std::future::pending().await
            }
        }
    }
}

