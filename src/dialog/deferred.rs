//! Single-resolution future bridging two independent call sites.
//!
//! A [`Deferred`] is the completer side: it can be resolved at most once and
//! may be dropped without resolving. A [`DeferredFuture`] is the single reader.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Completer half of a single-resolution future.
#[derive(Debug)]
pub struct Deferred<T> {
    id: Uuid,
    tx: Mutex<Option<oneshot::Sender<T>>>,
}

/// Reader half; resolves with `Err(Dropped)` if the completer is discarded.
#[derive(Debug)]
pub struct DeferredFuture<T> {
    id: Uuid,
    rx: oneshot::Receiver<T>,
}

/// The completer was dropped before resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deferred value was discarded without resolution")]
pub struct Dropped;

/// Create a linked completer/reader pair.
pub fn deferred<T>() -> (Deferred<T>, DeferredFuture<T>) {
    let id = Uuid::new_v4();
    let (tx, rx) = oneshot::channel();
    (
        Deferred {
            id,
            tx: Mutex::new(Some(tx)),
        },
        DeferredFuture { id, rx },
    )
}

impl<T> Deferred<T> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Resolve with `value`. Returns false if already resolved or nobody awaits.
    pub fn resolve(&self, value: T) -> bool {
        let Some(tx) = self.tx.lock().take() else {
            tracing::debug!(deferred_id = %self.id, "Ignoring second resolution");
            return false;
        };
        if tx.send(value).is_err() {
            tracing::debug!(deferred_id = %self.id, "Resolved deferred has no reader");
            return false;
        }
        true
    }

    pub fn is_resolved(&self) -> bool {
        self.tx.lock().is_none()
    }
}

impl<T> DeferredFuture<T> {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl<T> Future for DeferredFuture<T> {
    type Output = Result<T, Dropped>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|r| r.map_err(|_| Dropped))
    }
}
