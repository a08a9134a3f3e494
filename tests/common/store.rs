//! Helpers for observing the dialog store the way a render layer would.

use std::time::Duration;

use dialog_broker::dialog::DialogStore;
use uuid::Uuid;

/// Upper bound for anything that is expected to happen.
pub const WAIT: Duration = Duration::from_secs(2);

/// Bounded wait used to assert that a future does NOT resolve.
pub const NEVER: Duration = Duration::from_millis(100);

/// Wait until a visible request other than `after` is loaded into the store.
pub async fn wait_for_request(store: &DialogStore, after: Option<Uuid>) -> Uuid {
    let mut rx = store.subscribe();
    let loaded = tokio::time::timeout(
        WAIT,
        rx.wait_for(|s| s.is_visible && s.request_id.is_some() && s.request_id != after),
    )
    .await
    .expect("dialog request was never shown")
    .expect("dialog store dropped")
    .request_id;
    loaded.expect("visible dialog without a request id")
}

/// Let spawned tasks (the dismissal watcher among them) run until `done`.
pub async fn settle(mut done: impl FnMut() -> bool) {
    tokio::time::timeout(WAIT, async {
        while !done() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition never became true");
}
