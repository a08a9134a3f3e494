//! Request lifecycle through a mounted provider: defaulting, resolution,
//! cleanup, supersession and callbacks.

use super::common::store::{settle, wait_for_request, NEVER, WAIT};
use dialog_broker::dialog::{ContentStyle, LivenessFailure};
use dialog_broker::{
    ActionDescriptor, DialogDefaults, DialogError, DialogProvider, DialogRequest, DismissalKey,
    SupersedePolicy,
};
use proptest::prelude::*;
use tokio::time::timeout;
use tokio_test::{assert_pending, assert_ready_ok};

fn reject_defaults() -> DialogDefaults {
    DialogDefaults {
        supersede: SupersedePolicy::Reject,
        ..Default::default()
    }
}

fn yes_no() -> DialogRequest {
    DialogRequest::new()
        .title("Confirm")
        .action(ActionDescriptor::new("yes", "Yes"))
        .action(ActionDescriptor::new("no", "No"))
}

#[tokio::test]
async fn test_confirm_without_cancel_resolves_action_key() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();
    let broker = provider.broker();
    let task = tokio::spawn(async move { broker.show(yes_no().no_cancel()).await });

    wait_for_request(&store, None).await;
    assert_eq!(store.state().cancel_text, None);

    provider.dismisser().dismiss("yes");
    let key = timeout(WAIT, task).await.unwrap().unwrap().unwrap();
    assert_eq!(key, "yes");
}

#[tokio::test]
async fn test_info_resolves_cancel_with_default_label() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();
    let broker = provider.broker();
    let task = tokio::spawn(async move {
        broker
            .show(DialogRequest::new().title("Info").message("**bold**"))
            .await
    });

    wait_for_request(&store, None).await;
    assert_eq!(store.state().cancel_text.as_deref(), Some("Close"));

    provider.dismisser().cancel();
    let key = timeout(WAIT, task).await.unwrap().unwrap().unwrap();
    assert!(key.is_cancel());
}

#[tokio::test]
async fn test_callback_maps_cancel() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();
    let broker = provider.broker();
    let task = tokio::spawn(async move {
        broker
            .show_with(
                DialogRequest::new().title("Info").message("**bold**"),
                |key| Ok(key.as_str().to_uppercase()),
            )
            .await
    });

    wait_for_request(&store, None).await;
    provider.dismisser().dismiss("cancel");
    let result = timeout(WAIT, task).await.unwrap().unwrap().unwrap();
    assert_eq!(result, "CANCEL");
}

#[tokio::test]
async fn test_callback_transform_on_action() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();
    let broker = provider.broker();
    let task = tokio::spawn(async move {
        broker
            .show_with(
                DialogRequest::new()
                    .title("T")
                    .action(ActionDescriptor::new("yes", "Yes")),
                |key| Ok(key.as_str().to_uppercase()),
            )
            .await
    });

    wait_for_request(&store, None).await;
    provider.dismisser().dismiss("yes");
    assert_eq!(timeout(WAIT, task).await.unwrap().unwrap().unwrap(), "YES");
}

#[tokio::test]
async fn test_async_callback() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();
    let broker = provider.broker();
    let task = tokio::spawn(async move {
        broker
            .show_with_async(yes_no(), |key| async move {
                Ok::<_, anyhow::Error>(key.into_string().len())
            })
            .await
    });

    wait_for_request(&store, None).await;
    provider.dismisser().dismiss("no");
    assert_eq!(timeout(WAIT, task).await.unwrap().unwrap().unwrap(), 2);
}

#[tokio::test]
async fn test_callback_error_propagates() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();
    let broker = provider.broker();
    let task = tokio::spawn(async move {
        broker
            .show_with(yes_no(), |_key| -> anyhow::Result<()> {
                anyhow::bail!("callback failed")
            })
            .await
    });

    wait_for_request(&store, None).await;
    provider.dismisser().dismiss("yes");
    let err = timeout(WAIT, task).await.unwrap().unwrap().unwrap_err();
    assert!(matches!(err, DialogError::Callback(_)));
    assert_eq!(err.liveness(), None);
    assert_eq!(err.to_string(), "callback failed");
}

#[tokio::test]
async fn test_defaults_fill_unset_fields() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();
    let broker = provider.broker();
    let task = tokio::spawn(async move { broker.show(DialogRequest::new().title("T")).await });

    wait_for_request(&store, None).await;
    let state = store.state();
    assert_eq!(state.title.as_deref(), Some("T"));
    assert_eq!(state.cancel_text.as_deref(), Some("Close"));
    assert!(state.actions.is_empty());
    assert_eq!(state.scroll_style.max_height, 300);
    assert!(state.content_style.is_empty());
    assert!(state.message.is_none());

    task.abort();
}

#[tokio::test]
async fn test_configured_defaults_apply() {
    let provider = DialogProvider::mount(DialogDefaults {
        cancel_text: "Dismiss".to_string(),
        ..Default::default()
    });
    let store = provider.store();
    let broker = provider.broker();
    let task = tokio::spawn(async move { broker.show(DialogRequest::new().title("T")).await });

    wait_for_request(&store, None).await;
    assert_eq!(store.state().cancel_text.as_deref(), Some("Dismiss"));
    task.abort();
}

#[tokio::test]
async fn test_resolution_cleans_up() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();
    let broker = provider.broker();
    let task = tokio::spawn(async move {
        broker
            .show(yes_no().content_style(ContentStyle {
                width: Some(40),
                padding_x: Some(3),
                ..Default::default()
            }))
            .await
    });

    wait_for_request(&store, None).await;
    assert_eq!(store.state().content_style.width, Some(40));
    assert!(provider.has_pending());

    provider.dismisser().dismiss("no");
    timeout(WAIT, task).await.unwrap().unwrap().unwrap();

    let state = store.state();
    assert!(state.content_style.is_empty());
    assert!(state.dismissal_key.is_none());
    assert!(!state.is_visible);
    assert!(!provider.has_pending());
}

#[tokio::test]
async fn test_stale_key_does_not_resolve_next_request() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();
    let broker = provider.broker();

    // Nothing pending: the key is kept but resolves nothing
    provider.dismisser().dismiss("stale");
    assert_eq!(store.state().dismissal_key, Some(DismissalKey::from("stale")));

    let mut show = tokio_test::task::spawn(broker.show(yes_no()));
    assert_pending!(show.poll());
    assert!(store.state().dismissal_key.is_none());

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_pending!(show.poll());

    provider.dismisser().dismiss("yes");
    settle(|| show.is_woken()).await;
    let key = assert_ready_ok!(show.poll());
    assert_eq!(key, "yes");
}

#[tokio::test]
async fn test_superseded_request_stays_pending() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();

    let broker = provider.broker();
    let mut first = tokio::spawn(async move {
        broker.show(DialogRequest::new().title("A")).await
    });
    let first_id = wait_for_request(&store, None).await;

    let broker = provider.broker();
    let second = tokio::spawn(async move {
        broker.show(DialogRequest::new().title("B")).await
    });
    wait_for_request(&store, Some(first_id)).await;
    assert_eq!(store.state().title.as_deref(), Some("B"));

    provider.dismisser().dismiss("anything");
    let key = timeout(WAIT, second).await.unwrap().unwrap().unwrap();
    assert_eq!(key, "anything");

    assert!(timeout(NEVER, &mut first).await.is_err());
    first.abort();
}

#[tokio::test]
async fn test_superseded_request_rejected_under_reject_policy() {
    let provider = DialogProvider::mount(reject_defaults());
    let store = provider.store();

    let broker = provider.broker();
    let first = tokio::spawn(async move { broker.show(yes_no()).await });
    let first_id = wait_for_request(&store, None).await;

    let broker = provider.broker();
    let second = tokio::spawn(async move { broker.show(yes_no()).await });
    wait_for_request(&store, Some(first_id)).await;

    let err = timeout(WAIT, first).await.unwrap().unwrap().unwrap_err();
    assert_eq!(err.liveness(), Some(LivenessFailure::Superseded));
    assert!(matches!(err, DialogError::Superseded { request_id } if request_id == first_id));

    provider.dismisser().dismiss("yes");
    assert_eq!(timeout(WAIT, second).await.unwrap().unwrap().unwrap(), "yes");
}

#[tokio::test]
async fn test_dropping_provider_abandons_request() {
    let provider = DialogProvider::mount(reject_defaults());
    let store = provider.store();
    let broker = provider.broker();
    let task = tokio::spawn(async move { broker.show(yes_no()).await });
    let request_id = wait_for_request(&store, None).await;

    drop(provider);

    let err = timeout(WAIT, task).await.unwrap().unwrap().unwrap_err();
    assert!(matches!(err, DialogError::Abandoned { request_id: id } if id == request_id));
    assert!(!store.is_visible());
}

#[tokio::test]
async fn test_dropping_provider_suspends_caller_by_default() {
    let provider = DialogProvider::mount(DialogDefaults::default());
    let store = provider.store();
    let broker = provider.broker();
    let mut task = tokio::spawn(async move { broker.show(yes_no()).await });
    wait_for_request(&store, None).await;

    drop(provider);

    assert!(timeout(NEVER, &mut task).await.is_err());
    task.abort();
}

fn action_keys() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,8}", 1..6)
        .prop_map(|keys| keys.into_iter().filter(|k| k != "cancel").collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any offered key resolves the pending request with exactly that key,
    /// and later dismissals leave the resolved result untouched.
    #[test]
    fn prop_single_resolution(
        keys in action_keys(),
        pick in any::<prop::sample::Index>(),
        late in "[a-z]{1,8}",
    ) {
        let mut offered: Vec<String> = keys.clone();
        offered.push("cancel".to_string());
        let chosen = pick.get(&offered).clone();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (resolved, leftover) = runtime.block_on(async {
            let provider = DialogProvider::mount(DialogDefaults::default());
            let store = provider.store();
            let broker = provider.broker();
            let request = DialogRequest::new()
                .title("T")
                .actions(keys.iter().map(|k| ActionDescriptor::new(k.as_str(), k.to_uppercase())));
            let task = tokio::spawn(async move { broker.show(request).await });

            wait_for_request(&store, None).await;
            provider.dismisser().dismiss(chosen.as_str());
            let resolved = timeout(WAIT, task).await.unwrap().unwrap().unwrap();

            // No pending request: the late key is parked, not delivered
            provider.dismisser().dismiss(late.as_str());
            tokio::task::yield_now().await;
            (resolved, store.state().dismissal_key)
        });

        prop_assert_eq!(resolved.as_str(), chosen.as_str());
        prop_assert_eq!(leftover, Some(DismissalKey::from(late.as_str())));
    }
}
