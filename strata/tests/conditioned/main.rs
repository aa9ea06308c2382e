use strata::conditioned::error::NotSatisfied;
use strata::conditioned::Conditioned;
use strata::{level_fn, CacheLevel, CacheLevelExt, Promise, SharedFuture};

#[path = "../support.rs"]
mod support;

#[tokio::test]
async fn false_condition_rejects_without_touching_inner() {
    let (mock, handle) = support::mock();
    let conditioned = Conditioned::new(mock, |key: &String| {
        SharedFuture::succeeded(key != "blocked")
    });

    let outcome = conditioned.get("blocked".to_string()).await;

    let error = outcome.err().unwrap();
    assert!(error.is::<NotSatisfied>());
    assert_eq!(error.to_string(), "condition not satisfied");
    assert_eq!(handle.gets(), 0);
}

#[tokio::test]
async fn true_condition_forwards_and_mimics_the_value() {
    let (mock, handle) = support::mock();
    let conditioned = Conditioned::new(mock, |_: &String| SharedFuture::succeeded(true));

    let future = conditioned.get("open".to_string());
    assert_eq!(handle.gets(), 1);

    handle.succeed("open", "value-for-open");
    assert_eq!(future.await.ok(), Some("value-for-open".to_string()));
}

#[tokio::test]
async fn true_condition_mimics_the_failure_verbatim() {
    let (mock, handle) = support::mock();
    let conditioned = Conditioned::new(mock, |_: &String| SharedFuture::succeeded(true));

    let future = conditioned.get("open".to_string());
    handle.fail("open", "missing key");

    let error = future.await.err().unwrap();
    assert!(!error.is::<NotSatisfied>());
    assert_eq!(error.to_string(), "missing key");
}

#[tokio::test]
async fn condition_error_propagates_unchanged() {
    let (mock, handle) = support::mock();
    let conditioned = Conditioned::new(mock, |_: &String| {
        SharedFuture::failed("quota lookup failed")
    });

    let error = conditioned.get("any".to_string()).await.err().unwrap();
    assert!(!error.is::<NotSatisfied>());
    assert_eq!(error.to_string(), "quota lookup failed");
    assert_eq!(handle.gets(), 0);
}

#[tokio::test]
async fn cancelled_condition_cancels_the_caller() {
    let (mock, handle) = support::mock();
    let conditioned = Conditioned::new(mock, |_: &String| SharedFuture::cancelled());

    assert!(conditioned.get("any".to_string()).await.is_cancelled());
    assert_eq!(handle.gets(), 0);
}

#[tokio::test]
async fn condition_may_resolve_after_the_call() {
    let (mock, handle) = support::mock();
    let gate: Promise<bool> = Promise::new();

    let gate_future = gate.future();
    let conditioned = Conditioned::new(mock, move |_: &String| gate_future.clone());

    let future = conditioned.get("late".to_string());

    // Nothing is forwarded while the gate is still deciding.
    assert_eq!(handle.gets(), 0);

    gate.succeed(true);
    assert_eq!(handle.gets(), 1);

    handle.succeed("late", "eventually");
    assert_eq!(future.await.ok(), Some("eventually".to_string()));
}

#[tokio::test]
async fn cancelled_inner_fetch_cancels_the_caller() {
    let (mock, handle) = support::mock();
    let conditioned = Conditioned::new(mock, |_: &String| SharedFuture::succeeded(true));

    let future = conditioned.get("open".to_string());
    handle.cancel("open");

    assert!(future.await.is_cancelled());
}

#[tokio::test]
async fn writes_and_signals_are_not_gated() {
    let (mock, handle) = support::mock();
    // A condition that rejects everything still lets writes through.
    let conditioned = Conditioned::new(mock, |_: &String| SharedFuture::succeeded(false));

    conditioned.set("value".to_string(), "A".to_string());
    conditioned.clear();
    conditioned.memory_warning();

    assert_eq!(
        handle.sets(),
        vec![("A".to_string(), "value".to_string())]
    );
    assert_eq!(handle.clears(), 1);
    assert_eq!(handle.memory_warnings(), 1);
}

#[tokio::test]
async fn a_raw_fetch_function_can_be_gated() {
    let fetch = level_fn(|key: String| SharedFuture::succeeded(format!("fetched-{}", key)));
    let gated = fetch.conditioned(|key: &String| SharedFuture::succeeded(key.len() < 8));

    let allowed = gated.get("short".to_string()).await;
    assert_eq!(allowed.ok(), Some("fetched-short".to_string()));

    let rejected = gated.get("much-too-long".to_string()).await;
    assert!(rejected.err().unwrap().is::<NotSatisfied>());
}
