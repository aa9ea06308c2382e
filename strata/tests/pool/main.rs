use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use strata::pool::Pool;
use strata::{level_fn, CacheLevel, Promise};
use tokio_test::{assert_pending, assert_ready, task};

#[path = "../support.rs"]
mod support;

#[test]
fn callers_are_woken_when_the_fetch_resolves() {
    let (mock, handle) = support::mock();
    let pool = Pool::new(mock);

    let mut caller = task::spawn(pool.get("A".to_string()));
    assert_pending!(caller.poll());

    handle.succeed("A", "value-for-A");
    assert!(caller.is_woken());
    let outcome = assert_ready!(caller.poll());
    assert_eq!(outcome.ok(), Some("value-for-A".to_string()));
}

#[tokio::test]
async fn concurrent_gets_share_one_fetch() {
    let _t = support::trace_init();
    let (mock, handle) = support::mock();
    let pool = Pool::new(mock);

    let first = pool.get("A".to_string());
    let second = pool.get("A".to_string());

    assert_eq!(handle.gets(), 1);
    assert_eq!(handle.pending("A"), 1);

    handle.succeed("A", "value-for-A");

    let (first, second) = futures::join!(first, second);
    assert_eq!(first.ok(), Some("value-for-A".to_string()));
    assert_eq!(second.ok(), Some("value-for-A".to_string()));
}

#[tokio::test]
async fn failure_fans_out_to_every_caller() {
    let (mock, handle) = support::mock();
    let pool = Pool::new(mock);

    let first = pool.get("A".to_string());
    let second = pool.get("A".to_string());

    handle.fail("A", "disk on fire");

    let (first, second) = futures::join!(first, second);
    assert_eq!(first.err().unwrap().to_string(), "disk on fire");
    assert_eq!(second.err().unwrap().to_string(), "disk on fire");
    assert_eq!(handle.gets(), 1);
}

#[tokio::test]
async fn slot_released_after_success() {
    let (mock, handle) = support::mock();
    let pool = Pool::new(mock);

    let first = pool.get("A".to_string());
    handle.succeed("A", "one");
    assert_eq!(first.await.ok(), Some("one".to_string()));

    let second = pool.get("A".to_string());
    assert_eq!(handle.gets(), 2);
    handle.succeed("A", "two");
    assert_eq!(second.await.ok(), Some("two".to_string()));
}

#[tokio::test]
async fn slot_released_after_failure() {
    let (mock, handle) = support::mock();
    let pool = Pool::new(mock);

    let first = pool.get("A".to_string());
    handle.fail("A", "transient");
    assert!(first.await.is_failed());

    let second = pool.get("A".to_string());
    assert_eq!(handle.gets(), 2);
    handle.succeed("A", "recovered");
    assert_eq!(second.await.ok(), Some("recovered".to_string()));
}

#[tokio::test]
async fn slot_released_after_cancellation() {
    let (mock, handle) = support::mock();
    let pool = Pool::new(mock);

    let first = pool.get("A".to_string());
    handle.cancel("A");
    assert!(first.await.is_cancelled());

    // A cancelled fetch must not wedge its key.
    let second = pool.get("A".to_string());
    assert_eq!(handle.gets(), 2);
    handle.succeed("A", "fresh");
    assert_eq!(second.await.ok(), Some("fresh".to_string()));
}

#[tokio::test]
async fn distinct_keys_fetch_independently() {
    let (mock, handle) = support::mock();
    let pool = Pool::new(mock);

    let a = pool.get("A".to_string());
    let b = pool.get("B".to_string());

    assert_eq!(handle.gets(), 2);

    handle.succeed("A", "value-for-A");
    handle.succeed("B", "value-for-B");

    assert_eq!(a.await.ok(), Some("value-for-A".to_string()));
    assert_eq!(b.await.ok(), Some("value-for-B".to_string()));
}

#[tokio::test]
async fn writes_and_signals_pass_through() {
    let (mock, handle) = support::mock();
    let pool = Pool::new(mock);

    pool.set("value".to_string(), "A".to_string());
    pool.clear();
    pool.memory_warning();

    assert_eq!(
        handle.sets(),
        vec![("A".to_string(), "value".to_string())]
    );
    assert_eq!(handle.clears(), 1);
    assert_eq!(handle.memory_warnings(), 1);
}

#[tokio::test]
async fn clear_does_not_disturb_in_flight_fetches() {
    let (mock, handle) = support::mock();
    let pool = Pool::new(mock);

    let first = pool.get("A".to_string());
    pool.clear();

    // The slot survives the purge: a new caller still joins the fetch.
    let second = pool.get("A".to_string());
    assert_eq!(handle.gets(), 1);

    handle.succeed("A", "survived");
    let (first, second) = futures::join!(first, second);
    assert_eq!(first.ok(), Some("survived".to_string()));
    assert_eq!(second.ok(), Some("survived".to_string()));
}

#[tokio::test]
async fn cloned_pools_share_the_in_flight_map() {
    let (mock, handle) = support::mock();
    let pool = Pool::new(mock);
    let sibling = pool.clone();

    let first = pool.get("A".to_string());
    let second = sibling.get("A".to_string());

    assert_eq!(handle.gets(), 1);
    handle.succeed("A", "shared");

    let (first, second) = futures::join!(first, second);
    assert_eq!(first.ok(), Some("shared".to_string()));
    assert_eq!(second.ok(), Some("shared".to_string()));
}

#[tokio::test(start_paused = true)]
async fn three_quick_callers_share_one_slow_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    let backend = level_fn(move |key: String| {
        counter.fetch_add(1, Ordering::SeqCst);
        let promise = Promise::new();
        let future = promise.future();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            promise.succeed(format!("value-for-{}", key));
        });
        future
    });
    let pool = Pool::new(backend);

    let first = pool.get("A".to_string());
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = pool.get("A".to_string());
    tokio::time::sleep(Duration::from_millis(5)).await;
    let third = pool.get("A".to_string());

    let outcomes = futures::join!(first, second, third);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for outcome in vec![outcomes.0, outcomes.1, outcomes.2] {
        assert_eq!(outcome.ok(), Some("value-for-A".to_string()));
    }
}
