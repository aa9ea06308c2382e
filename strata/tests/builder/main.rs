use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use strata::layer::layer_fn;
use strata::{
    level_fn, BoxCacheLevel, CacheBuilder, CacheLevel, CacheLevelExt, Layer, SharedFuture,
};

#[path = "../support.rs"]
mod support;

fn counting_condition() -> (
    impl Fn(&String) -> SharedFuture<bool> + Clone,
    Arc<AtomicUsize>,
) {
    let checks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&checks);
    let condition = move |_: &String| {
        counter.fetch_add(1, Ordering::SeqCst);
        SharedFuture::succeeded(true)
    };
    (condition, checks)
}

#[tokio::test]
async fn first_added_layer_sees_the_get_first() {
    // Pooling added first: concurrent callers collapse before the gate,
    // so the condition is consulted once.
    let (condition, checks) = counting_condition();
    let (mock, handle) = support::mock();
    let cache = CacheBuilder::new()
        .pooled()
        .conditioned(condition)
        .level(mock);

    let first = cache.get("A".to_string());
    let second = cache.get("A".to_string());

    assert_eq!(checks.load(Ordering::SeqCst), 1);
    assert_eq!(handle.gets(), 1);

    handle.succeed("A", "value");
    let (first, second) = futures::join!(first, second);
    assert_eq!(first.ok(), Some("value".to_string()));
    assert_eq!(second.ok(), Some("value".to_string()));
}

#[tokio::test]
async fn reversing_the_layers_gates_each_caller() {
    // Conditioning added first: every caller is gated individually, and
    // only then does pooling deduplicate the forwarded fetches.
    let (condition, checks) = counting_condition();
    let (mock, handle) = support::mock();
    let cache = CacheBuilder::new()
        .conditioned(condition)
        .pooled()
        .level(mock);

    let first = cache.get("A".to_string());
    let second = cache.get("A".to_string());

    assert_eq!(checks.load(Ordering::SeqCst), 2);
    assert_eq!(handle.gets(), 1);

    handle.succeed("A", "value");
    let (first, second) = futures::join!(first, second);
    assert_eq!(first.ok(), Some("value".to_string()));
    assert_eq!(second.ok(), Some("value".to_string()));
}

#[tokio::test]
async fn custom_layers_slot_into_the_builder() {
    struct Doubling<L> {
        inner: L,
    }

    impl<L> CacheLevel for Doubling<L>
    where
        L: CacheLevel<Value = String>,
    {
        type Key = L::Key;
        type Value = String;

        fn get(&self, key: Self::Key) -> SharedFuture<String> {
            self.inner.get(key).map(|value| format!("{0}{0}", value))
        }

        fn set(&self, value: String, key: Self::Key) {
            self.inner.set(value, key)
        }

        fn clear(&self) {
            self.inner.clear()
        }

        fn memory_warning(&self) {
            self.inner.memory_warning()
        }
    }

    let (mock, handle) = support::mock();
    let cache = CacheBuilder::new()
        .layer(layer_fn(|inner| Doubling { inner }))
        .pooled()
        .level(mock);

    let future = cache.get("A".to_string());
    handle.succeed("A", "ab");
    assert_eq!(future.await.ok(), Some("abab".to_string()));
}

#[tokio::test]
async fn ext_trait_composes_without_a_builder() {
    let (mock, handle) = support::mock();
    let cache = mock
        .conditioned(|_: &String| SharedFuture::succeeded(true))
        .pooled();

    let future = cache.get("A".to_string());
    assert_eq!(handle.gets(), 1);
    handle.succeed("A", "value");
    assert_eq!(future.await.ok(), Some("value".to_string()));
}

#[tokio::test]
async fn boxing_erases_differently_composed_stacks() {
    let plain = level_fn(|key: String| SharedFuture::succeeded(format!("plain-{}", key)));
    let pooled = level_fn(|key: String| SharedFuture::succeeded(format!("pooled-{}", key))).pooled();

    let stacks: Vec<BoxCacheLevel<String, String>> = vec![plain.boxed(), pooled.boxed()];

    assert_eq!(
        stacks[0].get("x".to_string()).await.ok(),
        Some("plain-x".to_string())
    );
    assert_eq!(
        stacks[1].get("x".to_string()).await.ok(),
        Some("pooled-x".to_string())
    );
}

#[test]
fn builder_debug_lists_layers_outermost_first() {
    let builder = CacheBuilder::new()
        .pooled()
        .conditioned(|_: &String| SharedFuture::succeeded(true));

    let rendered = format!("{:?}", builder);
    let pool = rendered.find("PoolLayer").expect("PoolLayer in debug");
    let conditioned = rendered
        .find("ConditionedLayer")
        .expect("ConditionedLayer in debug");
    assert!(pool < conditioned);
}

#[test]
fn identity_builder_returns_the_backend_unchanged() {
    let layer = strata::layer::Identity::new();
    assert_eq!(layer.layer(7), 7);
}
