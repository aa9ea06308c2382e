//! A single-assignment asynchronous result cell.
//!
//! A [`Promise`] and the [`SharedFuture`] handles it hands out share one
//! cell. The cell starts out pending, reaches exactly one of three terminal
//! states (succeeded, failed, cancelled) and never transitions again.
//! Observers may be registered at any time relative to resolution: before
//! the terminal state they are buffered, after it they are invoked
//! immediately on the registering thread. Each observer fires at most once.
//!
//! The same handle also implements [`std::future::Future`], resolving to the
//! terminal [`Outcome`], so callback-style and `.await`-style consumers can
//! share a cell.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use tracing::debug;

use crate::BoxError;

/// Error type shared between every observer of a failed [`SharedFuture`].
///
/// Failures fan out to any number of observers, so the error is reference
/// counted rather than owned by whichever observer happens to run first.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// The terminal state of a [`SharedFuture`].
///
/// Exactly one variant is ever produced per future. `Succeeded` and `Failed`
/// carry the value or error; `Cancelled` indicates the operation was
/// abandoned before producing either.
#[derive(Clone)]
pub enum Outcome<T> {
    /// The operation produced a value.
    Succeeded(T),
    /// The operation failed.
    Failed(SharedError),
    /// The operation was cancelled before completion.
    Cancelled,
}

impl<T> Outcome<T> {
    /// Returns `true` if the operation produced a value.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }

    /// Returns `true` if the operation failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Returns `true` if the operation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// Returns the success value, if any.
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the failure error, if any.
    pub fn err(self) -> Option<SharedError> {
        match self {
            Outcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Succeeded(value) => f.debug_tuple("Succeeded").field(value).finish(),
            Outcome::Failed(error) => f.debug_tuple("Failed").field(error).finish(),
            Outcome::Cancelled => f.debug_tuple("Cancelled").finish(),
        }
    }
}

/// Observers buffered while the cell is still pending.
///
/// Buckets are drained in registration order. At most one of the first three
/// buckets ever fires; completion observers fire for every terminal state,
/// after the bucket-specific ones.
struct Observers<T> {
    on_success: Vec<Box<dyn FnOnce(T) + Send>>,
    on_failure: Vec<Box<dyn FnOnce(SharedError) + Send>>,
    on_cancel: Vec<Box<dyn FnOnce() + Send>>,
    on_completion: Vec<Box<dyn FnOnce(Outcome<T>) + Send>>,
    wakers: Vec<Waker>,
}

impl<T> Observers<T> {
    fn empty() -> Self {
        Observers {
            on_success: Vec::new(),
            on_failure: Vec::new(),
            on_cancel: Vec::new(),
            on_completion: Vec::new(),
            wakers: Vec::new(),
        }
    }
}

enum State<T> {
    Pending(Observers<T>),
    Done(Outcome<T>),
}

impl<T> State<T> {
    fn is_done(&self) -> bool {
        matches!(self, State::Done(_))
    }
}

/// Read-only handle to an asynchronous result that is resolved at most once.
///
/// Handles are cheap to clone; every clone observes the same cell. The
/// resolving side is the paired [`Promise`], which is never handed to
/// consumers.
///
/// # Observation
///
/// [`on_success`], [`on_failure`], [`on_cancel`] and [`on_completion`]
/// register callbacks and return the handle again so registrations chain.
/// A callback registered after the cell is already terminal runs
/// immediately, on the registering thread; one registered before runs on
/// whichever thread resolves the promise. No lock is held while a callback
/// runs.
///
/// The handle also implements [`std::future::Future`] with
/// `Output = Outcome<T>`, so it can be `.await`ed from any number of tasks.
///
/// [`on_success`]: SharedFuture::on_success
/// [`on_failure`]: SharedFuture::on_failure
/// [`on_cancel`]: SharedFuture::on_cancel
/// [`on_completion`]: SharedFuture::on_completion
pub struct SharedFuture<T> {
    inner: Arc<Mutex<State<T>>>,
}

// Not derived: a derived impl would require `T: Clone`, but cloning the
// handle only clones the `Arc`.
impl<T> Clone for SharedFuture<T> {
    fn clone(&self) -> Self {
        SharedFuture {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedFuture<T> {
    fn pending() -> Self {
        SharedFuture {
            inner: Arc::new(Mutex::new(State::Pending(Observers::empty()))),
        }
    }

    fn done(outcome: Outcome<T>) -> Self {
        SharedFuture {
            inner: Arc::new(Mutex::new(State::Done(outcome))),
        }
    }

    /// Creates a future that has already succeeded with `value`.
    pub fn succeeded(value: T) -> Self {
        SharedFuture::done(Outcome::Succeeded(value))
    }

    /// Creates a future that has already failed with `error`.
    pub fn failed<E: Into<BoxError>>(error: E) -> Self {
        SharedFuture::done(Outcome::Failed(Arc::from(error.into())))
    }

    /// Creates a future that has already been cancelled.
    pub fn cancelled() -> Self {
        SharedFuture::done(Outcome::Cancelled)
    }
}

impl<T: Clone + Send + 'static> SharedFuture<T> {
    /// Registers a callback invoked with the value if this future succeeds.
    ///
    /// Returns the handle so further registrations can be chained.
    pub fn on_success<F>(self, f: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        let immediate = {
            let mut state = self.inner.lock().unwrap();
            match &mut *state {
                State::Pending(observers) => {
                    observers.on_success.push(Box::new(f));
                    None
                }
                State::Done(Outcome::Succeeded(value)) => Some((f, value.clone())),
                State::Done(_) => None,
            }
        };
        if let Some((f, value)) = immediate {
            f(value);
        }
        self
    }

    /// Registers a callback invoked with the error if this future fails.
    pub fn on_failure<F>(self, f: F) -> Self
    where
        F: FnOnce(SharedError) + Send + 'static,
    {
        let immediate = {
            let mut state = self.inner.lock().unwrap();
            match &mut *state {
                State::Pending(observers) => {
                    observers.on_failure.push(Box::new(f));
                    None
                }
                State::Done(Outcome::Failed(error)) => Some((f, error.clone())),
                State::Done(_) => None,
            }
        };
        if let Some((f, error)) = immediate {
            f(error);
        }
        self
    }

    /// Registers a callback invoked if this future is cancelled.
    pub fn on_cancel<F>(self, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let immediate = {
            let mut state = self.inner.lock().unwrap();
            match &mut *state {
                State::Pending(observers) => {
                    observers.on_cancel.push(Box::new(f));
                    None
                }
                State::Done(Outcome::Cancelled) => Some(f),
                State::Done(_) => None,
            }
        };
        if let Some(f) = immediate {
            f();
        }
        self
    }

    /// Registers a callback invoked with the terminal [`Outcome`], whichever
    /// of the three it turns out to be.
    pub fn on_completion<F>(self, f: F) -> Self
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        let immediate = {
            let mut state = self.inner.lock().unwrap();
            match &mut *state {
                State::Pending(observers) => {
                    observers.on_completion.push(Box::new(f));
                    None
                }
                State::Done(outcome) => Some((f, outcome.clone())),
            }
        };
        if let Some((f, outcome)) = immediate {
            f(outcome);
        }
        self
    }

    /// Maps a successful value through `f`, producing a new future.
    ///
    /// Failure and cancellation pass through untouched.
    pub fn map<U, F>(self, f: F) -> SharedFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let promise = Promise::new();
        let future = promise.future();
        self.on_completion(move |outcome| match outcome {
            Outcome::Succeeded(value) => promise.succeed(f(value)),
            Outcome::Failed(error) => promise.fail_shared(error),
            Outcome::Cancelled => promise.cancel(),
        });
        future
    }

    /// Chains a future-returning function onto a successful value.
    ///
    /// The returned future mirrors the outcome of the future produced by
    /// `f`; failure and cancellation of `self` pass through untouched.
    pub fn and_then<U, F>(self, f: F) -> SharedFuture<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> SharedFuture<U> + Send + 'static,
    {
        let promise = Promise::new();
        let future = promise.future();
        self.on_completion(move |outcome| match outcome {
            Outcome::Succeeded(value) => promise.mimic(f(value)),
            Outcome::Failed(error) => promise.fail_shared(error),
            Outcome::Cancelled => promise.cancel(),
        });
        future
    }

    /// Transitions the cell to `outcome` and drains the observers.
    ///
    /// Resolving an already-terminal cell is a no-op, reported at debug
    /// level; the first outcome always wins and observers never re-fire.
    fn resolve(&self, outcome: Outcome<T>) {
        let previous = {
            let mut state = self.inner.lock().unwrap();
            if state.is_done() {
                drop(state);
                debug!("promise already resolved, ignoring repeated resolution");
                return;
            }
            std::mem::replace(&mut *state, State::Done(outcome.clone()))
        };
        let observers = match previous {
            State::Pending(observers) => observers,
            State::Done(_) => return,
        };

        // The lock is released; from here a callback may freely register
        // onto this or any other future without deadlocking.
        match &outcome {
            Outcome::Succeeded(value) => {
                for f in observers.on_success {
                    f(value.clone());
                }
            }
            Outcome::Failed(error) => {
                for f in observers.on_failure {
                    f(error.clone());
                }
            }
            Outcome::Cancelled => {
                for f in observers.on_cancel {
                    f();
                }
            }
        }
        for f in observers.on_completion {
            f(outcome.clone());
        }
        for waker in observers.wakers {
            waker.wake();
        }
    }
}

impl<T: Clone> Future for SharedFuture<T> {
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.inner.lock().unwrap();
        match &mut *state {
            State::Done(outcome) => Poll::Ready(outcome.clone()),
            State::Pending(observers) => {
                if !observers.wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    observers.wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

impl<T> fmt::Debug for SharedFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock().unwrap();
        let name = match &*state {
            State::Pending(_) => "Pending",
            State::Done(Outcome::Succeeded(_)) => "Succeeded",
            State::Done(Outcome::Failed(_)) => "Failed",
            State::Done(Outcome::Cancelled) => "Cancelled",
        };
        f.debug_tuple("SharedFuture").field(&name).finish()
    }
}

/// The write-once resolver paired with a [`SharedFuture`].
///
/// A promise is created per logical asynchronous operation. The operation's
/// driver keeps the promise; consumers only ever see the future obtained
/// from [`Promise::future`]. Whichever of [`succeed`], [`fail`] or
/// [`cancel`] is called first decides the terminal state; later calls are
/// no-ops.
///
/// [`succeed`]: Promise::succeed
/// [`fail`]: Promise::fail
/// [`cancel`]: Promise::cancel
pub struct Promise<T> {
    future: SharedFuture<T>,
}

// Not derived, for the same reason as `SharedFuture`.
impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Promise {
            future: self.future.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// Creates a new pending promise/future pair.
    pub fn new() -> Self {
        Promise {
            future: SharedFuture::pending(),
        }
    }

    /// Returns the read-only future observing this promise.
    pub fn future(&self) -> SharedFuture<T> {
        self.future.clone()
    }

    /// Resolves the paired future with `value`.
    pub fn succeed(&self, value: T) {
        self.future.resolve(Outcome::Succeeded(value));
    }

    /// Resolves the paired future with `error`.
    pub fn fail<E: Into<BoxError>>(&self, error: E) {
        self.fail_shared(Arc::from(error.into()));
    }

    /// Resolves the paired future with an error that is already shared.
    ///
    /// Decorators forwarding a failure from another future use this to
    /// propagate the error without re-wrapping it.
    pub fn fail_shared(&self, error: SharedError) {
        self.future.resolve(Outcome::Failed(error));
    }

    /// Cancels the paired future.
    pub fn cancel(&self) {
        self.future.resolve(Outcome::Cancelled);
    }

    /// Forwards the eventual outcome of `other` into this promise.
    ///
    /// All three terminal states propagate, cancellation included. Only a
    /// single completion observer is registered on `other`, so chains of
    /// mimicking promises add one layer of indirection per link.
    pub fn mimic(&self, other: SharedFuture<T>) {
        let this = self.clone();
        other.on_completion(move |outcome| match outcome {
            Outcome::Succeeded(value) => this.succeed(value),
            Outcome::Failed(error) => this.fail_shared(error),
            Outcome::Cancelled => this.cancel(),
        });
    }
}

impl<T: Clone + Send + 'static> Default for Promise<T> {
    fn default() -> Self {
        Promise::new()
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("future", &self.future)
            .finish()
    }
}
