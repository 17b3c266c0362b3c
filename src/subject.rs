use std::any::Any;
use std::sync::{Arc, Mutex, Weak};

use crate::callback::{IntoObserverCallback, ObserverCallback};
use crate::gate::Gate;

/// Declares the calling context of an [`unsubscribe`](Subject::unsubscribe).
///
/// Every registry operation runs on the subject's gate worker. A removal
/// requested from ordinary application code has to be dispatched there and
/// waited for; a removal requested from code that is *already on* the worker
/// (a notify callback, typically) has to run inline instead, because waiting
/// on the worker from the worker deadlocks. Declaring the wrong context is a
/// precondition violation, checked only in debug builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallContext {
    /// The caller is not on the subject's gate worker. The removal is
    /// submitted to the gate and the call blocks until it has run.
    External,
    /// The caller is already executing on the gate worker. The removal runs
    /// inline with no further dispatch.
    Internal,
}

/// One registered observer: a non-owning handle to its identity plus the
/// callback results are delivered to. The weak handle never extends the
/// observer's lifetime; it is upgraded only for a liveness check or for the
/// duration of a single callback invocation.
struct ObserverEntry<T, E> {
    observer: Weak<dyn Any + Send + Sync>,
    callback: ObserverCallback<T, E>,
}

impl<T, E> Clone for ObserverEntry<T, E> {
    fn clone(&self) -> Self { Self { observer: self.observer.clone(), callback: self.callback.clone() } }
}

/// A thread-safe observable subject parameterized over a result payload `T`
/// and an error `E`.
///
/// Observers are identified by allocation: any `Arc` serves as an identity,
/// and the subject holds only a weak handle to it. Cloning the subject yields
/// another handle to the same registry.
///
/// All three operations funnel through a per-subject single-worker gate, so
/// they may be called from any thread without additional locking.
/// [`subscribe`](Subject::subscribe) and [`publish`](Subject::publish) are
/// fire-and-continue; [`unsubscribe`](Subject::unsubscribe) in
/// [`CallContext::External`] mode blocks until the removal has run.
pub struct Subject<T, E>(Arc<Inner<T, E>>);

impl<T, E> Clone for Subject<T, E> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T, E> std::fmt::Debug for Subject<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject").finish_non_exhaustive()
    }
}

struct Inner<T, E> {
    // Locked only on the gate worker, so never contended; ordering comes from
    // the gate, the mutex just satisfies `Sync`.
    observers: Mutex<Vec<ObserverEntry<T, E>>>,
    gate: Gate,
}

impl<T, E> Default for Subject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self { Self::new() }
}

impl<T, E> Subject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates an empty subject with its own gate worker.
    pub fn new() -> Self {
        Self(Arc::new(Inner { observers: Mutex::new(Vec::new()), gate: Gate::new("observable-gate") }))
    }

    /// Registers `listener` to receive every future published result for as
    /// long as `observer` stays alive.
    ///
    /// Fire-and-continue: the append happens on the gate, and nothing is
    /// delivered synchronously as part of subscribing. Subscribing the same
    /// identity twice creates two independent entries, both delivered to.
    /// Expired entries accumulated since the last mutation are swept right
    /// after the append.
    pub fn subscribe<O, L>(&self, observer: &Arc<O>, listener: L)
    where
        O: Send + Sync + 'static,
        L: IntoObserverCallback<T, E>,
    {
        // Coerce to the unsized identity type before downgrading; annotating
        // the Weak directly would drive inference the wrong way.
        let observer: Arc<dyn Any + Send + Sync> = observer.clone();
        let observer = Arc::downgrade(&observer);
        let callback = listener.into_observer_callback();
        let inner = self.0.clone();
        self.0.gate.spawn(move || inner.append(ObserverEntry { observer, callback }));
    }

    /// Removes the first registered entry whose identity is `observer`.
    ///
    /// Identity is the allocation, not the value: only an entry created from
    /// a clone of the same `Arc` matches. One entry is removed per call, so
    /// duplicate subscriptions need one call each. A silent no-op when no
    /// entry matches (never registered, already removed, or expired).
    ///
    /// On return from an [`External`](CallContext::External) call the entry
    /// will receive no further results, including publishes that were queued
    /// before this call but had not yet run.
    ///
    /// `context` must match the actual calling context; see [`CallContext`].
    pub fn unsubscribe<O>(&self, observer: &Arc<O>, context: CallContext)
    where O: Send + Sync + 'static {
        // Identity crosses threads as a plain address; it is only ever
        // compared against allocations that are still live.
        let target = Arc::as_ptr(observer) as usize;
        let inner = self.0.clone();
        match context {
            CallContext::External => self.0.gate.join(move || inner.remove_first(target)),
            CallContext::Internal => self.0.gate.run_inline(move || inner.remove_first(target)),
        }
    }

    /// Delivers `result` to every currently registered observer that is still
    /// alive at delivery time, synchronously on the gate worker, in insertion
    /// order.
    ///
    /// Fire-and-continue: the caller does not wait for delivery. Expired
    /// entries are skipped, not removed (sweeping is subscribe's job). The
    /// subject never inspects the result; a failure is delivered verbatim.
    pub fn publish(&self, result: Result<T, E>) {
        let inner = self.0.clone();
        self.0.gate.spawn(move || inner.deliver(result));
    }

    /// The number of registered entries, including any that have expired but
    /// not yet been swept. Blocks until every previously submitted operation
    /// has run, so tests also use it as a barrier.
    ///
    /// Must not be called from a notify callback; see [`CallContext`].
    pub fn observer_count(&self) -> usize {
        let inner = self.0.clone();
        self.0.gate.join(move || inner.observers.lock().expect("observer list lock is poisoned").len())
    }
}

impl<T, E> Inner<T, E> {
    /// Append a new entry, then sweep expired ones. Runs on the gate.
    fn append(&self, entry: ObserverEntry<T, E>) {
        let mut observers = self.observers.lock().expect("observer list lock is poisoned");
        observers.push(entry);
        let before = observers.len();
        observers.retain(|entry| entry.observer.strong_count() > 0);
        let swept = before - observers.len();
        if swept > 0 {
            tracing::debug!("swept {} expired observer(s)", swept);
        }
    }

    /// Remove the first entry whose live identity sits at `target`. Runs on
    /// the gate.
    fn remove_first(&self, target: usize) {
        let mut observers = self.observers.lock().expect("observer list lock is poisoned");
        let found = observers
            .iter()
            .position(|entry| entry.observer.upgrade().is_some_and(|live| Arc::as_ptr(&live) as *const () as usize == target));
        if let Some(index) = found {
            observers.remove(index);
        }
    }

    /// Invoke every live entry's callback with a clone of `result`. Runs on
    /// the gate.
    fn deliver(&self, result: Result<T, E>)
    where
        T: Clone,
        E: Clone,
    {
        // Snapshot under the lock, deliver outside it, so a callback may
        // re-enter unsubscribe without corrupting the pass in progress.
        let snapshot = self.observers.lock().expect("observer list lock is poisoned").clone();
        for entry in snapshot {
            // Holding the upgrade keeps the observer alive across its own callback
            let Some(_live) = entry.observer.upgrade() else { continue };
            (entry.callback)(result.clone());
        }
    }
}
