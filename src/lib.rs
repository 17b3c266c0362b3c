/*!
A thread-safe, weakly-referenced publish/notify primitive.

A [`Subject`] holds an ordered list of observers without keeping them alive,
delivers `Result<T, E>` notifications to every observer still living at
delivery time, and sweeps expired entries after each new subscription.
Observers are identified by allocation, not value: any `Arc` can serve as an
identity, and subscribing never extends its lifetime — once the last strong
reference elsewhere is dropped, the subject stops delivering to it.

All registry operations are serialized through a dedicated single worker per
subject (the gate), so any thread may subscribe, unsubscribe, and publish
without further locking.

# Basic usage

```
use weak_observable::{CallContext, Subject};
use std::sync::{Arc, mpsc};

let subject = Subject::<i32, String>::new();

let listener = Arc::new(());
let (tx, rx) = mpsc::channel();
subject.subscribe(&listener, tx);

// publish is fire-and-continue; the channel hands the result back over here
subject.publish(Ok(42));
assert_eq!(rx.recv().unwrap(), Ok(42));

// external, because we are not inside a notify callback
subject.unsubscribe(&listener, CallContext::External);
subject.publish(Ok(7));
assert!(rx.try_recv().is_err());
```

# Re-entrancy

Notify callbacks run on the subject's gate worker. A callback that needs to
remove a subscription (commonly its own) must declare that context so the
removal runs inline instead of waiting on the worker from the worker:

```
use weak_observable::{CallContext, Subject};
use std::sync::Arc;

let subject = Subject::<i32, String>::new();
let once = Arc::new(());
let subject2 = subject.clone();
let once2 = once.clone();
subject.subscribe(&once, move |result: Result<i32, String>| {
    println!("first and only delivery: {result:?}");
    subject2.unsubscribe(&once2, CallContext::Internal);
});
subject.publish(Ok(1));
assert_eq!(subject.observer_count(), 0);
```

Calling with [`CallContext::External`] from inside a callback deadlocks; the
mode is a caller-declared precondition, checked only in debug builds.
*/

mod callback;
mod gate;
mod subject;

pub use callback::*;
pub use subject::*;
