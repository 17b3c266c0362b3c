use std::sync::{Arc, Mutex};
use std::thread;
use weak_observable::{CallContext, Subject};

#[test]
fn concurrent_subscribes_are_never_lost() {
    let subject = Subject::<usize, String>::new();
    let observers: Vec<Arc<usize>> = (0..32).map(Arc::new).collect();
    let counter = Arc::new(Mutex::new(0usize));

    thread::scope(|s| {
        for observer in &observers {
            let subject = subject.clone();
            let counter = counter.clone();
            s.spawn(move || {
                subject.subscribe(observer, move |_: Result<usize, String>| {
                    *counter.lock().unwrap() += 1;
                });
            });
        }
    });

    assert_eq!(subject.observer_count(), 32);
    subject.publish(Ok(0));
    subject.observer_count();
    assert_eq!(*counter.lock().unwrap(), 32);
}

#[test]
fn concurrent_external_unsubscribes_serialize() {
    let subject = Subject::<usize, String>::new();
    let observers: Vec<Arc<usize>> = (0..16).map(Arc::new).collect();
    for observer in &observers {
        subject.subscribe(observer, |_: Result<usize, String>| {});
    }
    assert_eq!(subject.observer_count(), 16);

    thread::scope(|s| {
        for observer in &observers[..8] {
            let subject = subject.clone();
            s.spawn(move || subject.unsubscribe(observer, CallContext::External));
        }
    });

    assert_eq!(subject.observer_count(), 8);
}

#[test]
fn publishes_from_many_threads_all_arrive() {
    let subject = Subject::<usize, String>::new();
    let a = Arc::new(());
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = seen.clone();
        subject.subscribe(&a, move |result: Result<usize, String>| seen.lock().unwrap().push(result));
    }

    thread::scope(|s| {
        for i in 0..8 {
            let subject = subject.clone();
            s.spawn(move || subject.publish(Ok(i)));
        }
    });

    subject.observer_count();
    let mut got: Vec<usize> = seen.lock().unwrap().iter().map(|result| *result.as_ref().unwrap()).collect();
    got.sort();
    assert_eq!(got, (0..8).collect::<Vec<_>>());
}
