use std::sync::{Arc, Mutex};

/// Returns a callback suitable for `subscribe` and a checker that drains
/// everything delivered so far.
#[allow(unused)]
pub fn delivery_watcher<T, E>() -> (Box<dyn Fn(Result<T, E>) + Send + Sync>, Box<dyn Fn() -> Vec<Result<T, E>> + Send + Sync>)
where
    T: Send + 'static,
    E: Send + 'static,
{
    let deliveries = Arc::new(Mutex::new(Vec::new()));
    let accumulate = {
        let deliveries = deliveries.clone();
        Box::new(move |result: Result<T, E>| {
            deliveries.lock().unwrap().push(result);
        })
    };

    let check = Box::new(move || {
        let deliveries: Vec<Result<T, E>> = deliveries.lock().unwrap().drain(..).collect();
        deliveries
    });

    (accumulate, check)
}
