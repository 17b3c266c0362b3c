use std::sync::Arc;

/// The delivery half of a subscription: invoked with each published result.
/// `Arc` so the notify pass can snapshot entries without cloning closures.
pub type ObserverCallback<T, E> = Arc<dyn Fn(Result<T, E>) + Send + Sync + 'static>;

/// Trait for types that can be converted into observer callbacks.
pub trait IntoObserverCallback<T, E> {
    /// Convert this type into a callback that receives published results.
    fn into_observer_callback(self) -> ObserverCallback<T, E>;
}

// Implementation for function types
impl<F, T, E> IntoObserverCallback<T, E> for F
where F: Fn(Result<T, E>) + Send + Sync + 'static
{
    fn into_observer_callback(self) -> ObserverCallback<T, E> { Arc::new(self) }
}

// Implementation for ObserverCallback itself
impl<T, E> IntoObserverCallback<T, E> for ObserverCallback<T, E> {
    fn into_observer_callback(self) -> ObserverCallback<T, E> { self }
}

impl<T, E> IntoObserverCallback<T, E> for std::sync::mpsc::Sender<Result<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_observer_callback(self) -> ObserverCallback<T, E> {
        Arc::new(move |result| {
            let _ = self.send(result); // Ignore send errors
        })
    }
}

#[cfg(feature = "tokio")]
impl<T, E> IntoObserverCallback<T, E> for tokio::sync::mpsc::UnboundedSender<Result<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn into_observer_callback(self) -> ObserverCallback<T, E> {
        Arc::new(move |result| {
            let _ = self.send(result); // Ignore send errors
        })
    }
}
