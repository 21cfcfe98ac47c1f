use crate::settings::{Observable, Persisted};
use dioxus::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Mirrors a persisted setting into a signal for the lifetime of the
/// calling component.
pub fn use_persisted<T>(persisted: &Persisted<T>) -> Signal<T>
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    let (signal, observer) = use_hook(|| {
        let mut signal = Signal::new(persisted.get());
        let observer = persisted.observe(move |value: &T| signal.set(value.clone()));
        (signal, observer)
    });

    let persisted = persisted.clone();
    use_drop(move || {
        persisted.unsubscribe(observer);
    });

    signal
}

pub fn use_observable<T>(observable: &Observable<T>) -> Signal<T>
where
    T: Clone + 'static,
{
    let (signal, observer) = use_hook(|| {
        let mut signal = Signal::new(observable.get());
        let observer = observable.observe(move |value: &T| signal.set(value.clone()));
        (signal, observer)
    });

    let observable = observable.clone();
    use_drop(move || {
        observable.unsubscribe(observer);
    });

    signal
}
