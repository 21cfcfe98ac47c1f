//! Reactive value holders.
//!
//! [`Observable`] is an in-memory value with synchronous change notification.
//! [`Persisted`] wraps one and writes every change through to a
//! [`KeyValueStore`] before observers run.

use super::SettingsError;
use crate::storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type ObserverId = u64;

type Observer<T> = Box<dyn FnMut(&T)>;

struct Inner<T> {
    value: T,
    observers: Vec<(ObserverId, Observer<T>)>,
    // Ids unsubscribed while their observer was checked out for notification.
    pending_removals: Vec<ObserverId>,
    next_id: ObserverId,
    notifying: bool,
    // Set by a change made while observers are running.
    dirty: bool,
}

pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                observers: Vec::new(),
                pending_removals: Vec::new(),
                next_id: 0,
                notifying: false,
                dirty: false,
            })),
        }
    }

    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    pub fn set(&self, value: T) {
        self.inner.borrow_mut().value = value;
        self.notify();
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Registers `observer` and calls it right away with the current value.
    pub fn subscribe(&self, mut observer: impl FnMut(&T) + 'static) -> ObserverId {
        let current = self.get();
        observer(&current);
        self.observe(observer)
    }

    /// Registers `observer` for future changes only.
    pub fn observe(&self, observer: impl FnMut(&T) + 'static) -> ObserverId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.observers.len();
        inner.observers.retain(|(observer_id, _)| *observer_id != id);
        if inner.observers.len() == before {
            if id < inner.next_id && !inner.pending_removals.contains(&id) {
                inner.pending_removals.push(id);
            }
            return false;
        }
        true
    }

    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    fn notify(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying {
                inner.dirty = true;
                return;
            }
            inner.notifying = true;
        }

        // Observers run without a borrow held so they may read or write the
        // value they observe. A write from inside an observer triggers another
        // pass with the latest value once the current one finishes.
        loop {
            let (value, mut observers) = {
                let mut inner = self.inner.borrow_mut();
                inner.dirty = false;
                (inner.value.clone(), std::mem::take(&mut inner.observers))
            };

            for (_, observer) in observers.iter_mut() {
                observer(&value);
            }

            let mut inner = self.inner.borrow_mut();
            let removed = std::mem::take(&mut inner.pending_removals);
            observers.retain(|(id, _)| !removed.contains(id));
            observers.append(&mut inner.observers);
            inner.observers = observers;

            if !inner.dirty {
                inner.notifying = false;
                return;
            }
        }
    }
}

/// A reactive value mirrored into durable storage under `key`.
pub struct Persisted<T> {
    key: Rc<str>,
    default: Rc<T>,
    store: Rc<dyn KeyValueStore>,
    value: Observable<T>,
}

impl<T> Clone for Persisted<T> {
    fn clone(&self) -> Self {
        Self {
            key: Rc::clone(&self.key),
            default: Rc::clone(&self.default),
            store: Rc::clone(&self.store),
            value: self.value.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Persisted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persisted")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    /// Reads `key` from `store`, falling back to `default` when nothing (or an
    /// empty string) is stored. The resulting value is written back at once.
    ///
    /// A stored value that does not parse is reported as
    /// [`SettingsError::Corrupt`] and left untouched in the store.
    pub fn load(
        store: Rc<dyn KeyValueStore>,
        key: &str,
        default: T,
    ) -> Result<Self, SettingsError> {
        let initial = match store.get_item(key)? {
            Some(raw) if !raw.is_empty() => {
                serde_json::from_str(&raw).map_err(|source| SettingsError::Corrupt {
                    key: key.to_string(),
                    source,
                })?
            }
            _ => default.clone(),
        };

        let persisted = Self {
            key: Rc::from(key),
            default: Rc::new(default),
            store,
            value: Observable::new(initial),
        };
        persisted.value.with(|value| persisted.write(value))?;
        tracing::debug!(key, "loaded persisted setting");
        Ok(persisted)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.value.with(f)
    }

    /// Persists `value`, then notifies observers. Nothing changes when the
    /// write fails.
    pub fn set(&self, value: T) -> Result<(), SettingsError> {
        self.write(&value)?;
        self.value.set(value);
        Ok(())
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<(), SettingsError> {
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    pub fn reset(&self) -> Result<(), SettingsError> {
        self.set(T::clone(&self.default))
    }

    pub fn subscribe(&self, observer: impl FnMut(&T) + 'static) -> ObserverId {
        self.value.subscribe(observer)
    }

    pub fn observe(&self, observer: impl FnMut(&T) + 'static) -> ObserverId {
        self.value.observe(observer)
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.value.unsubscribe(id)
    }

    fn write(&self, value: &T) -> Result<(), SettingsError> {
        let raw = serde_json::to_string(value).map_err(|source| SettingsError::Serialize {
            key: self.key.to_string(),
            source,
        })?;
        self.store.set_item(&self.key, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StoreError};
    use std::cell::Cell;

    fn memory() -> Rc<MemoryStore> {
        Rc::new(MemoryStore::new())
    }

    #[test]
    fn subscribe_sees_initial_value_and_every_change() {
        let counter = Observable::new(0u32);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        counter.subscribe(move |value| sink.borrow_mut().push(*value));

        counter.set(3);
        counter.update(|value| *value += 1);

        assert_eq!(*seen.borrow(), vec![0, 3, 4]);
    }

    #[test]
    fn observe_skips_initial_value() {
        let page = Observable::new("home".to_string());
        let calls = Rc::new(Cell::new(0));
        let sink = Rc::clone(&calls);
        page.observe(move |_| sink.set(sink.get() + 1));
        assert_eq!(calls.get(), 0);

        page.set("profile".to_string());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn unsubscribed_observer_is_not_called() {
        let flag = Observable::new(false);
        let calls = Rc::new(Cell::new(0));
        let sink = Rc::clone(&calls);
        let id = flag.observe(move |_| sink.set(sink.get() + 1));

        assert!(flag.unsubscribe(id));
        flag.set(true);

        assert_eq!(calls.get(), 0);
        assert_eq!(flag.observer_count(), 0);
    }

    #[test]
    fn observer_can_read_and_unsubscribe_itself_during_notification() {
        let value = Observable::new(1i32);
        let reader = value.clone();
        let own_id = Rc::new(Cell::new(None));
        let own_id_inner = Rc::clone(&own_id);
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);

        let id = value.observe(move |_| {
            sink.set(reader.get());
            if let Some(id) = own_id_inner.get() {
                reader.unsubscribe(id);
            }
        });
        own_id.set(Some(id));

        value.set(7);
        value.set(8);

        assert_eq!(seen.get(), 7);
        assert_eq!(value.observer_count(), 0);
    }

    #[test]
    fn write_from_an_observer_reaches_every_observer() {
        let value = Observable::new(0i32);
        let writer = value.clone();
        value.observe(move |current| {
            if *current == 1 {
                writer.set(2);
            }
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        value.observe(move |current| sink.borrow_mut().push(*current));

        value.set(1);

        assert_eq!(value.get(), 2);
        assert_eq!(seen.borrow().last(), Some(&2));
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(value.observer_count(), 2);
    }

    #[test]
    fn update_closure_may_read_the_same_value() {
        let count = Observable::new(3u32);
        let reader = count.clone();

        count.update(|value| *value += reader.get());

        assert_eq!(count.get(), 6);
    }

    #[test]
    fn load_uses_default_when_key_is_absent_and_writes_it_back() {
        let store = memory();
        let first_run = Persisted::load(store.clone(), "first_run", true).unwrap();

        assert!(first_run.get());
        assert_eq!(store.get_item("first_run").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn load_treats_empty_string_as_absent() {
        let store = Rc::new(MemoryStore::with_entries([("endpointUrl", "")]));
        let endpoint =
            Persisted::load(store, "endpointUrl", "api-s.anixsekai.com".to_string()).unwrap();
        assert_eq!(endpoint.get(), "api-s.anixsekai.com");
    }

    #[test]
    fn malformed_value_is_reported_and_left_in_place() {
        let store = Rc::new(MemoryStore::with_entries([("first_run", "{not json")]));
        let err = Persisted::load(store.clone(), "first_run", true).unwrap_err();

        assert!(matches!(err, SettingsError::Corrupt { ref key, .. } if key == "first_run"));
        assert_eq!(
            store.get_item("first_run").unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn value_round_trips_through_a_fresh_container() {
        let store = memory();
        let history = Persisted::load(store.clone(), "pages", Vec::<String>::new()).unwrap();
        history
            .set(vec!["home".to_string(), "release/42".to_string()])
            .unwrap();

        let reloaded = Persisted::load(store, "pages", Vec::<String>::new()).unwrap();
        assert_eq!(reloaded.get(), vec!["home".to_string(), "release/42".to_string()]);
    }

    #[test]
    fn write_happens_before_observers_run() {
        let store = memory();
        let volume = Persisted::load(store.clone(), "volume", 50u32).unwrap();
        let observed_in_store = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&observed_in_store);
        let reader = store.clone();
        volume.observe(move |_| {
            *sink.borrow_mut() = reader.get_item("volume").unwrap();
        });

        volume.set(80).unwrap();

        assert_eq!(observed_in_store.borrow().as_deref(), Some("80"));
    }

    #[test]
    fn reset_restores_default() {
        let store = memory();
        let mode = Persisted::load(store.clone(), "mode", 15u8).unwrap();
        mode.set(18).unwrap();
        mode.reset().unwrap();

        assert_eq!(mode.get(), 15);
        assert_eq!(store.get_item("mode").unwrap().as_deref(), Some("15"));
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(Some("1".to_string()))
        }

        fn set_item(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Write {
                key: key.to_string(),
                message: "quota exceeded".to_string(),
            })
        }

        fn remove_item(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_surfaces_as_store_error() {
        let err = Persisted::load(Rc::new(ReadOnlyStore), "count", 0u32).unwrap_err();
        assert!(matches!(err, SettingsError::Store(StoreError::Write { .. })));
    }
}
