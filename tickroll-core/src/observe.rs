//! Explicit publish/subscribe in place of ambient reactivity.
//!
//! State that the rendering side watches owns an [`Observers`] list and calls
//! `notify` once per committed change. Derived values are memoized with
//! [`Derived`] keyed on the revision numbers they were computed from.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

pub struct Observers<T> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Observers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn notify(&mut self, value: &T) {
        for (_, callback) in &mut self.subscribers {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// A value with a revision counter and change notification.
#[derive(Debug)]
pub struct Observable<T> {
    value: T,
    revision: u64,
    observers: Observers<T>,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            revision: 0,
            observers: Observers::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.changed();
    }

    pub fn update<F: FnOnce(&mut T)>(&mut self, f: F) {
        f(&mut self.value);
        self.changed();
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn changed(&mut self) {
        self.revision += 1;
        self.observers.notify(&self.value);
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Memo recomputed only when its dependency key changes.
#[derive(Debug, Clone)]
pub struct Derived<K, T> {
    cached: Option<(K, T)>,
}

impl<K: PartialEq, T> Derived<K, T> {
    pub fn new() -> Self {
        Self { cached: None }
    }

    pub fn get_or_compute<F: FnOnce() -> T>(&mut self, key: K, compute: F) -> &T {
        let entry = match self.cached.take() {
            Some((k, v)) if k == key => (k, v),
            _ => (key, compute()),
        };
        &self.cached.insert(entry).1
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn is_cached_for(&self, key: &K) -> bool {
        matches!(&self.cached, Some((k, _)) if k == key)
    }
}

impl<K: PartialEq, T> Default for Derived<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
