//! Thread-safe listener sets.
//!
//! Registration and removal may happen from any thread, including from inside
//! a callback. Firing iterates a snapshot of the registered callbacks.

use core::fmt;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle returned by [`ListenerSet::add`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

pub struct ListenerSet<E: 'static> {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, Callback<E>)>>,
}

impl<E: 'static> ListenerSet<E> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn add<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, Arc::new(callback)));
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    pub fn fire(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for cb in snapshot {
            cb(event);
        }
    }
}

impl<E: 'static> Default for ListenerSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> fmt::Debug for ListenerSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.len())
            .finish()
    }
}
