//! Ordered observer registry.
//!
//! Registration hands back an [`ObserverId`] token; the same token removes
//! the observer again. Dispatch always iterates a snapshot of the list, so
//! the set of observers that sees an event is fixed when dispatch begins.

use std::sync::Arc;

/// Token identifying one registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl ObserverId {
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Observers in registration order.
pub struct CallbackRegistry<O: ?Sized> {
    entries: Vec<(ObserverId, Arc<O>)>,
    next_id: u64,
}

impl<O: ?Sized> Default for CallbackRegistry<O> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<O: ?Sized> std::fmt::Debug for CallbackRegistry<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("observers", &self.entries.iter().map(|(id, _)| id).collect::<Vec<_>>())
            .finish()
    }
}

impl<O: ?Sized> CallbackRegistry<O> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer. Registering the same `Arc` twice yields two
    /// independent registrations, each notified.
    pub fn register(&mut self, observer: Arc<O>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    /// Remove a registration. Returns `false` if the token is unknown.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        match self.entries.iter().position(|(entry, _)| *entry == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, id: ObserverId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current observers in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<O>> {
        self.entries.iter().map(|(_, o)| Arc::clone(o)).collect()
    }

    /// Call `f` for each observer in a snapshot of the list.
    pub fn for_each(&self, mut f: impl FnMut(&O)) {
        for observer in self.snapshot() {
            f(&observer);
        }
    }
}
