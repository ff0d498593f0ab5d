// ── Ordered reactive entity collection ──
//
// Holds the current list as an immutable snapshot inside a `watch`
// channel. Every mutation swaps in a new snapshot; readers never block
// writers and always see a consistent list.

use std::sync::Arc;

use tokio::sync::watch;

/// Entities addressable by a stable key.
pub(crate) trait Keyed {
    type Key: PartialEq + ?Sized;

    fn key(&self) -> &Self::Key;
}

/// An ordered, reactive collection for a single entity type.
///
/// Order is the order the store returned; it is preserved across every
/// mutation. Lookups are linear, which is fine at profile-list scale.
pub(crate) struct EntityCollection<T: Keyed + Clone + Send + Sync + 'static> {
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Keyed + Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { snapshot }
    }

    /// Replace the whole list.
    pub(crate) fn replace_all(&self, items: Vec<T>) {
        let values: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    /// Mutate the entity with `key` in place. Returns `false` (and notifies
    /// nobody) if no such entity exists.
    pub(crate) fn update<F>(&self, key: &T::Key, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        self.snapshot.send_if_modified(|snap| {
            let Some(index) = snap.iter().position(|item| item.key() == key) else {
                return false;
            };
            let mut next: Vec<Arc<T>> = Vec::clone(snap);
            if let Some(slot) = next.get_mut(index) {
                f(Arc::make_mut(slot));
            }
            *snap = Arc::new(next);
            true
        })
    }

    /// Mutate every entity; `f` returns whether it changed anything.
    pub(crate) fn update_all<F>(&self, mut f: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        self.snapshot.send_if_modified(|snap| {
            let mut changed = false;
            let next: Vec<Arc<T>> = snap
                .iter()
                .map(|item| {
                    let mut owned = T::clone(item);
                    if f(&mut owned) {
                        changed = true;
                        Arc::new(owned)
                    } else {
                        Arc::clone(item)
                    }
                })
                .collect();
            if changed {
                *snap = Arc::new(next);
            }
            changed
        });
    }

    pub(crate) fn get(&self, key: &T::Key) -> Option<Arc<T>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|item| item.key() == key)
            .cloned()
    }

    pub(crate) fn first(&self) -> Option<Arc<T>> {
        self.snapshot.borrow().first().cloned()
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }
}
