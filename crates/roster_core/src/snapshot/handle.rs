use super::format::ModelSnapshot;
use std::sync::{Arc, RwLock};

/// Shared, swappable pointer to the active model snapshot.
///
/// Readers clone the inner `Arc` and keep using it for as long as they
/// like; a retrain builds a complete new snapshot and swaps the pointer.
/// Nobody ever observes a half-updated model.
#[derive(Debug, Default)]
pub struct SnapshotHandle {
    inner: RwLock<Arc<ModelSnapshot>>,
}

impl SnapshotHandle {
    pub fn new(snapshot: ModelSnapshot) -> Self {
        Self {
            inner: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn current(&self) -> Arc<ModelSnapshot> {
        // A poisoned lock still holds a complete Arc.
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Install `next`, returning the snapshot it replaced.
    pub fn replace(&self, next: ModelSnapshot) -> Arc<ModelSnapshot> {
        let next = Arc::new(next);
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let previous = std::mem::replace(&mut *guard, next);
        log::info!(
            "model snapshot replaced (seasons {:?} -> {:?})",
            previous.train_seasons,
            guard.train_seasons
        );
        previous
    }

    /// Copy the current snapshot, edit the copy, swap it in.
    ///
    /// The write lock is held from copy to swap, so concurrent updates
    /// apply one after another and none is lost.
    pub fn update<F>(&self, edit: F) -> Arc<ModelSnapshot>
    where
        F: FnOnce(&mut ModelSnapshot),
    {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let mut next = (**guard).clone();
        edit(&mut next);
        let previous = std::mem::replace(&mut *guard, Arc::new(next));
        log::debug!(
            "model snapshot updated (seasons {:?} -> {:?})",
            previous.train_seasons,
            guard.train_seasons
        );
        previous
    }
}
