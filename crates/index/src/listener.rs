//! Broadcast registry for broken-index notifications

use crate::SearchIndex;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// Subscriber notified when a search index transitions to a broken state
///
/// The notification carries nothing beyond the index reference; the
/// subscriber can read the failure message from the index itself.
pub trait IndexListener: Send + Sync {
    fn index_is_broken(&self, index: &dyn SearchIndex);
}

/// Fan-out registry for [`IndexListener`] subscribers
///
/// One registry is shared by every index opened through the same
/// [`Indices`](crate::Indices) set. The broken notification is a
/// broadcast fired once per broken transition, not once per search call.
#[derive(Default)]
pub struct IndexListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn IndexListener>>>,
}

impl IndexListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Arc<dyn IndexListener>) {
        self.write_listeners().push(listener);
    }

    pub fn subscriber_count(&self) -> usize {
        self.read_listeners().len()
    }

    pub(crate) fn notify_broken(&self, index: &dyn SearchIndex) {
        warn!(
            "Index for repository '{}' is broken",
            index.repository_id()
        );
        for listener in self.read_listeners().iter() {
            listener.index_is_broken(index);
        }
    }

    fn read_listeners(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn IndexListener>>> {
        match self.listeners.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_listeners(&self) -> RwLockWriteGuard<'_, Vec<Arc<dyn IndexListener>>> {
        match self.listeners.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
