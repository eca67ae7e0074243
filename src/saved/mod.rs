use crate::error::StorageError;
use crate::models::SearchResultItem;
use crate::storage::KeyValueStore;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Storage key holding the JSON array of saved post ids
pub const SAVED_POSTS_KEY: &str = "savedPosts";

/// Change notification for the saved set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedEvent {
    Saved(String),
    Unsaved(String),
    Cleared,
    /// Ids dropped because the server no longer has them
    Pruned(Vec<String>),
    /// Another process touched the store; re-read everything
    Reloaded,
}

/// Bookmarked item ids, shared by every view that shows a save toggle.
///
/// Mutations are serialized through one lock and each one is followed by an
/// event, so views re-derive their "is saved" flag instead of caching it.
/// Create one per store and hand every view a clone of the same
/// `Arc<SavedItems>`; separate instances do not see each other's events.
pub struct SavedItems {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
    events: broadcast::Sender<SavedEvent>,
}

impl SavedItems {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            store,
            write_lock: Mutex::new(()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SavedEvent> {
        self.events.subscribe()
    }

    /// Saved ids in the order they were saved
    pub fn ids(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.store.get(SAVED_POSTS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                // Unreadable list is treated as empty rather than blocking every view
                warn!("Discarding unreadable {}: {}", SAVED_POSTS_KEY, e);
                Ok(Vec::new())
            }
        }
    }

    pub fn is_saved(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.ids()?.iter().any(|saved| saved == id))
    }

    /// Add `id`. Saving an already saved id changes nothing and emits nothing.
    pub fn save(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.lock()?;
        self.insert_locked(id)
    }

    pub fn unsave(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.lock()?;
        self.remove_locked(id)
    }

    /// Flip membership; returns the new state. Read and write happen under one lock.
    pub fn toggle(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.lock()?;
        if self.is_saved(id)? {
            self.remove_locked(id)?;
            Ok(false)
        } else {
            self.insert_locked(id)?;
            Ok(true)
        }
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        self.store.remove(SAVED_POSTS_KEY)?;
        self.emit(SavedEvent::Cleared);
        Ok(())
    }

    /// Drop ids that are not in `existing`; returns what was removed
    pub fn retain_existing(&self, existing: &HashSet<String>) -> Result<Vec<String>, StorageError> {
        let _guard = self.lock()?;
        let ids = self.ids()?;
        let (kept, dropped): (Vec<String>, Vec<String>) =
            ids.into_iter().partition(|id| existing.contains(id));
        if !dropped.is_empty() {
            self.persist(&kept)?;
            info!("Pruned {} saved posts no longer on the server", dropped.len());
            self.emit(SavedEvent::Pruned(dropped.clone()));
        }
        Ok(dropped)
    }

    /// Set the derived `is_saved` flag on each item
    pub fn mark_saved(&self, items: &mut [SearchResultItem]) -> Result<(), StorageError> {
        let saved: HashSet<String> = self.ids()?.into_iter().collect();
        for item in items.iter_mut() {
            item.is_saved = saved.contains(&item.id);
        }
        Ok(())
    }

    /// Best-effort cross-process sync: tell subscribers to re-read
    pub fn external_change(&self) {
        self.emit(SavedEvent::Reloaded);
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.write_lock.lock().map_err(|_| StorageError::Poisoned)
    }

    // Callers hold `write_lock`
    fn insert_locked(&self, id: &str) -> Result<bool, StorageError> {
        let mut ids = self.ids()?;
        if ids.iter().any(|saved| saved == id) {
            return Ok(false);
        }
        ids.push(id.to_string());
        self.persist(&ids)?;
        info!("Saved post {}", id);
        self.emit(SavedEvent::Saved(id.to_string()));
        Ok(true)
    }

    fn remove_locked(&self, id: &str) -> Result<bool, StorageError> {
        let mut ids = self.ids()?;
        let before = ids.len();
        ids.retain(|saved| saved != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.persist(&ids)?;
        info!("Unsaved post {}", id);
        self.emit(SavedEvent::Unsaved(id.to_string()));
        Ok(true)
    }

    fn persist(&self, ids: &[String]) -> Result<(), StorageError> {
        let json = serde_json::to_string(ids).map_err(|e| StorageError::Corrupt {
            key: SAVED_POSTS_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(SAVED_POSTS_KEY, &json)
    }

    fn emit(&self, event: SavedEvent) {
        // No subscribers is fine
        if self.events.send(event).is_err() {
            debug!("No saved-set subscribers");
        }
    }
}
