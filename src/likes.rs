use tracing::{debug, warn};

use crate::storage::KeyValueStore;
use crate::types::LikeRecord;

pub const DEFAULT_LIKES_KEY: &str = "likes";

/// Liked recipes in the order they were liked.
///
/// Every mutation rewrites the whole list to storage as a JSON array. The
/// list stays small (tens of entries) so this is cheaper than it sounds.
pub struct LikeStore<S> {
    likes: Vec<LikeRecord>,
    storage: S,
    key: String,
}

impl<S: KeyValueStore> LikeStore<S> {
    /// Empty store over `storage`, persisting under `key`
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        LikeStore {
            likes: Vec::new(),
            storage,
            key: key.into(),
        }
    }

    /// Store restored from whatever `storage` holds under `key`
    pub fn restore(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self::new(storage, key);
        store.load_from_storage();
        store
    }

    /// Replace the in-memory list with the persisted one. A missing or
    /// malformed payload leaves the store empty.
    pub fn load_from_storage(&mut self) {
        let Some(raw) = self.storage.get(&self.key) else {
            self.likes.clear();
            return;
        };

        match serde_json::from_str::<Option<Vec<LikeRecord>>>(&raw) {
            Ok(likes) => {
                self.likes = likes.unwrap_or_default();
                debug!("Restored {} likes", self.likes.len());
            }
            Err(e) => {
                warn!("Ignoring malformed likes payload: {}", e);
                self.likes.clear();
            }
        }
    }

    /// Like a recipe. Liking an id twice keeps the first record.
    pub fn add(&mut self, id: &str, title: &str, author: &str, image_url: &str) -> LikeRecord {
        if let Some(existing) = self.likes.iter().find(|like| like.id == id) {
            return existing.clone();
        }

        let like = LikeRecord {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            image_url: image_url.to_string(),
        };
        self.likes.push(like.clone());
        self.persist();
        like
    }

    /// Unlike a recipe. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) {
        if let Some(index) = self.likes.iter().position(|like| like.id == id) {
            self.likes.remove(index);
            self.persist();
        }
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.likes.iter().any(|like| like.id == id)
    }

    pub fn count(&self) -> usize {
        self.likes.len()
    }

    pub fn records(&self) -> &[LikeRecord] {
        &self.likes
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.likes) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode likes: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &payload) {
            warn!("Failed to persist likes: {}", e);
        }
    }
}
