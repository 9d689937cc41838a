use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::cache::store::{CacheError, CacheKey, NoteCache};
use crate::forger::Forged;

/// In-memory implementation of NoteCache
///
/// Unbounded, no eviction. Entries live until the process exits or `clear`.
#[derive(Debug, Default)]
pub struct InMemoryNoteCache {
    /// Thread-safe storage of forged notes
    entries: Arc<RwLock<HashMap<CacheKey, Forged>>>,
}

impl InMemoryNoteCache {
    /// Create a new InMemoryNoteCache
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteCache for InMemoryNoteCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Forged>, CacheError> {
        let entries = self.entries.read().map_err(|e| {
            CacheError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: CacheKey, value: Forged) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|e| {
            CacheError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.insert(key, value);
        debug!(entries = entries.len(), "Stored forged notes");
        Ok(())
    }

    async fn len(&self) -> Result<usize, CacheError> {
        let entries = self.entries.read().map_err(|e| {
            CacheError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.len())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|e| {
            CacheError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::CacheScope;
    use tokio::test;

    #[test]
    async fn test_put_and_get() {
        let cache = InMemoryNoteCache::new();
        let key = CacheScope::Process.key(None, "some lecture text");

        assert_eq!(cache.get(&key).await.unwrap(), None);

        cache
            .put(key.clone(), Forged::Notes("# Notes".to_string()))
            .await
            .unwrap();

        assert_eq!(
            cache.get(&key).await.unwrap(),
            Some(Forged::Notes("# Notes".to_string()))
        );
        assert_eq!(cache.len().await.unwrap(), 1);
    }

    #[test]
    async fn test_distinct_keys_do_not_share_entries() {
        let cache = InMemoryNoteCache::new();
        let first = CacheScope::Process.key(None, "first text");
        let second = CacheScope::Process.key(None, "second text");

        cache
            .put(first.clone(), Forged::Notes("first".to_string()))
            .await
            .unwrap();

        assert_eq!(cache.get(&second).await.unwrap(), None);
        assert_eq!(
            cache.get(&first).await.unwrap(),
            Some(Forged::Notes("first".to_string()))
        );
    }

    #[test]
    async fn test_put_replaces_and_clear_empties() {
        let cache = InMemoryNoteCache::new();
        let key = CacheScope::Session.key(Some("abc"), "text");

        cache
            .put(key.clone(), Forged::Failed("boom".to_string()))
            .await
            .unwrap();
        cache
            .put(key.clone(), Forged::Notes("ok".to_string()))
            .await
            .unwrap();

        assert_eq!(cache.len().await.unwrap(), 1);
        assert_eq!(
            cache.get(&key).await.unwrap(),
            Some(Forged::Notes("ok".to_string()))
        );

        cache.clear().await.unwrap();
        assert_eq!(cache.len().await.unwrap(), 0);
    }
}
