//! In-process store

use super::{KeyValueStore, StoreError};
use moka::sync::Cache;

/// Store that lives as long as the process
pub struct MemoryStore {
    cache: Cache<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().max_capacity(64).build(),
            quota: None,
        }
    }

    /// Reject values larger than `bytes`
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.cache.get(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    size: value.len(),
                    quota,
                });
            }
        }
        self.cache.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.cache.invalidate(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));

        store.delete("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_quota() {
        let store = MemoryStore::new().with_quota(4);
        assert!(store.set("a", "1234").is_ok());
        assert!(matches!(
            store.set("a", "12345"),
            Err(StoreError::QuotaExceeded { size: 5, quota: 4 })
        ));
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1234"));
    }
}
