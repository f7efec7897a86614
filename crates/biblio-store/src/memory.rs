use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

#[derive(Clone, Debug)]
enum Value {
    Counter(i64),
    Hash(HashMap<String, Vec<u8>>),
}

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and local runs without a store server. Keys hold
/// either a counter or a hash, like their Redis counterparts, and using a key
/// with the wrong kind of command fails with [`StoreError::WrongType`].
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl InMemoryKvStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Write a raw byte value into a hash field, bypassing text fields.
    pub async fn hset_bytes(&self, key: &str, field: &str, value: Vec<u8>) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        let hash = hash_entry(&mut entries, key)?;
        hash.insert(field.to_string(), value);
        Ok(())
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_entry<'a>(
    entries: &'a mut HashMap<String, Value>,
    key: &str,
) -> StoreResult<&'a mut HashMap<String, Vec<u8>>> {
    match entries
        .entry(key.to_string())
        .or_insert_with(|| Value::Hash(HashMap::new()))
    {
        Value::Hash(hash) => Ok(hash),
        Value::Counter(_) => Err(StoreError::WrongType {
            key: key.to_string(),
            expected: "hash",
        }),
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut entries = self.entries.write().await;
        match entries.entry(key.to_string()).or_insert(Value::Counter(0)) {
            Value::Counter(n) => {
                *n += 1;
                Ok(*n)
            }
            Value::Hash(_) => Err(StoreError::WrongType {
                key: key.to_string(),
                expected: "integer",
            }),
        }
    }

    async fn hset_multiple(&self, key: &str, fields: &[(&str, &str)]) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        let hash = hash_entry(&mut entries, key)?;
        for (field, value) in fields {
            hash.insert(field.to_string(), value.as_bytes().to_vec());
        }
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Hash(hash)) => Ok(hash
                .iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect()),
            Some(Value::Counter(_)) => Err(StoreError::WrongType {
                key: key.to_string(),
                expected: "hash",
            }),
        }
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(key).is_some())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.try_read().map(|e| e.len()).ok();
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn field<'a>(fields: &'a [(String, Vec<u8>)], name: &str) -> Option<&'a [u8]> {
        fields
            .iter()
            .find(|(f, _)| f == name)
            .map(|(_, v)| v.as_slice())
    }

    #[tokio::test]
    async fn incr_starts_at_one() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.incr("counter").await.unwrap(), 1);
        assert_eq!(store.incr("counter").await.unwrap(), 2);
        assert_eq!(store.incr("other").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_incr_yields_distinct_values() {
        let store = Arc::new(InMemoryKvStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.incr("c").await.unwrap() }));
        }
        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.unwrap());
        }
        seen.sort();
        assert_eq!(seen, (1..=16).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn hash_write_and_read() {
        let store = InMemoryKvStore::new();
        store
            .hset_multiple("h", &[("a", "1"), ("b", "2")])
            .await
            .unwrap();
        let fields = store.hgetall("h").await.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(field(&fields, "a"), Some(b"1".as_slice()));
        assert_eq!(field(&fields, "b"), Some(b"2".as_slice()));
    }

    #[tokio::test]
    async fn hash_write_overwrites_named_fields_only() {
        let store = InMemoryKvStore::new();
        store.hset_multiple("h", &[("a", "1"), ("b", "2")]).await.unwrap();
        store.hset_multiple("h", &[("a", "9")]).await.unwrap();
        let fields = store.hgetall("h").await.unwrap();
        assert_eq!(field(&fields, "a"), Some(b"9".as_slice()));
        assert_eq!(field(&fields, "b"), Some(b"2".as_slice()));
    }

    #[tokio::test]
    async fn hgetall_missing_key_is_empty() {
        let store = InMemoryKvStore::new();
        assert!(store.hgetall("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn wrong_type_is_rejected() {
        let store = InMemoryKvStore::new();
        store.incr("c").await.unwrap();
        assert!(matches!(
            store.hgetall("c").await,
            Err(StoreError::WrongType { expected: "hash", .. })
        ));
        assert!(matches!(
            store.hset_multiple("c", &[("a", "1")]).await,
            Err(StoreError::WrongType { .. })
        ));

        store.hset_multiple("h", &[("a", "1")]).await.unwrap();
        assert!(matches!(
            store.incr("h").await,
            Err(StoreError::WrongType { expected: "integer", .. })
        ));
    }

    #[tokio::test]
    async fn scan_prefix_filters_keys() {
        let store = InMemoryKvStore::new();
        store.hset_multiple("book:1", &[("a", "1")]).await.unwrap();
        store.hset_multiple("book:2", &[("a", "1")]).await.unwrap();
        store.incr("next_book_id").await.unwrap();

        let mut keys = store.scan_prefix("book:").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["book:1".to_string(), "book:2".to_string()]);
        assert_eq!(store.scan_prefix("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn del_reports_existence() {
        let store = InMemoryKvStore::new();
        store.hset_multiple("h", &[("a", "1")]).await.unwrap();
        assert!(store.del("h").await.unwrap());
        assert!(!store.del("h").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn raw_bytes_are_preserved() {
        let store = InMemoryKvStore::new();
        store.hset_bytes("h", "a", vec![0xff, 0xfe]).await.unwrap();
        let fields = store.hgetall("h").await.unwrap();
        assert_eq!(field(&fields, "a"), Some([0xff, 0xfe].as_slice()));
        assert_eq!(store.len().await, 1);
    }
}
