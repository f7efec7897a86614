use async_trait::async_trait;

use crate::error::StoreResult;

/// Minimal key-value store interface.
///
/// All implementations must satisfy these invariants:
/// - `incr` is atomic across concurrent callers and treats a missing key as 0.
/// - Hash writes only touch the named fields; other fields are kept.
/// - Reading a missing key is not an error: `hgetall` returns no fields.
/// - Values are stored and returned as raw bytes.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Atomically increment the integer at `key` and return the new value.
    async fn incr(&self, key: &str) -> StoreResult<i64>;

    /// Set the given fields of the hash at `key`, creating it if needed.
    async fn hset_multiple(&self, key: &str, fields: &[(&str, &str)]) -> StoreResult<()>;

    /// Read all fields of the hash at `key`.
    ///
    /// Returns an empty list if the key does not exist.
    async fn hgetall(&self, key: &str) -> StoreResult<Vec<(String, Vec<u8>)>>;

    /// List every key starting with `prefix`.
    ///
    /// Order is backend-defined and not stable between calls.
    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Delete `key`. Returns `true` if the key existed.
    async fn del(&self, key: &str) -> StoreResult<bool>;

    /// Check that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
