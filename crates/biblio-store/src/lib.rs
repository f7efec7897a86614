//! Key-value storage for Biblio.
//!
//! Biblio keeps its data in a Redis-protocol key-value store (Redis, KeyDB,
//! Valkey). This crate narrows that store down to the handful of primitives
//! the catalog needs: hash writes and reads, a prefix key scan, key deletion,
//! and an atomic counter.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- `HashMap`-based store for tests and local runs
//! - [`RedisKvStore`] -- client for a running Redis-protocol server
//!
//! # Design Rules
//!
//! 1. Every operation maps to one native store command. No retries.
//! 2. `incr` is atomic; callers rely on it for unique ids.
//! 3. Hash values are returned as raw bytes. Decoding is the caller's job.
//! 4. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod redis_store;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryKvStore;
pub use redis_store::{RedisConfig, RedisKvStore};
pub use traits::KvStore;
