//! Client for a Redis-protocol server (Redis, KeyDB, Valkey).

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 6379;

/// Where to find the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            db: 0,
        }
    }
}

impl RedisConfig {
    /// Connection URL in the `redis://host:port/db` form.
    pub fn url(&self) -> String {
        if self.host.contains(':') {
            format!("redis://[{}]:{}/{}", self.host, self.port, self.db)
        } else {
            format!("redis://{}:{}/{}", self.host, self.port, self.db)
        }
    }
}

/// [`KvStore`] backed by a Redis-protocol server.
///
/// Holds a [`ConnectionManager`], which multiplexes commands over one
/// connection and is cheap to clone per call.
#[derive(Clone)]
pub struct RedisKvStore {
    conn: ConnectionManager,
    url: String,
}

impl RedisKvStore {
    /// Connect to the server described by `config`.
    pub async fn connect(config: &RedisConfig) -> StoreResult<Self> {
        let url = config.url();
        let client =
            redis::Client::open(url.as_str()).map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("{url}: {e}")))?;
        info!("connected to store at {}", url);
        Ok(Self { conn, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn command_error(command: &'static str, key: &str, err: RedisError) -> StoreError {
    if err.is_connection_dropped() || err.is_connection_refusal() || err.is_io_error() {
        return StoreError::Connection(err.to_string());
    }
    StoreError::Command {
        command,
        key: key.to_string(),
        reason: err.to_string(),
    }
}

/// Escape glob metacharacters so `prefix` is matched literally by `KEYS`.
fn glob_escape(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        let value: i64 = conn
            .incr(key, 1i64)
            .await
            .map_err(|e| command_error("INCR", key, e))?;
        debug!(key, value, "INCR");
        Ok(value)
    }

    async fn hset_multiple(&self, key: &str, fields: &[(&str, &str)]) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset_multiple(key, fields)
            .await
            .map_err(|e| command_error("HSET", key, e))?;
        debug!(key, fields = fields.len(), "HSET");
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, Vec<u8>> = conn
            .hgetall(key)
            .await
            .map_err(|e| command_error("HGETALL", key, e))?;
        debug!(key, fields = fields.len(), "HGETALL");
        Ok(fields.into_iter().collect())
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", glob_escape(prefix));
        let keys: Vec<String> = conn
            .keys(&pattern)
            .await
            .map_err(|e| command_error("KEYS", &pattern, e))?;
        debug!(pattern = %pattern, count = keys.len(), "KEYS");
        Ok(keys)
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn
            .del(key)
            .await
            .map_err(|e| command_error("DEL", key, e))?;
        debug!(key, removed, "DEL");
        Ok(removed > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| command_error("PING", "", e))?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisKvStore").field("url", &self.url).finish()
    }
}
