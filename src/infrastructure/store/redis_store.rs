//! Redis-backed key-value store namespace.

use super::service::{KeyValueStore, StoreError, StoreResult, WindowedDecrement};
use async_trait::async_trait;
use redis::{Client, Script, aio::ConnectionManager};
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};

/// Initializes, decrements and floor-checks a windowed counter in one round trip.
///
/// KEYS[1] = counter key, ARGV[1] = ceiling, ARGV[2] = window in milliseconds.
/// Returns `{accepted, remaining, pttl}`.
static WINDOWED_DECREMENT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r"
local current = redis.call('GET', KEYS[1])
if not current then
  redis.call('SET', KEYS[1], ARGV[1], 'PX', ARGV[2])
end
local remaining = redis.call('DECR', KEYS[1])
local ttl = redis.call('PTTL', KEYS[1])
if ttl < 0 then
  redis.call('PEXPIRE', KEYS[1], ARGV[2])
  ttl = tonumber(ARGV[2])
end
if remaining < 0 then
  redis.call('INCR', KEYS[1])
  return {0, remaining + 1, ttl}
end
return {1, remaining, ttl}
",
    )
});

/// One Redis logical database used as a namespace.
///
/// Uses `ConnectionManager` for automatic reconnection; clones of the manager
/// share the same multiplexed connection.
pub struct RedisStore {
    conn: ConnectionManager,
    db: u8,
    op_timeout: Duration,
}

impl RedisStore {
    /// Connects to one Redis database and verifies it with a PING.
    ///
    /// Both the connection and the PING are bounded by `connect_timeout`; a
    /// namespace that cannot be reached fails here instead of on first use.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Connection string including the database index
    ///   (e.g. `"redis://:secret@localhost:6379/1"`)
    /// - `db` - Database index, used for logging only
    /// - `connect_timeout` - Upper bound for connect + PING
    /// - `op_timeout` - Upper bound applied to every later command
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails or times out.
    pub async fn connect(
        redis_url: &str,
        db: u8,
        connect_timeout: Duration,
        op_timeout: Duration,
    ) -> StoreResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let mut conn = tokio::time::timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                StoreError::Connection(format!(
                    "Timed out connecting to Redis db {} after {:?}",
                    db, connect_timeout
                ))
            })?
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let ping = redis::cmd("PING");
        tokio::time::timeout(connect_timeout, ping.query_async::<String>(&mut conn))
            .await
            .map_err(|_| StoreError::Connection(format!("Redis PING timed out on db {}", db)))?
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!(db, "Connected to Redis");

        Ok(Self {
            conn,
            db,
            op_timeout,
        })
    }

    /// Runs one command under the per-operation timeout.
    async fn run<T, F>(&self, command: &'static str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(StoreError::command(command, e.to_string())),
            Err(_) => Err(StoreError::Timeout {
                command,
                timeout: self.op_timeout,
            }),
        }
    }
}

fn ttl_millis(command: &'static str, ttl: Duration) -> StoreResult<u64> {
    match u64::try_from(ttl.as_millis()) {
        Ok(0) => Err(StoreError::command(command, "TTL must be positive")),
        Ok(ms) => Ok(ms),
        Err(_) => Err(StoreError::command(command, "TTL is too large")),
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        self.run("GET", async move {
            redis::cmd("GET")
                .arg(key)
                .query_async::<Option<String>>(&mut conn)
                .await
        })
        .await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let ms = ttl_millis("SET", ttl)?;
        let mut conn = self.conn.clone();
        self.run("SET", async move {
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("PX")
                .arg(ms)
                .query_async::<()>(&mut conn)
                .await
        })
        .await?;

        debug!(db = self.db, key, ttl_ms = ms, "SET");
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool> {
        let ms = ttl_millis("SET NX", ttl)?;
        let mut conn = self.conn.clone();
        let reply = self
            .run("SET NX", async move {
                redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("NX")
                    .arg("PX")
                    .arg(ms)
                    .query_async::<Option<String>>(&mut conn)
                    .await
            })
            .await?;

        Ok(reply.is_some())
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        self.run("INCR", async move {
            redis::cmd("INCR").arg(key).query_async::<i64>(&mut conn).await
        })
        .await
    }

    async fn decrement(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        self.run("DECR", async move {
            redis::cmd("DECR").arg(key).query_async::<i64>(&mut conn).await
        })
        .await
    }

    async fn time_to_live(&self, key: &str) -> StoreResult<Option<Duration>> {
        let mut conn = self.conn.clone();
        let pttl = self
            .run("PTTL", async move {
                redis::cmd("PTTL").arg(key).query_async::<i64>(&mut conn).await
            })
            .await?;

        // -2: no such key, -1: no expiry
        Ok(u64::try_from(pttl).ok().map(Duration::from_millis))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let deleted = self
            .run("DEL", async move {
                redis::cmd("DEL").arg(key).query_async::<i64>(&mut conn).await
            })
            .await?;

        Ok(deleted > 0)
    }

    async fn decrement_within_window(
        &self,
        key: &str,
        ceiling: i64,
        window: Duration,
    ) -> StoreResult<WindowedDecrement> {
        let ms = ttl_millis("EVALSHA", window)?;
        let mut conn = self.conn.clone();
        let (accepted, remaining, ttl) = self
            .run("EVALSHA", async move {
                WINDOWED_DECREMENT
                    .key(key)
                    .arg(ceiling)
                    .arg(ms)
                    .invoke_async::<(i64, i64, i64)>(&mut conn)
                    .await
            })
            .await?;

        Ok(WindowedDecrement {
            accepted: accepted == 1,
            remaining,
            resets_in: Duration::from_millis(u64::try_from(ttl).unwrap_or(0)),
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        self.run("PING", async move {
            redis::cmd("PING").query_async::<String>(&mut conn).await
        })
        .await
        .map(|_| ())
    }
}
