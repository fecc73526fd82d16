//! String-typed operations facade.

use std::sync::Arc;
use std::time::Duration;

use fred::prelude::*;
use fred::types::Expiration;
use tracing::instrument;

use crate::client::handle::{ClientError, ConnectionHandle, Transport};

/// Convenience facade for string-keyed, string-valued operations.
///
/// Holds a reference to exactly one [`ConnectionHandle`], whichever handle
/// the composition produced, and never builds its own. Carries no state of
/// its own and no configuration logic; every call delegates to the handle's
/// transport, and transport failures surface unchanged.
#[derive(Clone, Debug)]
pub struct StringOps {
    handle: Arc<ConnectionHandle>,
}

impl StringOps {
    /// Bind the facade to an active handle.
    pub fn new(handle: Arc<ConnectionHandle>) -> Self {
        Self { handle }
    }

    /// The handle this facade delegates to.
    pub fn handle(&self) -> &Arc<ConnectionHandle> {
        &self.handle
    }

    /// Read the value of `key`.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        match self.handle.transport().await? {
            Transport::Single(client) => Ok(client.get(key).await?),
            Transport::Pooled(pool) => Ok(pool.get(key).await?),
        }
    }

    /// Set `key` to `value`.
    #[instrument(skip(self, value))]
    pub async fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        match self.handle.transport().await? {
            Transport::Single(client) => {
                let _: () = client.set(key, value, None, None, false).await?;
            }
            Transport::Pooled(pool) => {
                let _: () = pool.set(key, value, None, None, false).await?;
            }
        }
        Ok(())
    }

    /// Set `key` to `value` with a time-to-live.
    #[instrument(skip(self, value))]
    pub async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ClientError> {
        let expiration = Some(Expiration::PX(ttl.as_millis() as i64));
        match self.handle.transport().await? {
            Transport::Single(client) => {
                let _: () = client.set(key, value, expiration, None, false).await?;
            }
            Transport::Pooled(pool) => {
                let _: () = pool.set(key, value, expiration, None, false).await?;
            }
        }
        Ok(())
    }

    /// Delete `key`, returning the number of removed entries.
    #[instrument(skip(self))]
    pub async fn del(&self, key: &str) -> Result<u64, ClientError> {
        match self.handle.transport().await? {
            Transport::Single(client) => Ok(client.del(key).await?),
            Transport::Pooled(pool) => Ok(pool.del(key).await?),
        }
    }

    /// Whether `key` exists.
    #[instrument(skip(self))]
    pub async fn exists(&self, key: &str) -> Result<bool, ClientError> {
        let count: u64 = match self.handle.transport().await? {
            Transport::Single(client) => client.exists(key).await?,
            Transport::Pooled(pool) => pool.exists(key).await?,
        };
        Ok(count > 0)
    }

    /// Increment the counter at `key`, returning the new value.
    #[instrument(skip(self))]
    pub async fn incr(&self, key: &str) -> Result<i64, ClientError> {
        match self.handle.transport().await? {
            Transport::Single(client) => Ok(client.incr(key).await?),
            Transport::Pooled(pool) => Ok(pool.incr(key).await?),
        }
    }

    /// Ping the server.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<String, ClientError> {
        match self.handle.transport().await? {
            Transport::Single(client) => Ok(client.ping(None).await?),
            Transport::Pooled(pool) => Ok(pool.ping(None).await?),
        }
    }
}
