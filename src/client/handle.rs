//! The connection handle: introspectable configuration plus a lazily created
//! transport.

use std::fmt;
use std::time::Duration;

use fred::prelude::*;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::client::topology::Topology;
use crate::settings::{PoolSettings, RedisSettings, SentinelNode};

/// Errors surfaced by an active connection handle.
///
/// Transport failures (connection refused, authentication, timeouts) are
/// passed through unchanged from the underlying client library; this crate
/// adds no retry logic on top.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failure in the underlying transport.
    #[error(transparent)]
    Transport(#[from] fred::error::Error),
}

/// The live transport behind a handle.
pub(crate) enum Transport {
    Single(Client),
    Pooled(Pool),
}

/// A configured client handle.
///
/// Created once per composition scope, either by
/// [`build`](crate::client::build) or supplied by the caller, and shared by
/// every consumer through an `Arc`. All accessors answer from the bound
/// settings without a live connection; the transport is created and
/// initialized on first use.
pub struct ConnectionHandle {
    settings: RedisSettings,
    topology: Topology,
    config: Config,
    pool_size: Option<usize>,
    transport: OnceCell<Transport>,
}

impl ConnectionHandle {
    pub(crate) fn new(
        settings: RedisSettings,
        topology: Topology,
        config: Config,
        pool_size: Option<usize>,
    ) -> Self {
        Self {
            settings,
            topology,
            config,
            pool_size,
            transport: OnceCell::new(),
        }
    }

    /// Effective server hostname.
    pub fn host(&self) -> &str {
        &self.settings.host
    }

    /// Effective server port.
    pub fn port(&self) -> u16 {
        self.settings.port
    }

    /// Database index selected after connecting.
    pub fn database(&self) -> u8 {
        self.settings.database
    }

    /// Connect timeout handed to the transport.
    pub fn timeout(&self) -> Duration {
        self.settings.connect_timeout
    }

    /// Pool limits, when pooling was requested.
    pub fn pool_config(&self) -> Option<&PoolSettings> {
        self.settings.pool.as_ref()
    }

    /// Whether this handle reaches the deployment through sentinels.
    pub fn is_sentinel_aware(&self) -> bool {
        self.topology == Topology::Sentinel
    }

    /// Name of the sentinel-monitored master, when configured.
    pub fn sentinel_master(&self) -> Option<&str> {
        self.settings
            .sentinel
            .as_ref()
            .map(|sentinel| sentinel.master_name.as_str())
    }

    /// Configured sentinel nodes, in configuration order.
    pub fn sentinel_nodes(&self) -> &[SentinelNode] {
        self.settings
            .sentinel
            .as_ref()
            .map(|sentinel| sentinel.nodes.as_slice())
            .unwrap_or_default()
    }

    /// The classified topology.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// The settings this handle was built from.
    pub fn settings(&self) -> &RedisSettings {
        &self.settings
    }

    /// Whether the transport has been created and is currently connected.
    pub fn is_connected(&self) -> bool {
        match self.transport.get() {
            Some(Transport::Single(client)) => client.is_connected(),
            Some(Transport::Pooled(pool)) => pool.is_connected(),
            None => false,
        }
    }

    /// Force creation and initialization of the transport.
    ///
    /// This is the first point at which network I/O happens for an auto-built
    /// handle. Idempotent: later calls reuse the established transport.
    #[instrument(skip(self), fields(topology = %self.topology))]
    pub async fn connect(&self) -> Result<(), ClientError> {
        self.transport().await.map(|_| ())
    }

    /// Release the underlying transport resources.
    ///
    /// Safe to call repeatedly and on a handle that never connected.
    pub async fn close(&self) -> Result<(), ClientError> {
        match self.transport.get() {
            None => Ok(()),
            Some(Transport::Single(client)) => {
                if client.is_connected() {
                    client.quit().await?;
                }
                Ok(())
            }
            Some(Transport::Pooled(pool)) => {
                if pool.is_connected() {
                    pool.quit().await?;
                }
                Ok(())
            }
        }
    }

    /// The live transport, created on first use.
    pub(crate) async fn transport(&self) -> Result<&Transport, ClientError> {
        self.transport
            .get_or_try_init(|| self.create_transport())
            .await
    }

    async fn create_transport(&self) -> Result<Transport, ClientError> {
        let timeout = self.settings.connect_timeout;

        match self.pool_size {
            Some(size) => {
                let pool = Builder::from_config(self.config.clone())
                    .with_performance_config(|perf| {
                        perf.default_command_timeout = timeout;
                    })
                    .with_connection_config(|conn| {
                        conn.connection_timeout = timeout;
                    })
                    .build_pool(size)?;
                debug!(size, "initializing connection pool");
                pool.init().await?;
                Ok(Transport::Pooled(pool))
            }
            None => {
                let client = Builder::from_config(self.config.clone())
                    .with_performance_config(|perf| {
                        perf.default_command_timeout = timeout;
                    })
                    .with_connection_config(|conn| {
                        conn.connection_timeout = timeout;
                    })
                    .build()?;
                debug!("initializing connection");
                client.init().await?;
                Ok(Transport::Single(client))
            }
        }
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("topology", &self.topology)
            .field("settings", &self.settings)
            .field("initialized", &self.transport.initialized())
            .finish_non_exhaustive()
    }
}
