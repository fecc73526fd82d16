//! Typed settings for Redis/Valkey connections.
//!
//! These are the bound, validated counterparts of the flat configuration keys
//! accepted by [`bind`](crate::settings::bind). Defaults follow the common
//! single-node deployment: `localhost:6379`, database 0, a 2 second connect
//! timeout, and no pooling.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::settings::bind::ConfigError;

/// Default server hostname.
pub const DEFAULT_HOST: &str = "localhost";

/// Default server port.
pub const DEFAULT_PORT: u16 = 6379;

/// Default database index.
pub const DEFAULT_DATABASE: u8 = 0;

/// Default connect timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Default maximum number of idle pooled connections.
pub const DEFAULT_POOL_MAX_IDLE: u32 = 8;

/// Default maximum number of active pooled connections.
pub const DEFAULT_POOL_MAX_ACTIVE: u32 = 8;

/// Default minimum number of idle pooled connections.
pub const DEFAULT_POOL_MIN_IDLE: u32 = 0;

/// Connection settings for a Redis/Valkey deployment.
///
/// Immutable once bound. `sentinel` and the plain `host`/`port` pair can both
/// be present; topology classification treats `sentinel` as authoritative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RedisSettings {
    /// Server hostname (ignored for connection purposes in sentinel mode).
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port (1-65535).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database index selected after connecting.
    #[serde(default = "default_database")]
    pub database: u8,

    /// Password used when authenticating.
    #[serde(default)]
    pub password: Option<String>,

    /// Connect timeout handed to the transport.
    #[serde(default = "default_timeout")]
    pub connect_timeout: Duration,

    /// Pool limits. `Some` only when at least one pool key was explicitly
    /// supplied; `None` means no pooling was requested.
    #[serde(default)]
    pub pool: Option<PoolSettings>,

    /// Sentinel deployment description, if configured.
    #[serde(default)]
    pub sentinel: Option<SentinelSettings>,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: default_database(),
            password: None,
            connect_timeout: default_timeout(),
            pool: None,
            sentinel: None,
        }
    }
}

/// Connection pool limits.
///
/// Fields not explicitly configured fall back to these defaults rather than
/// failing: 8 idle, 8 active, unbounded wait, 0 minimum idle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PoolSettings {
    /// Maximum number of idle connections kept in the pool.
    #[serde(default = "default_pool_max_idle")]
    pub max_idle: u32,

    /// Maximum number of connections the pool may hand out.
    #[serde(default = "default_pool_max_active")]
    pub max_active: u32,

    /// Maximum time to wait for a connection. `None` means wait indefinitely.
    #[serde(default)]
    pub max_wait: Option<Duration>,

    /// Minimum number of idle connections to maintain.
    #[serde(default = "default_pool_min_idle")]
    pub min_idle: u32,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_idle: DEFAULT_POOL_MAX_IDLE,
            max_active: DEFAULT_POOL_MAX_ACTIVE,
            max_wait: None,
            min_idle: DEFAULT_POOL_MIN_IDLE,
        }
    }
}

/// Sentinel deployment description: the monitored master name and the known
/// sentinel nodes.
///
/// Node order is preserved as configured; it only affects the order in which
/// the transport attempts sentinels. Duplicates are permitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SentinelSettings {
    /// Name of the master the sentinels monitor.
    pub master_name: String,

    /// Known sentinel nodes, at least one.
    pub nodes: Vec<SentinelNode>,
}

/// A single `host:port` sentinel address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SentinelNode {
    pub host: String,
    pub port: u16,
}

impl SentinelNode {
    /// Create a new node address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for SentinelNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for SentinelNode {
    type Err = ConfigError;

    /// Parse a `host:port` element.
    ///
    /// The host part must be non-empty and contain no whitespace or further
    /// colons; the port must be a decimal number in 1-65535.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let node_regex = Regex::new(r"^([^\s:]+):(\d+)$")
            .map_err(|e| ConfigError::RegexCompilation(e.to_string()))?;

        let element = s.trim();
        let caps = node_regex
            .captures(element)
            .ok_or_else(|| ConfigError::InvalidNode {
                element: element.to_string(),
                reason: "expected `host:port`".to_string(),
            })?;

        let (host, port) = match (caps.get(1), caps.get(2)) {
            (Some(host), Some(port)) => (host.as_str(), port.as_str()),
            _ => {
                return Err(ConfigError::InvalidNode {
                    element: element.to_string(),
                    reason: "expected `host:port`".to_string(),
                });
            }
        };

        let port: u16 = port.parse().map_err(|_| ConfigError::InvalidNode {
            element: element.to_string(),
            reason: "port must be between 1 and 65535".to_string(),
        })?;
        if port == 0 {
            return Err(ConfigError::InvalidNode {
                element: element.to_string(),
                reason: "port must be between 1 and 65535".to_string(),
            });
        }

        Ok(SentinelNode::new(host, port))
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database() -> u8 {
    DEFAULT_DATABASE
}

fn default_timeout() -> Duration {
    Duration::from_millis(DEFAULT_TIMEOUT_MS)
}

fn default_pool_max_idle() -> u32 {
    DEFAULT_POOL_MAX_IDLE
}

fn default_pool_max_active() -> u32 {
    DEFAULT_POOL_MAX_ACTIVE
}

fn default_pool_min_idle() -> u32 {
    DEFAULT_POOL_MIN_IDLE
}
