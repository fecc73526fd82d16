//! Binding of flat string configuration into [`RedisSettings`].
//!
//! The input is a flat `key -> value` mapping, case-sensitive and
//! dot-namespaced (`host`, `pool.max-idle`, `sentinel.nodes`, ...).
//! Unrecognized keys are ignored for forward compatibility. A recognized key
//! whose value cannot be parsed fails the whole bind with an error naming the
//! offending key; nothing is silently defaulted.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::settings::model::{
    DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_POOL_MAX_ACTIVE, DEFAULT_POOL_MAX_IDLE,
    DEFAULT_POOL_MIN_IDLE, DEFAULT_PORT, DEFAULT_TIMEOUT_MS, PoolSettings, RedisSettings,
    SentinelNode, SentinelSettings,
};

/// Recognized configuration keys.
pub mod keys {
    /// Server hostname.
    pub const HOST: &str = "host";
    /// Server port.
    pub const PORT: &str = "port";
    /// Database index.
    pub const DATABASE: &str = "database";
    /// Authentication password.
    pub const PASSWORD: &str = "password";
    /// Connect timeout in milliseconds.
    pub const TIMEOUT: &str = "timeout";
    /// Maximum idle pooled connections.
    pub const POOL_MAX_IDLE: &str = "pool.max-idle";
    /// Maximum active pooled connections.
    pub const POOL_MAX_ACTIVE: &str = "pool.max-active";
    /// Maximum wait for a pooled connection, in milliseconds.
    pub const POOL_MAX_WAIT: &str = "pool.max-wait";
    /// Minimum idle pooled connections.
    pub const POOL_MIN_IDLE: &str = "pool.min-idle";
    /// Name of the sentinel-monitored master.
    pub const SENTINEL_MASTER: &str = "sentinel.master";
    /// Comma-separated `host:port` sentinel node list.
    pub const SENTINEL_NODES: &str = "sentinel.nodes";
}

/// Errors raised while binding flat configuration.
///
/// Binding is the only place configuration errors originate; topology
/// selection and handle construction are total over settings that passed it.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A recognized key holds a value that cannot be parsed to its type.
    #[error("invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// A key is set whose meaning depends on another key that is missing.
    #[error("`{present}` is set but `{missing}` is missing")]
    MissingDependent {
        present: &'static str,
        missing: &'static str,
    },

    /// An element of the sentinel node list is malformed.
    #[error("invalid sentinel node `{element}`: {reason}")]
    InvalidNode { element: String, reason: String },

    /// Failed to compile an internal parsing pattern.
    #[error("failed to compile pattern: {0}")]
    RegexCompilation(String),
}

/// Bind a flat configuration mapping into validated [`RedisSettings`].
///
/// Pure: no I/O, no state. Numeric keys without an explicit override fall
/// back to fixed defaults. Returns an error naming the offending key when a
/// value is malformed or when `sentinel.master` / `sentinel.nodes` are not
/// supplied together.
#[instrument(skip(raw), fields(entries = raw.len()))]
pub fn bind(raw: &HashMap<String, String>) -> Result<RedisSettings, ConfigError> {
    let host = raw
        .get(keys::HOST)
        .cloned()
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = parse_or(raw, keys::PORT, DEFAULT_PORT)?;
    if port == 0 {
        let value = raw.get(keys::PORT).cloned().unwrap_or_default();
        return Err(invalid_value(
            keys::PORT,
            &value,
            "port must be between 1 and 65535",
        ));
    }
    let database = parse_or(raw, keys::DATABASE, DEFAULT_DATABASE)?;
    let password = raw.get(keys::PASSWORD).cloned();
    let timeout_ms: u64 = parse_or(raw, keys::TIMEOUT, DEFAULT_TIMEOUT_MS)?;

    let pool = bind_pool(raw)?;
    let sentinel = bind_sentinel(raw)?;

    let settings = RedisSettings {
        host,
        port,
        database,
        password,
        connect_timeout: Duration::from_millis(timeout_ms),
        pool,
        sentinel,
    };
    debug!(
        host = %settings.host,
        port = settings.port,
        database = settings.database,
        pooled = settings.pool.is_some(),
        sentinel = settings.sentinel.is_some(),
        "bound connection settings"
    );
    Ok(settings)
}

/// Bind the `pool.*` keys.
///
/// Returns `Some` only when at least one pool key was explicitly supplied,
/// with the remaining fields at their defaults. This is what lets topology
/// selection distinguish "pooling requested" from "pooling never mentioned".
fn bind_pool(raw: &HashMap<String, String>) -> Result<Option<PoolSettings>, ConfigError> {
    let max_idle: Option<u32> = parse_opt(raw, keys::POOL_MAX_IDLE)?;
    let max_active: Option<u32> = parse_opt(raw, keys::POOL_MAX_ACTIVE)?;
    let max_wait_ms: Option<u64> = parse_opt(raw, keys::POOL_MAX_WAIT)?;
    let min_idle: Option<u32> = parse_opt(raw, keys::POOL_MIN_IDLE)?;

    if max_idle.is_none() && max_active.is_none() && max_wait_ms.is_none() && min_idle.is_none() {
        return Ok(None);
    }

    Ok(Some(PoolSettings {
        max_idle: max_idle.unwrap_or(DEFAULT_POOL_MAX_IDLE),
        max_active: max_active.unwrap_or(DEFAULT_POOL_MAX_ACTIVE),
        max_wait: max_wait_ms.map(Duration::from_millis),
        min_idle: min_idle.unwrap_or(DEFAULT_POOL_MIN_IDLE),
    }))
}

/// Bind the `sentinel.*` keys.
///
/// The master name and the node list are only meaningful together; one
/// without the other is a configuration error, not a default.
fn bind_sentinel(raw: &HashMap<String, String>) -> Result<Option<SentinelSettings>, ConfigError> {
    let master = raw.get(keys::SENTINEL_MASTER);
    let nodes = raw.get(keys::SENTINEL_NODES);

    match (master, nodes) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::MissingDependent {
            present: keys::SENTINEL_MASTER,
            missing: keys::SENTINEL_NODES,
        }),
        (None, Some(_)) => Err(ConfigError::MissingDependent {
            present: keys::SENTINEL_NODES,
            missing: keys::SENTINEL_MASTER,
        }),
        (Some(master), Some(nodes)) => {
            if master.trim().is_empty() {
                return Err(invalid_value(
                    keys::SENTINEL_MASTER,
                    master,
                    "master name must not be empty",
                ));
            }
            let nodes = parse_node_list(nodes)?;
            Ok(Some(SentinelSettings {
                master_name: master.trim().to_string(),
                nodes,
            }))
        }
    }
}

/// Parse a comma-separated `host:port` list, preserving order.
///
/// Duplicates are kept. A malformed element fails the whole list, naming the
/// element.
fn parse_node_list(value: &str) -> Result<Vec<SentinelNode>, ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid_value(
            keys::SENTINEL_NODES,
            value,
            "at least one `host:port` entry is required",
        ));
    }

    value
        .split(',')
        .map(|element| element.parse::<SentinelNode>())
        .collect()
}

/// Look up `key` and parse it, falling back to `default` when absent.
fn parse_or<T>(raw: &HashMap<String, String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    Ok(parse_opt(raw, key)?.unwrap_or(default))
}

/// Look up `key` and parse it, returning `None` when absent.
fn parse_opt<T>(raw: &HashMap<String, String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.get(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| invalid_value(key, value, e)),
    }
}

fn invalid_value(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
