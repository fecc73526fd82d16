//! redis-bootstrap library crate
//!
//! Configuration-driven bootstrap for Redis/Valkey clients. Flat key/value
//! configuration is bound into typed settings, classified into a connection
//! topology (standalone, pooled, or sentinel), and built into an
//! introspectable [`ConnectionHandle`] plus a [`StringOps`] facade. A handle
//! supplied by the caller always wins over an auto-built one.
//!
//! Building is pure: no network I/O happens until a consumer forces the
//! transport, so handles can be constructed and inspected with no server
//! reachable.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use redis_bootstrap::Composition;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = HashMap::from([
//!     ("host".to_string(), "cache.internal".to_string()),
//!     ("pool.max-idle".to_string(), "4".to_string()),
//! ]);
//!
//! let composition = Composition::from_config(&raw)?;
//! composition.string_ops().set("greeting", "hello").await?;
//! composition.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod compose;
pub mod settings;

pub use client::{ClientError, ConnectionHandle, StringOps, Topology, build, build_with};
pub use compose::{Composition, activate};
pub use settings::{
    ConfigError, PoolSettings, RedisSettings, SentinelNode, SentinelSettings, bind,
};
