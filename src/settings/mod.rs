//! Connection settings: the typed model and the flat-configuration binder.
//!
//! ## Architecture
//!
//! - `model`: validated value types ([`RedisSettings`], [`PoolSettings`],
//!   [`SentinelSettings`]) with the defaults applied during binding
//! - `bind`: the pure [`bind`] function turning a flat `key -> value` mapping
//!   into settings, and [`ConfigError`], the only error this crate raises at
//!   wiring time

pub mod bind;
pub mod model;

pub use bind::{ConfigError, bind, keys};
pub use model::{PoolSettings, RedisSettings, SentinelNode, SentinelSettings};
