//! Connection topology classification.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::settings::RedisSettings;

/// How the client reaches the deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    /// A single directly-addressed node.
    Standalone,
    /// A single node behind a connection pool.
    Pooled,
    /// A sentinel-monitored deployment; the master is discovered at connect
    /// time through the configured sentinel nodes.
    Sentinel,
}

impl Topology {
    /// Classify bound settings into exactly one topology. Total: every valid
    /// settings value maps to a topology.
    ///
    /// Sentinel configuration wins over pool configuration. A sentinel-aware
    /// client may still pool connections internally, but the classification
    /// reported to callers is `Sentinel`.
    pub fn select(settings: &RedisSettings) -> Topology {
        let topology = if settings
            .sentinel
            .as_ref()
            .is_some_and(|sentinel| !sentinel.nodes.is_empty())
        {
            Topology::Sentinel
        } else if settings.pool.is_some() {
            Topology::Pooled
        } else {
            Topology::Standalone
        };
        debug!(%topology, "selected connection topology");
        topology
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Standalone => write!(f, "Standalone"),
            Topology::Pooled => write!(f, "Pooled"),
            Topology::Sentinel => write!(f, "Sentinel"),
        }
    }
}
