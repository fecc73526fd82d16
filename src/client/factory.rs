//! Connection handle construction.
//!
//! Building assembles the transport configuration in memory and nothing else:
//! no connection is opened, no node is probed. A handle built from settings
//! that passed binding is always fully introspectable, even when no server or
//! sentinel is reachable. The first network activity happens when a consumer
//! forces the transport (see [`ConnectionHandle::connect`]).

use fred::prelude::*;
use tracing::{instrument, warn};

use crate::client::handle::ConnectionHandle;
use crate::client::topology::Topology;
use crate::settings::RedisSettings;

/// Build a connection handle, classifying the topology from the settings.
///
/// Total over any settings produced by [`bind`](crate::settings::bind): this
/// never fails and performs no I/O.
pub fn build(settings: RedisSettings) -> ConnectionHandle {
    let topology = Topology::select(&settings);
    build_with(settings, topology)
}

/// Build a connection handle for an explicitly chosen topology.
#[instrument(skip(settings), fields(host = %settings.host, port = settings.port, %topology))]
pub fn build_with(settings: RedisSettings, topology: Topology) -> ConnectionHandle {
    let config = client_config(&settings, topology);
    let pool_size = pool_size(&settings);
    ConnectionHandle::new(settings, topology, config, pool_size)
}

/// Assemble the fred client configuration for the given settings and
/// topology.
pub(crate) fn client_config(settings: &RedisSettings, topology: Topology) -> Config {
    let server = match settings.sentinel.as_ref() {
        Some(sentinel) if topology == Topology::Sentinel => {
            let hosts: Vec<(String, u16)> = sentinel
                .nodes
                .iter()
                .map(|node| (node.host.clone(), node.port))
                .collect();
            ServerConfig::new_sentinel(hosts, sentinel.master_name.clone())
        }
        _ => ServerConfig::Centralized {
            server: Server::new(settings.host.clone(), settings.port),
        },
    };

    Config {
        server,
        database: Some(settings.database),
        password: settings.password.clone(),
        ..Default::default()
    }
}

/// Number of pooled connections to create, if pooling was requested.
pub(crate) fn pool_size(settings: &RedisSettings) -> Option<usize> {
    settings.pool.as_ref().map(|pool| {
        if pool.max_active == 0 {
            warn!("pool.max-active is 0, using a single pooled connection");
            1
        } else {
            pool.max_active as usize
        }
    })
}
