// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for redis-bootstrap.
//!
//! These tests exercise binding, topology selection, handle construction,
//! and activation in isolation. No server needs to be running: construction
//! performs no network I/O, which is exactly what several of these tests
//! pin down.

// Shared test fixtures (used by unit, integration, and proptest)
#[path = "../common/mod.rs"]
mod common;

mod binder_tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use redis_bootstrap::{ConfigError, bind};

    use crate::common::ConfigBuilder;

    #[test]
    fn test_default_configuration() {
        let settings = bind(&HashMap::new()).unwrap();
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.port, 6379);
        assert_eq!(settings.database, 0);
        assert_eq!(settings.connect_timeout, Duration::from_millis(2000));
    }

    #[test]
    fn test_override_host_and_database() {
        let raw = ConfigBuilder::new().host("foo").database(1).build();
        let settings = bind(&raw).unwrap();
        assert_eq!(settings.host, "foo");
        assert_eq!(settings.database, 1);
    }

    #[test]
    fn test_malformed_port_references_key() {
        let raw = ConfigBuilder::new().set("port", "notanumber").build();
        let err = bind(&raw).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "port"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_nodes_without_master_rejected() {
        let raw = ConfigBuilder::new()
            .set("sentinel.nodes", "127.0.0.1:26379")
            .build();
        let err = bind(&raw).unwrap_err();
        assert!(err.to_string().contains("sentinel.master"));
    }

    #[test]
    fn test_master_without_nodes_rejected() {
        let raw = ConfigBuilder::new().set("sentinel.master", "mymaster").build();
        assert!(bind(&raw).is_err());
    }

    #[test]
    fn test_unrecognized_keys_ignored() {
        let raw = ConfigBuilder::new()
            .host("foo")
            .set("cluster.max-redirects", "3")
            .build();
        let settings = bind(&raw).unwrap();
        assert_eq!(settings.host, "foo");
    }
}

mod topology_tests {
    use std::collections::HashMap;

    use redis_bootstrap::{Topology, bind};

    use crate::common::{ConfigBuilder, sentinel_config};

    #[test]
    fn test_default_is_standalone() {
        let settings = bind(&HashMap::new()).unwrap();
        assert_eq!(Topology::select(&settings), Topology::Standalone);
    }

    #[test]
    fn test_pool_key_selects_pooled() {
        let raw = ConfigBuilder::new().host("foo").pool_max_idle(1).build();
        let settings = bind(&raw).unwrap();
        assert_eq!(Topology::select(&settings), Topology::Pooled);
    }

    #[test]
    fn test_timeout_does_not_affect_topology() {
        let raw = ConfigBuilder::new().host("foo").timeout_ms(100).build();
        let settings = bind(&raw).unwrap();
        assert_eq!(Topology::select(&settings), Topology::Standalone);
    }

    #[test]
    fn test_sentinel_keys_select_sentinel() {
        let settings = bind(&sentinel_config()).unwrap();
        assert_eq!(Topology::select(&settings), Topology::Sentinel);
    }

    // Pinned policy: sentinel configuration wins over pool configuration.
    #[test]
    fn test_sentinel_wins_over_pool() {
        let raw = ConfigBuilder::new()
            .pool_max_active(16)
            .sentinel("mymaster", &["127.0.0.1:26379"])
            .build();
        let settings = bind(&raw).unwrap();
        assert_eq!(Topology::select(&settings), Topology::Sentinel);
    }
}

mod factory_tests {
    use std::time::Duration;

    use redis_bootstrap::{Topology, bind, build};

    use crate::common::{ConfigBuilder, sentinel_config};

    #[test]
    fn test_default_handle() {
        let handle = build(bind(&ConfigBuilder::new().build()).unwrap());
        assert_eq!(handle.host(), "localhost");
        assert_eq!(handle.database(), 0);
        assert_eq!(handle.topology(), Topology::Standalone);
        assert!(!handle.is_sentinel_aware());
    }

    #[test]
    fn test_handle_reflects_overrides() {
        let raw = ConfigBuilder::new().host("foo").database(1).build();
        let handle = build(bind(&raw).unwrap());
        assert_eq!(handle.host(), "foo");
        assert_eq!(handle.database(), 1);
        assert_eq!(handle.topology(), Topology::Standalone);
    }

    #[test]
    fn test_handle_with_pool() {
        let raw = ConfigBuilder::new().host("foo").pool_max_idle(1).build();
        let handle = build(bind(&raw).unwrap());
        assert_eq!(handle.host(), "foo");
        assert_eq!(handle.topology(), Topology::Pooled);
        let pool = handle.pool_config().unwrap();
        assert_eq!(pool.max_idle, 1);
        // Remaining limits stay at their defaults.
        assert_eq!(pool.max_active, 8);
        assert_eq!(pool.min_idle, 0);
    }

    #[test]
    fn test_handle_with_timeout() {
        let raw = ConfigBuilder::new().host("foo").timeout_ms(100).build();
        let handle = build(bind(&raw).unwrap());
        assert_eq!(handle.host(), "foo");
        assert_eq!(handle.timeout(), Duration::from_millis(100));
        assert_eq!(handle.topology(), Topology::Standalone);
    }

    // No sentinel in this test environment is reachable; construction and
    // introspection must work regardless.
    #[test]
    fn test_sentinel_handle_builds_without_network() {
        let handle = build(bind(&sentinel_config()).unwrap());
        assert!(handle.is_sentinel_aware());
        assert_eq!(handle.topology(), Topology::Sentinel);
        assert_eq!(handle.sentinel_master(), Some("mymaster"));
        assert_eq!(handle.sentinel_nodes().len(), 2);
        assert_eq!(handle.sentinel_nodes()[0].to_string(), "127.0.0.1:26379");
        assert!(!handle.is_connected());
    }

    #[tokio::test]
    async fn test_close_is_idempotent_without_connect() {
        let handle = build(bind(&ConfigBuilder::new().build()).unwrap());
        handle.close().await.unwrap();
        handle.close().await.unwrap();
        assert!(!handle.is_connected());
    }
}

mod activation_tests {
    use std::sync::Arc;

    use redis_bootstrap::{Composition, activate, bind, build};

    use crate::common::ConfigBuilder;

    #[test]
    fn test_supplied_handle_returned_unchanged() {
        let supplied = Arc::new(build(bind(&ConfigBuilder::new().host("mine").build()).unwrap()));
        let raw = ConfigBuilder::new().host("ignored").build();

        let active = activate(Some(Arc::clone(&supplied)), &raw).unwrap();
        assert!(Arc::ptr_eq(&active, &supplied));
        assert_eq!(active.host(), "mine");
    }

    // A malformed mapping alongside a supplied handle must succeed: the
    // binder never runs when the caller provided the handle.
    #[test]
    fn test_supplied_handle_skips_binding_entirely() {
        let supplied = Arc::new(build(bind(&ConfigBuilder::new().build()).unwrap()));
        let raw = ConfigBuilder::new().set("port", "notanumber").build();

        assert!(activate(Some(supplied), &raw).is_ok());
        // Without the supplied handle the same mapping fails.
        assert!(activate(None, &raw).is_err());
    }

    #[test]
    fn test_auto_built_when_nothing_supplied() {
        let raw = ConfigBuilder::new().host("foo").build();
        let active = activate(None, &raw).unwrap();
        assert_eq!(active.host(), "foo");
    }

    #[test]
    fn test_composition_exposes_facade_on_active_handle() {
        let composition = Composition::from_config(&ConfigBuilder::new().build()).unwrap();
        assert!(Arc::ptr_eq(
            composition.string_ops().handle(),
            composition.handle()
        ));
    }

    #[tokio::test]
    async fn test_composition_shutdown_safe_on_every_path() {
        let composition = Composition::from_config(&ConfigBuilder::new().build()).unwrap();
        composition.shutdown().await.unwrap();
        composition.shutdown().await.unwrap();
    }
}

mod error_tests {
    use redis_bootstrap::{ConfigError, bind};

    use crate::common::ConfigBuilder;

    #[test]
    fn test_invalid_value_display_names_key_and_value() {
        let raw = ConfigBuilder::new().set("database", "full").build();
        let err = bind(&raw).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("database"));
        assert!(message.contains("full"));
    }

    #[test]
    fn test_invalid_node_display_names_element() {
        let raw = ConfigBuilder::new()
            .sentinel("mymaster", &["127.0.0.1:26379", "127.0.0.1"])
            .build();
        let err = bind(&raw).unwrap_err();
        match err {
            ConfigError::InvalidNode { ref element, .. } => {
                assert_eq!(element, "127.0.0.1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
