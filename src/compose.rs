//! Conditional activation and the composition scope.
//!
//! A caller that already has a [`ConnectionHandle`] keeps it: activation
//! returns the supplied handle untouched and the binder, selector, and
//! builder never run. Only in the absence of a caller-supplied handle is a
//! fresh one configured from the flat mapping.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::client::factory;
use crate::client::handle::{ClientError, ConnectionHandle};
use crate::client::ops::StringOps;
use crate::settings::{ConfigError, bind};

/// Resolve the active connection handle.
///
/// When `existing` is present it is returned unchanged, without evaluating
/// `raw` at all, so a malformed mapping cannot fail a composition that
/// supplies its own handle. Otherwise the mapping is bound, classified, and
/// built into a fresh handle.
///
/// Idempotent: repeated calls with equal inputs yield equivalent handles.
#[instrument(skip_all, fields(supplied = existing.is_some()))]
pub fn activate(
    existing: Option<Arc<ConnectionHandle>>,
    raw: &HashMap<String, String>,
) -> Result<Arc<ConnectionHandle>, ConfigError> {
    if let Some(handle) = existing {
        debug!("caller-supplied connection handle present, skipping auto-configuration");
        return Ok(handle);
    }

    let settings = bind(raw)?;
    Ok(Arc::new(factory::build(settings)))
}

/// A composition scope: the active handle and the facade bound to it.
///
/// One per scope (an application, a test case). Consumers retrieve the handle
/// or the facade from here; [`shutdown`](Composition::shutdown) releases the
/// transport and is safe on every exit path, connected or not.
#[derive(Debug)]
pub struct Composition {
    handle: Arc<ConnectionHandle>,
    ops: StringOps,
}

impl Composition {
    /// Compose from flat configuration alone.
    pub fn from_config(raw: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::activate_with(None, raw)
    }

    /// Compose around a caller-supplied handle.
    pub fn with_handle(handle: Arc<ConnectionHandle>) -> Self {
        let ops = StringOps::new(Arc::clone(&handle));
        Self { handle, ops }
    }

    /// Compose with the full activation rule: a supplied handle wins,
    /// otherwise one is built from `raw`.
    pub fn activate_with(
        existing: Option<Arc<ConnectionHandle>>,
        raw: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let handle = activate(existing, raw)?;
        let ops = StringOps::new(Arc::clone(&handle));
        Ok(Self { handle, ops })
    }

    /// The active connection handle.
    pub fn handle(&self) -> &Arc<ConnectionHandle> {
        &self.handle
    }

    /// The string operations facade bound to the active handle.
    pub fn string_ops(&self) -> &StringOps {
        &self.ops
    }

    /// Release the handle's transport resources. Idempotent.
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        self.handle.close().await
    }
}
