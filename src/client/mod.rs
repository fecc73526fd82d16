//! Client construction and consumption surfaces.
//!
//! ## Architecture
//!
//! - `topology`: classification of bound settings into standalone, pooled, or
//!   sentinel mode
//! - `factory`: pure assembly of a [`ConnectionHandle`] from settings, with
//!   no network I/O at build time
//! - `handle`: the handle itself; introspection without a live connection,
//!   lazy transport creation, idempotent release
//! - `ops`: [`StringOps`], the string-typed facade bound to the active handle

pub mod factory;
pub mod handle;
pub mod ops;
pub mod topology;

pub use factory::{build, build_with};
pub use handle::{ClientError, ConnectionHandle};
pub use ops::StringOps;
pub use topology::Topology;
