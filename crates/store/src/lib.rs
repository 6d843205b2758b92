//! Persistence access layer for projects, mechanics and relationships.
//!
//! [`StoreClient`] is the entry point: it is constructed explicitly around a
//! [`GraphStore`] backend and carries the caller's [`Session`], a per-call
//! timeout, a cancellation token and an optional diagnostic hook. Every
//! operation performs one backend request and returns either the typed
//! payload or a [`StoreError`].
//!
//! Backends:
//! - [`PgGraphStore`] -- Postgres through the `mechgraph-db` repositories.
//! - [`MemoryGraphStore`] -- in-process tables with the same visibility,
//!   ordering and atomicity rules.

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod memory;
pub mod postgres;
pub mod session;

pub use backend::GraphStore;
pub use client::{ErrorHook, StoreClient};
pub use config::StoreConfig;
pub use error::{BackendError, ErrorKind, StoreError, StoreResult};
pub use graph::ProjectGraph;
pub use memory::MemoryGraphStore;
pub use postgres::PgGraphStore;
pub use session::Session;
