// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! PrismDB - query admission and concurrency control for an analytical SQL server
//!
//! PrismDB accepts SQL text over an internal call boundary, classifies the
//! statement, binds it to a session, acquires an ordered set of table-scoped
//! locks matching the statement's read/write profile, and dispatches
//! execution locally or to a remote cluster tier.
//!
//! # Features
//!
//! - **Lexical classification**: DDL / DML / EXPLAIN wraps / meta commands,
//!   decided without parsing a grammar
//! - **Session registry**: token-based sessions with reader/writer
//!   discipline and one-shot planner elevation grants
//! - **Ordered locking**: CheckpointLock → ExecutorOuterLock →
//!   UpdateDeleteLock, never reversed, over planner-resolved table sets
//! - **Routing**: cluster forwarding, catalog-backed meta commands, planner
//!   and legacy execution paths, deferred geo-import follow-up work
//! - **Zero-copy exports**: data frame handles bookkept until explicit
//!   release
//!
//! The planner, execution kernel, columnar fragmenter, importer, renderer,
//! and catalog storage are external collaborators behind traits in
//! [`collab`] and [`catalog`].
//!
//! # Usage
//!
//! ```no_run
//! use prismdb::{Collaborators, QueryRouter, ServerConfig};
//! use prismdb::results::ExecuteOptions;
//! # fn collaborators() -> Collaborators { unimplemented!() }
//!
//! let router = QueryRouter::new(ServerConfig::default(), collaborators());
//! let token = router.connect("alice", "secret", "analytics")?;
//! let outcome = router.execute(&token, "SELECT * FROM trips", &ExecuteOptions::default())?;
//! router.disconnect(&token)?;
//! # Ok::<(), prismdb::ServerError>(())
//! ```

pub mod catalog;
pub mod collab;
pub mod config;
pub mod error;
pub mod handles;
pub mod locks;
pub mod results;
pub mod router;
pub mod session;
pub mod sql;

// The router is the entry point; the rest of the public surface exists for
// the wire layer that embeds this crate.
pub use config::{ClusterRole, DeviceMode, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use results::{DataFrame, ExecuteOptions, QueryOutcome, RowSet, Value};
pub use router::{Collaborators, QueryRouter};

/// PrismDB version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// PrismDB crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
