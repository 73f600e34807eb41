// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query routing and dispatch
//!
//! The router is the single entry point for SQL execution. Per request it:
//! - resolves the session
//! - forwards verbatim when this process is a cluster aggregator
//! - classifies the statement and routes it: meta commands answered from
//!   catalog metadata, planner-eligible statements through the planner,
//!   everything else through the legacy statement path
//! - acquires the lock sequence matching the statement category over the
//!   planner-resolved table set before any data is touched
//! - runs deferred import work captured by geo bulk loads, exactly once

pub mod phase;
pub mod query_router;

pub use phase::{RequestPhase, RequestTrace};
pub use query_router::{Collaborators, QueryRouter};
