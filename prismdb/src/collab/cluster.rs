// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cluster tier boundaries

use crate::error::ServerResult;
use crate::results::{ExecuteOptions, QueryOutcome};

/// Aggregator-side client for the leaf tier. Session lifecycle events are
/// forwarded under the same token so a leaf resolves the caller's session.
pub trait LeafAggregator: Send + Sync {
    fn leaf_count(&self) -> usize;

    fn connect(&self, token: &str, user: &str, password: &str, dbname: &str) -> ServerResult<()>;

    fn disconnect(&self, token: &str);

    fn interrupt(&self, token: &str);
}

/// Distributed execution coordinator consulted when this process runs as a
/// cluster aggregator; requests are forwarded verbatim.
pub trait ClusterCoordinator: Send + Sync {
    fn execute(&self, token: &str, sql: &str, options: &ExecuteOptions)
        -> ServerResult<QueryOutcome>;
}
