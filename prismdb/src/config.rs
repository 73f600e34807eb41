// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Server configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Execution device placement for a session or a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceMode {
    Cpu,
    Gpu,
    Hybrid,
}

/// Role of this process in a cluster deployment
///
/// An aggregator fans requests out to leaf nodes holding data shards; a leaf
/// executes against its local shard; standalone servers do both locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterRole {
    Standalone,
    Aggregator,
    Leaf,
}

/// Global server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Default executor device mode for new sessions
    pub device_mode: DeviceMode,

    /// Set when the server started without any usable GPU; sessions may not
    /// switch to GPU mode on such a server
    pub cpu_mode_only: bool,

    /// Cluster role of this process
    pub cluster_role: ClusterRole,

    /// Reject non-SELECT statements on the legacy path
    pub read_only: bool,

    /// Route planner requests through the legacy-syntax shim
    pub legacy_syntax: bool,

    /// Enable dynamic interrupt checking; `interrupt` is a no-op otherwise
    pub enable_dynamic_watchdog: bool,

    /// Upper bound on any single lock acquisition. `None` blocks forever;
    /// a timeout surfaces as a lock conflict, never a silent retry.
    pub lock_timeout: Option<Duration>,

    /// Idle time after which a session is eligible for cleanup
    pub session_idle_timeout: Duration,

    /// Lifetime of a planner elevation grant
    pub elevation_grant_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            device_mode: DeviceMode::Cpu,
            cpu_mode_only: false,
            cluster_role: ClusterRole::Standalone,
            read_only: false,
            legacy_syntax: false,
            enable_dynamic_watchdog: false,
            lock_timeout: None,
            session_idle_timeout: Duration::from_secs(3600),
            elevation_grant_ttl: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Parse a configuration from its JSON representation
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
