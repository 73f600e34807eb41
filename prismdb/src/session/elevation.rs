// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Planner elevation grants
//!
//! A grant is a one-shot, short-lived capability minted by the session
//! registry and carried inside the planner request. Redeeming it resolves
//! the granting session with transient superuser rights; redemption
//! consumes it. Grants are unforgeable values: nothing in the system
//! derives elevation from the shape of a session token.

use std::time::Instant;

const GRANT_ID_LEN: usize = 64;

/// Capability handed to the planner for trusted re-entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationGrant {
    pub(crate) grant_id: String,
}

impl ElevationGrant {
    pub fn id(&self) -> &str {
        &self.grant_id
    }
}

/// Registry-side record of an outstanding grant
pub(crate) struct PendingGrant {
    pub token: String,
    pub issued_at: Instant,
}

pub(crate) fn generate_grant_id() -> String {
    (0..GRANT_ID_LEN)
        .map(|_| fastrand::alphanumeric())
        .collect()
}
