// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-request phase trace

use uuid::Uuid;

/// Phases of one request's life. Any phase can transition straight to
/// `Returned` on failure; batches repeat the lock/execute pair per
/// statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Received,
    Classified,
    RoutedCluster,
    RoutedMeta,
    RoutedPlanner,
    RoutedLegacy,
    Locked,
    Executed,
    DeferredImport,
    Returned,
}

/// Request id plus the phases it passed through, logged at debug level
pub struct RequestTrace {
    id: Uuid,
    phases: Vec<RequestPhase>,
}

impl RequestTrace {
    pub fn new() -> Self {
        let mut trace = Self {
            id: Uuid::new_v4(),
            phases: Vec::new(),
        };
        trace.advance(RequestPhase::Received);
        trace
    }

    pub fn advance(&mut self, phase: RequestPhase) {
        log::debug!("request {}: {:?}", self.id, phase);
        self.phases.push(phase);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phases(&self) -> &[RequestPhase] {
        &self.phases
    }
}

impl Default for RequestTrace {
    fn default() -> Self {
        Self::new()
    }
}
