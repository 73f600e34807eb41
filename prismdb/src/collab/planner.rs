// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Planner service boundary
//!
//! The planner is an external relational-algebra service. It receives the
//! statement text plus an elevation grant minted by the session registry;
//! the grant lets the planner re-enter on behalf of the caller (catalog
//! probes, completion hints) with transient superuser rights, without any
//! token-prefix back-channel.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::session::ElevationGrant;

/// One planner invocation
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub session_token: String,
    pub elevation: ElevationGrant,
    pub sql: String,
    pub legacy_syntax: bool,
    pub explain: bool,
}

/// Table sets the planner resolved while binding the statement. Views are
/// already expanded; locks must cover exactly these names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessedTables {
    pub selected_from: Vec<String>,
    pub inserted_into: Vec<String>,
    pub updated_in: Vec<String>,
    pub deleted_from: Vec<String>,
}

impl AccessedTables {
    /// Collapse into name → written-to, ordered by name so lock acquisition
    /// is deterministic. A table both read and written counts as written.
    pub fn read_write_map(&self) -> BTreeMap<String, bool> {
        let mut map = BTreeMap::new();
        for table in &self.selected_from {
            map.entry(table.clone()).or_insert(false);
        }
        for table in self
            .inserted_into
            .iter()
            .chain(&self.updated_in)
            .chain(&self.deleted_from)
        {
            map.insert(table.clone(), true);
        }
        map
    }
}

/// Plan plus resolved table sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutcome {
    /// Opaque serialized plan, handed to the execution engine verbatim
    pub plan: String,
    pub accessed: AccessedTables,
}

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("{0}")]
    Rejected(String),

    #[error("Planner unavailable: {0}")]
    Unavailable(String),
}

pub trait Planner: Send + Sync {
    fn process(&self, request: PlanRequest) -> Result<PlanOutcome, PlannerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_tables_override_read_entries() {
        let accessed = AccessedTables {
            selected_from: vec!["t".to_string(), "s".to_string()],
            inserted_into: vec![],
            updated_in: vec!["t".to_string()],
            deleted_from: vec![],
        };
        let map = accessed.read_write_map();
        assert_eq!(map.get("t"), Some(&true));
        assert_eq!(map.get("s"), Some(&false));
    }
}
