// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-category lock sequences
//!
//! The protocol table, never reordered:
//!
//! | category        | sequence                                                              |
//! |-----------------|-----------------------------------------------------------------------|
//! | SELECT / COPY-TO| ExecutorOuter(read) → UpdateDelete(read) per table                    |
//! | INSERT…SELECT   | Checkpoint(write) → UpdateDelete(read) [→ UpdateDelete(write) deferred]|
//! | INSERT VALUES   | Checkpoint(write) → ExecutorOuter(write) [→ UpdateDelete(write) deferred]|
//! | COPY FROM       | Checkpoint(write) [→ UpdateDelete(write) deferred]                    |
//! | DROP / TRUNCATE | Checkpoint(write) → UpdateDelete(write)                               |
//! | UPDATE / DELETE | Checkpoint(write) → UpdateDelete(write)                               |
//!
//! Planner-resolved statements follow the same invariant with the table set
//! the planner bound (correct across views): Checkpoint(write) per written
//! table, then ExecutorOuter(read), then UpdateDelete per table, write for
//! written tables and read otherwise. Deferred entries are taken inside the
//! fragmenter, never here.
//!
//! Multi-table sets are walked in key order so two statements can never
//! take the same pair of locks in opposite sequences. A failed acquisition
//! drops every handle already taken before the error propagates.

use std::collections::{BTreeMap, BTreeSet};

use super::coordinator::{GlobalLockHandle, LockCoordinator, TableLockHandle};
use super::keys::{GlobalLockKind, LockMode, TableKey, TableLockKind};
use crate::error::ServerResult;

/// Lock category of one legacy-path statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementCategory {
    Select,
    InsertSelect,
    InsertValues,
    CopyFrom,
    DropOrTruncate,
    UpdateDelete,
}

/// The full lock set of one request, released together when dropped
pub struct StatementLocks {
    globals: Vec<GlobalLockHandle>,
    tables: Vec<TableLockHandle>,
    trace: Vec<String>,
}

impl StatementLocks {
    fn empty() -> Self {
        Self {
            globals: Vec::new(),
            tables: Vec::new(),
            trace: Vec::new(),
        }
    }

    fn push_table(
        &mut self,
        coordinator: &LockCoordinator,
        key: TableKey,
        kind: TableLockKind,
        mode: LockMode,
    ) -> ServerResult<()> {
        let handle = coordinator.acquire_table(key, kind, mode)?;
        self.trace.push(format!("{} {} {}", mode, kind, key));
        self.tables.push(handle);
        Ok(())
    }

    fn push_global(
        &mut self,
        coordinator: &LockCoordinator,
        kind: GlobalLockKind,
        mode: LockMode,
    ) -> ServerResult<()> {
        let handle = coordinator.acquire_global(kind, mode)?;
        self.trace.push(format!("{} {}", mode, kind));
        self.globals.push(handle);
        Ok(())
    }

    /// Lock sequence for a planner-resolved statement. `tables` maps each
    /// resolved key to whether the statement writes it.
    pub fn for_planner_tables(
        coordinator: &LockCoordinator,
        tables: &BTreeMap<TableKey, bool>,
    ) -> ServerResult<Self> {
        let mut locks = Self::empty();
        for (key, written) in tables {
            if *written {
                locks.push_table(coordinator, *key, TableLockKind::Checkpoint, LockMode::Exclusive)?;
            }
        }
        locks.push_global(coordinator, GlobalLockKind::ExecutorOuter, LockMode::Shared)?;
        for (key, written) in tables {
            let mode = if *written {
                LockMode::Exclusive
            } else {
                LockMode::Shared
            };
            locks.push_table(coordinator, *key, TableLockKind::UpdateDelete, mode)?;
        }
        Ok(locks)
    }

    /// Lock sequence for one legacy-path statement. `target` is the written
    /// table (absent for pure reads and for COPY FROM into a table that does
    /// not exist yet); `read_tables` is the resolved read set.
    pub fn for_legacy(
        coordinator: &LockCoordinator,
        category: StatementCategory,
        target: Option<TableKey>,
        read_tables: &BTreeSet<TableKey>,
    ) -> ServerResult<Self> {
        let mut locks = Self::empty();
        match category {
            StatementCategory::Select => {
                locks.push_global(coordinator, GlobalLockKind::ExecutorOuter, LockMode::Shared)?;
                for key in read_tables {
                    locks.push_table(
                        coordinator,
                        *key,
                        TableLockKind::UpdateDelete,
                        LockMode::Shared,
                    )?;
                }
            }
            StatementCategory::InsertSelect => {
                if let Some(target) = target {
                    locks.push_table(
                        coordinator,
                        target,
                        TableLockKind::Checkpoint,
                        LockMode::Exclusive,
                    )?;
                }
                for key in read_tables {
                    locks.push_table(
                        coordinator,
                        *key,
                        TableLockKind::UpdateDelete,
                        LockMode::Shared,
                    )?;
                }
            }
            StatementCategory::InsertValues => {
                if let Some(target) = target {
                    locks.push_table(
                        coordinator,
                        target,
                        TableLockKind::Checkpoint,
                        LockMode::Exclusive,
                    )?;
                }
                locks.push_global(
                    coordinator,
                    GlobalLockKind::ExecutorOuter,
                    LockMode::Exclusive,
                )?;
            }
            StatementCategory::CopyFrom => {
                if let Some(target) = target {
                    locks.push_table(
                        coordinator,
                        target,
                        TableLockKind::Checkpoint,
                        LockMode::Exclusive,
                    )?;
                }
            }
            StatementCategory::DropOrTruncate | StatementCategory::UpdateDelete => {
                if let Some(target) = target {
                    locks.push_table(
                        coordinator,
                        target,
                        TableLockKind::Checkpoint,
                        LockMode::Exclusive,
                    )?;
                    locks.push_table(
                        coordinator,
                        target,
                        TableLockKind::UpdateDelete,
                        LockMode::Exclusive,
                    )?;
                }
            }
        }
        Ok(locks)
    }

    /// Human-readable acquisitions in the order they happened
    pub fn acquisition_trace(&self) -> &[String] {
        &self.trace
    }

    pub fn lock_count(&self) -> usize {
        self.globals.len() + self.tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> LockCoordinator {
        LockCoordinator::new(None)
    }

    #[test]
    fn update_takes_checkpoint_before_update_delete() {
        let coordinator = coordinator();
        let target = TableKey::new(1, 7);
        let locks = StatementLocks::for_legacy(
            &coordinator,
            StatementCategory::UpdateDelete,
            Some(target),
            &BTreeSet::new(),
        )
        .unwrap();
        let trace = locks.acquisition_trace();
        assert_eq!(trace.len(), 2);
        assert!(trace[0].contains("CheckpointLock"));
        assert!(trace[1].contains("UpdateDeleteLock"));
    }

    #[test]
    fn planner_sequence_orders_checkpoint_outer_upddel() {
        let coordinator = coordinator();
        let mut tables = BTreeMap::new();
        tables.insert(TableKey::new(1, 1), true);
        tables.insert(TableKey::new(1, 2), false);
        let locks = StatementLocks::for_planner_tables(&coordinator, &tables).unwrap();
        let trace = locks.acquisition_trace();
        assert_eq!(
            trace,
            &[
                "write CheckpointLock (1, 1)".to_string(),
                "read ExecutorOuterLock".to_string(),
                "write UpdateDeleteLock (1, 1)".to_string(),
                "read UpdateDeleteLock (1, 2)".to_string(),
            ]
        );
    }

    #[test]
    fn pure_reads_take_no_exclusive_lock() {
        let coordinator = coordinator();
        let mut reads = BTreeSet::new();
        reads.insert(TableKey::new(1, 1));
        let first = StatementLocks::for_legacy(
            &coordinator,
            StatementCategory::Select,
            None,
            &reads,
        )
        .unwrap();
        // a second concurrent reader gets through while the first holds
        let second = StatementLocks::for_legacy(
            &coordinator,
            StatementCategory::Select,
            None,
            &reads,
        )
        .unwrap();
        assert_eq!(first.lock_count(), 2);
        assert_eq!(second.lock_count(), 2);
    }

    #[test]
    fn multi_table_sets_are_walked_in_key_order() {
        let coordinator = coordinator();
        let mut tables = BTreeMap::new();
        tables.insert(TableKey::new(2, 9), false);
        tables.insert(TableKey::new(1, 4), false);
        let locks = StatementLocks::for_planner_tables(&coordinator, &tables).unwrap();
        let trace = locks.acquisition_trace();
        assert!(trace[1].contains("(1, 4)"));
        assert!(trace[2].contains("(2, 9)"));
    }
}
