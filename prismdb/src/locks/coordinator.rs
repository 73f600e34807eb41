// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lock acquisition
//!
//! Handles are owned guards bound to the request scope. An optional
//! timeout turns unbounded blocking into a surfaced lock conflict; a
//! conflict is never retried here.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::lock_api::{ArcRwLockReadGuard, ArcRwLockWriteGuard};
use parking_lot::{RawRwLock, RwLock};

use super::keys::{GlobalLockKind, LockMode, TableKey, TableLockKind};
use super::table::LockTable;
use crate::error::{ServerError, ServerResult};

type OwnedReadGuard = ArcRwLockReadGuard<RawRwLock, ()>;
type OwnedWriteGuard = ArcRwLockWriteGuard<RawRwLock, ()>;

enum Guard {
    Read(OwnedReadGuard),
    Write(OwnedWriteGuard),
}

/// Scope-bound handle on one per-table lock
pub struct TableLockHandle {
    pub key: TableKey,
    pub kind: TableLockKind,
    pub mode: LockMode,
    _guard: Guard,
}

/// Scope-bound handle on one global lock
pub struct GlobalLockHandle {
    pub kind: GlobalLockKind,
    pub mode: LockMode,
    _guard: Guard,
}

pub struct LockCoordinator {
    table: LockTable,
    timeout: Option<Duration>,
}

impl LockCoordinator {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            table: LockTable::new(),
            timeout,
        }
    }

    fn grab<F>(&self, cell: Arc<RwLock<()>>, mode: LockMode, describe: F) -> ServerResult<Guard>
    where
        F: Fn() -> String,
    {
        match (mode, self.timeout) {
            (LockMode::Shared, None) => Ok(Guard::Read(cell.read_arc())),
            (LockMode::Exclusive, None) => Ok(Guard::Write(cell.write_arc())),
            (LockMode::Shared, Some(timeout)) => cell
                .try_read_arc_for(timeout)
                .map(Guard::Read)
                .ok_or_else(|| ServerError::LockConflict(describe())),
            (LockMode::Exclusive, Some(timeout)) => cell
                .try_write_arc_for(timeout)
                .map(Guard::Write)
                .ok_or_else(|| ServerError::LockConflict(describe())),
        }
    }

    /// Acquire one per-table lock, blocking until granted or the configured
    /// timeout elapses
    pub fn acquire_table(
        &self,
        key: TableKey,
        kind: TableLockKind,
        mode: LockMode,
    ) -> ServerResult<TableLockHandle> {
        let cell = self.table.table_cell(kind, key);
        let guard = self.grab(cell, mode, || format!("{} {} on table {}", mode, kind, key))?;
        log::debug!("acquired {} {} on table {}", mode, kind, key);
        Ok(TableLockHandle {
            key,
            kind,
            mode,
            _guard: guard,
        })
    }

    /// Acquire one global lock
    pub fn acquire_global(
        &self,
        kind: GlobalLockKind,
        mode: LockMode,
    ) -> ServerResult<GlobalLockHandle> {
        let cell = self.table.global_cell(kind);
        let guard = self.grab(cell, mode, || format!("{} {}", mode, kind))?;
        log::debug!("acquired {} {}", mode, kind);
        Ok(GlobalLockHandle {
            kind,
            mode,
            _guard: guard,
        })
    }
}
