// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lazily populated lock table
//!
//! One RwLock per (kind, key); entries are created on first use and live
//! for the process lifetime. The maps themselves are guarded by plain
//! mutexes held only long enough to clone the entry Arc, never across an
//! acquisition.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use parking_lot::RwLock;

use super::keys::{GlobalLockKind, TableKey, TableLockKind};

type LockCell = Arc<RwLock<()>>;

pub struct LockTable {
    table_locks: Mutex<HashMap<(TableLockKind, TableKey), LockCell>>,
    global_locks: Mutex<HashMap<GlobalLockKind, LockCell>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self {
            table_locks: Mutex::new(HashMap::new()),
            global_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn table_cell(&self, kind: TableLockKind, key: TableKey) -> LockCell {
        let mut map = match self.table_locks.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.entry((kind, key)).or_default().clone()
    }

    pub fn global_cell(&self, kind: GlobalLockKind) -> LockCell {
        let mut map = match self.global_locks.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.entry(kind).or_default().clone()
    }
}

impl Default for LockTable {
    fn default() -> Self {
        Self::new()
    }
}
