// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lock keys and kinds

use std::fmt;

use crate::catalog::{DatabaseId, TableId, TableRecord};

/// Per-table lock key. Ordered so multi-table acquisition can sort keys and
/// always take them in the same sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableKey {
    pub db_id: DatabaseId,
    pub table_id: TableId,
}

impl TableKey {
    pub fn new(db_id: DatabaseId, table_id: TableId) -> Self {
        Self { db_id, table_id }
    }
}

impl From<&TableRecord> for TableKey {
    fn from(record: &TableRecord) -> Self {
        Self {
            db_id: record.db_id,
            table_id: record.table_id,
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.db_id, self.table_id)
    }
}

/// Per-table lock kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableLockKind {
    /// Guards schema/epoch-affecting mutation of a table
    Checkpoint,
    /// Guards row-level mutation against concurrent scans
    UpdateDelete,
}

impl fmt::Display for TableLockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableLockKind::Checkpoint => write!(f, "CheckpointLock"),
            TableLockKind::UpdateDelete => write!(f, "UpdateDeleteLock"),
        }
    }
}

/// Global lock kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalLockKind {
    /// Process-wide gate between concurrent reads and exclusive inserts
    ExecutorOuter,
}

impl fmt::Display for GlobalLockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalLockKind::ExecutorOuter => write!(f, "ExecutorOuterLock"),
        }
    }
}

/// Shared (read) or exclusive (write) acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Shared => write!(f, "read"),
            LockMode::Exclusive => write!(f, "write"),
        }
    }
}
