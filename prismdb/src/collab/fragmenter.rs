// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Columnar storage / fragmenter boundary
//!
//! The fragmenter owns row placement and the per-table epoch counter that
//! checkpointing advances. Write UpdateDeleteLocks deferred by the lock
//! protocol are taken inside the fragmenter, never here.

use thiserror::Error;

use crate::catalog::{DatabaseId, TableId};
use crate::results::Row;

/// Storage-layer version counter advanced at checkpoint time
pub type Epoch = i32;

#[derive(Error, Debug)]
pub enum FragmenterError {
    #[error("Checkpoint failed: {0}")]
    CheckpointFailed(String),

    #[error("Insert failed: {0}")]
    InsertFailed(String),

    #[error("Unknown table ({0}, {1})")]
    UnknownTable(DatabaseId, TableId),
}

pub trait Fragmenter: Send + Sync {
    fn checkpoint(&self, db_id: DatabaseId, table_id: TableId) -> Result<(), FragmenterError>;

    fn insert_rows(
        &self,
        db_id: DatabaseId,
        table_id: TableId,
        rows: Vec<Row>,
    ) -> Result<(), FragmenterError>;

    fn epoch(&self, db_id: DatabaseId, table_id: TableId) -> Result<Epoch, FragmenterError>;

    fn set_epoch(
        &self,
        db_id: DatabaseId,
        table_id: TableId,
        epoch: Epoch,
    ) -> Result<(), FragmenterError>;
}
