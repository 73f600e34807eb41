// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Bulk-load importer boundary
//!
//! File parsing lives outside this crate. The importer reports per-row
//! rejects rather than failing the load; a geo load whose target table does
//! not exist yet returns a [`DeferredImport`] so the router can run the
//! file import after the table-creation half succeeds.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::catalog::{DatabaseCatalog, TableRecord};

/// Import options captured from the COPY statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportParams {
    pub format: Option<String>,
    pub options: HashMap<String, String>,
}

/// Per-load outcome; rejected rows are logged and skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub rows_completed: u64,
    pub rows_rejected: u64,
}

/// Follow-up work captured by a geo bulk load: the file import to run once
/// the DDL half has created the target table. Consuming the value is the
/// only way to run it, so it can never run twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredImport {
    pub table: String,
    pub source: String,
    pub params: ImportParams,
}

/// Result of the synchronous half of a COPY FROM
#[derive(Debug, Clone, Default)]
pub struct CopyOutcome {
    pub message: String,
    pub report: ImportReport,
    pub deferred: Option<DeferredImport>,
}

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("{0}")]
    Failed(String),
}

pub trait Importer: Send + Sync {
    /// Run `COPY <table> FROM <source>`. `table` is `None` when the target
    /// does not exist yet (geo loads create it via the deferred half).
    fn copy_from(
        &self,
        catalog: &Arc<dyn DatabaseCatalog>,
        table: Option<&TableRecord>,
        table_name: &str,
        source: &str,
    ) -> Result<CopyOutcome, ImporterError>;

    /// Run the deferred half of a geo load: create the table, then import
    fn import_geo_table(
        &self,
        catalog: &Arc<dyn DatabaseCatalog>,
        deferred: &DeferredImport,
    ) -> Result<ImportReport, ImporterError>;
}
