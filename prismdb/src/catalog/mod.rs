// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog boundary
//!
//! Catalog and privilege storage live outside this crate; these traits are
//! the seam the admission layer consumes:
//! - `SystemCatalog`: users, passwords, databases, access checks
//! - `DatabaseCatalog`: per-database table and column metadata plus the
//!   DDL mutations the legacy path performs
//!
//! `MemoryCatalog` is an in-memory reference implementation used by tests
//! and benchmarks.

pub mod error;
pub mod memory;
pub mod models;
pub mod traits;

pub use error::{CatalogError, CatalogResult};
pub use memory::{MemoryCatalog, MemoryDatabase};
pub use models::{
    AccessPrivileges, ColumnRecord, DatabaseId, DatabaseRecord, TableId, TableRecord, UserRecord,
};
pub use traits::{DatabaseCatalog, SystemCatalog};
