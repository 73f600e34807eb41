// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog trait seams

use std::sync::Arc;

use super::error::CatalogResult;
use super::models::{
    AccessPrivileges, ColumnRecord, DatabaseId, DatabaseRecord, TableRecord, UserRecord,
};

/// System-wide catalog: users, databases, and access checks
pub trait SystemCatalog: Send + Sync {
    fn user(&self, name: &str) -> Option<UserRecord>;

    /// Verify a password for an existing user
    fn check_password(&self, user: &str, password: &str) -> bool;

    fn database(&self, name: &str) -> Option<DatabaseRecord>;

    /// Check whether `user` holds `privileges` on `database`
    fn check_database_access(
        &self,
        user: &UserRecord,
        database: &DatabaseRecord,
        privileges: AccessPrivileges,
    ) -> bool;

    /// Open (or hand back) the per-database catalog for `database`. The
    /// session registry caches the returned handle per database name.
    fn open_database(&self, database: &DatabaseRecord) -> CatalogResult<Arc<dyn DatabaseCatalog>>;
}

/// Per-database catalog: table and column metadata plus the DDL mutations
/// the legacy path performs
pub trait DatabaseCatalog: Send + Sync {
    fn db_id(&self) -> DatabaseId;

    fn name(&self) -> &str;

    fn table(&self, name: &str) -> Option<TableRecord>;

    fn columns(&self, table: &str) -> CatalogResult<Vec<ColumnRecord>>;

    fn create_table(&self, name: &str, columns: Vec<ColumnRecord>) -> CatalogResult<TableRecord>;

    fn drop_table(&self, name: &str) -> CatalogResult<()>;

    fn truncate_table(&self, name: &str) -> CatalogResult<()>;

    /// Execute a DDL statement this crate does not shape (CREATE, ALTER,
    /// GRANT, ...). Returns a completion message.
    fn run_ddl(&self, sql: &str) -> CatalogResult<String>;
}
