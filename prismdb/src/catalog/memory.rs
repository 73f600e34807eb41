// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory catalog backend
//!
//! Reference implementation of the catalog traits, used by tests and
//! benchmarks. Passwords are stored in the clear; production deployments
//! plug in a real catalog service behind the same traits.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, RwLock};

use super::error::{CatalogError, CatalogResult};
use super::models::{
    AccessPrivileges, ColumnRecord, DatabaseId, DatabaseRecord, TableId, TableRecord, UserRecord,
};
use super::traits::{DatabaseCatalog, SystemCatalog};

/// In-memory system catalog
pub struct MemoryCatalog {
    users: RwLock<HashMap<String, (UserRecord, String)>>,
    databases: RwLock<HashMap<String, DatabaseRecord>>,
    grants: RwLock<HashSet<(String, DatabaseId)>>,
    handles: RwLock<HashMap<String, Arc<MemoryDatabase>>>,
    next_user_id: AtomicI32,
    next_db_id: AtomicI32,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            databases: RwLock::new(HashMap::new()),
            grants: RwLock::new(HashSet::new()),
            handles: RwLock::new(HashMap::new()),
            next_user_id: AtomicI32::new(1),
            next_db_id: AtomicI32::new(1),
        }
    }

    pub fn add_user(&self, name: &str, password: &str, is_super: bool) -> UserRecord {
        let record = UserRecord {
            user_id: self.next_user_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
            is_super,
        };
        if let Ok(mut users) = self.users.write() {
            users.insert(name.to_string(), (record.clone(), password.to_string()));
        }
        record
    }

    pub fn add_database(&self, name: &str, owner: &str) -> DatabaseRecord {
        let record = DatabaseRecord {
            db_id: self.next_db_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
            owner: owner.to_string(),
        };
        if let Ok(mut databases) = self.databases.write() {
            databases.insert(name.to_string(), record.clone());
        }
        record
    }

    pub fn grant_access(&self, user: &str, db_id: DatabaseId) {
        if let Ok(mut grants) = self.grants.write() {
            grants.insert((user.to_string(), db_id));
        }
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCatalog for MemoryCatalog {
    fn user(&self, name: &str) -> Option<UserRecord> {
        let users = self.users.read().ok()?;
        users.get(name).map(|(record, _)| record.clone())
    }

    fn check_password(&self, user: &str, password: &str) -> bool {
        self.users
            .read()
            .map(|users| {
                users
                    .get(user)
                    .is_some_and(|(_, stored)| stored == password)
            })
            .unwrap_or(false)
    }

    fn database(&self, name: &str) -> Option<DatabaseRecord> {
        let databases = self.databases.read().ok()?;
        databases.get(name).cloned()
    }

    fn check_database_access(
        &self,
        user: &UserRecord,
        database: &DatabaseRecord,
        _privileges: AccessPrivileges,
    ) -> bool {
        if user.is_super || database.owner == user.name {
            return true;
        }
        self.grants
            .read()
            .map(|grants| grants.contains(&(user.name.clone(), database.db_id)))
            .unwrap_or(false)
    }

    fn open_database(&self, database: &DatabaseRecord) -> CatalogResult<Arc<dyn DatabaseCatalog>> {
        let mut handles = self
            .handles
            .write()
            .map_err(|_| CatalogError::Unavailable("catalog handle map poisoned".to_string()))?;
        let handle = handles
            .entry(database.name.clone())
            .or_insert_with(|| Arc::new(MemoryDatabase::new(database.db_id, &database.name)))
            .clone();
        Ok(handle)
    }
}

/// In-memory per-database catalog
pub struct MemoryDatabase {
    db_id: DatabaseId,
    name: String,
    tables: RwLock<HashMap<String, (TableRecord, Vec<ColumnRecord>)>>,
    next_table_id: AtomicI32,
}

impl MemoryDatabase {
    pub fn new(db_id: DatabaseId, name: &str) -> Self {
        Self {
            db_id,
            name: name.to_string(),
            tables: RwLock::new(HashMap::new()),
            next_table_id: AtomicI32::new(1),
        }
    }

    pub fn add_table(&self, name: &str, columns: Vec<ColumnRecord>) -> TableRecord {
        self.insert_table(name, columns, false)
    }

    pub fn add_view(&self, name: &str, columns: Vec<ColumnRecord>) -> TableRecord {
        self.insert_table(name, columns, true)
    }

    fn insert_table(&self, name: &str, columns: Vec<ColumnRecord>, is_view: bool) -> TableRecord {
        let record = TableRecord {
            table_id: self.next_table_id.fetch_add(1, Ordering::SeqCst) as TableId,
            db_id: self.db_id,
            name: name.to_string(),
            is_view,
        };
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(name.to_string(), (record.clone(), columns));
        }
        record
    }
}

impl DatabaseCatalog for MemoryDatabase {
    fn db_id(&self) -> DatabaseId {
        self.db_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn table(&self, name: &str) -> Option<TableRecord> {
        let tables = self.tables.read().ok()?;
        tables.get(name).map(|(record, _)| record.clone())
    }

    fn columns(&self, table: &str) -> CatalogResult<Vec<ColumnRecord>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| CatalogError::Unavailable("table map poisoned".to_string()))?;
        tables
            .get(table)
            .map(|(_, columns)| columns.clone())
            .ok_or_else(|| CatalogError::TableNotFound(table.to_string()))
    }

    fn create_table(&self, name: &str, columns: Vec<ColumnRecord>) -> CatalogResult<TableRecord> {
        {
            let tables = self
                .tables
                .read()
                .map_err(|_| CatalogError::Unavailable("table map poisoned".to_string()))?;
            if tables.contains_key(name) {
                return Err(CatalogError::TableAlreadyExists(name.to_string()));
            }
        }
        Ok(self.insert_table(name, columns, false))
    }

    fn drop_table(&self, name: &str) -> CatalogResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| CatalogError::Unavailable("table map poisoned".to_string()))?;
        tables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }

    fn truncate_table(&self, name: &str) -> CatalogResult<()> {
        let tables = self
            .tables
            .read()
            .map_err(|_| CatalogError::Unavailable("table map poisoned".to_string()))?;
        if tables.contains_key(name) {
            Ok(())
        } else {
            Err(CatalogError::TableNotFound(name.to_string()))
        }
    }

    fn run_ddl(&self, sql: &str) -> CatalogResult<String> {
        // Minimal CREATE TABLE recognizer so the reference backend can
        // satisfy the legacy path; everything else is acknowledged
        let tokens: Vec<&str> = sql.split_whitespace().collect();
        if tokens.len() >= 3
            && tokens[0].eq_ignore_ascii_case("CREATE")
            && tokens[1].eq_ignore_ascii_case("TABLE")
        {
            let name = tokens[2]
                .split('(')
                .next()
                .unwrap_or(tokens[2])
                .trim_matches('"');
            self.create_table(name, Vec::new())?;
            return Ok(format!("Table {} created.", name));
        }
        Ok("OK".to_string())
    }
}
