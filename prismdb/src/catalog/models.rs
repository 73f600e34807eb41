// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog metadata records

use serde::{Deserialize, Serialize};

pub type DatabaseId = i32;
pub type TableId = i32;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i32,
    pub name: String,
    pub is_super: bool,
}

/// A registered database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseRecord {
    pub db_id: DatabaseId,
    pub name: String,
    pub owner: String,
}

/// A table within one database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub table_id: TableId,
    pub db_id: DatabaseId,
    pub name: String,
    pub is_view: bool,
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
}

impl ColumnRecord {
    pub fn new(name: &str, type_name: &str, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            nullable,
        }
    }
}

/// Privileges checked against a database object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPrivileges {
    pub select: bool,
    pub insert: bool,
}

impl AccessPrivileges {
    /// The minimal privilege set that counts as "may touch this database"
    pub fn minimal_access() -> Self {
        Self {
            select: false,
            insert: true,
        }
    }
}
