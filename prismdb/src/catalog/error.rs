// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog error types

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("Table {0} does not exist.")]
    TableNotFound(String),

    #[error("Database {0} does not exist.")]
    DatabaseNotFound(String),

    #[error("Table {0} already exists.")]
    TableAlreadyExists(String),

    #[error("Catalog operation failed: {0}")]
    OperationFailed(String),

    #[error("Catalog is unavailable: {0}")]
    Unavailable(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
