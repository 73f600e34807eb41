// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Server-level error taxonomy
//!
//! Collaborator failures (planner, engine, catalog) are converted into these
//! variants at the router boundary so callers see a single error surface.

use crate::catalog::CatalogError;
use thiserror::Error;

/// Errors surfaced by the admission layer
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not valid.")]
    SessionNotFound,

    #[error("Authentication failure: {0}")]
    AuthFailure(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Syntax error at: {0}")]
    SyntaxError(String),

    #[error("Lock conflict: {0}")]
    LockConflict(String),

    #[error("Distributed support is disabled.")]
    DistributedUnsupported,

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Data frame handle is not bookkept: {0}")]
    HandleNotFound(String),

    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Planner error: {0}")]
    Planner(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

pub type ServerResult<T> = Result<T, ServerError>;
