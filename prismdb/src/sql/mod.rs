// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lexical SQL statement handling
//!
//! This module classifies statements without validating grammar:
//! - Statement classification into DDL / DML / EXPLAIN wraps / meta commands
//! - Legacy-path statement splitting and target-table extraction
//! - Scrubbing of credentials from query text bound for log lines
//!
//! Classification is purely lexical; the planner owns the grammar.

pub mod classifier;
pub mod legacy;
pub mod scrub;

pub use classifier::{
    classify, Classification, CopyDirection, DmlKind, ExplainFlavor, MetaCommand, StatementClass,
};
pub use legacy::{parse_legacy_statement, split_statements, LegacyStatement};
pub use scrub::scrub_sensitive;
