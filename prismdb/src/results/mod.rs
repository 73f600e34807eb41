// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result-set and data-frame types produced by the router
//!
//! Result sets come in two shapes, row-major and columnar, selected per
//! request. Zero-copy exports are described by a [`DataFrame`] triple whose
//! device pointer (if any) stays server-side in the handle registry.

use serde::{Deserialize, Serialize};

use crate::config::DeviceMode;

/// Scalar value inside a result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Shape metadata for one output column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
}

impl ColumnDescriptor {
    pub fn new(name: &str, type_name: &str, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            nullable,
        }
    }
}

/// One row-major row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Value>,
}

/// Result rows, row-major or columnar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowSet {
    Rows {
        descriptors: Vec<ColumnDescriptor>,
        rows: Vec<Row>,
    },
    Columns {
        descriptors: Vec<ColumnDescriptor>,
        columns: Vec<Vec<Value>>,
    },
}

impl RowSet {
    /// Empty row-major result
    pub fn empty() -> Self {
        RowSet::Rows {
            descriptors: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Single-column, single-value result used for explanations and
    /// execution messages
    pub fn simple_message(label: &str, text: &str, column_format: bool) -> Self {
        let descriptors = vec![ColumnDescriptor::new(label, "TEXT", false)];
        if column_format {
            RowSet::Columns {
                descriptors,
                columns: vec![vec![Value::Text(text.to_string())]],
            }
        } else {
            RowSet::Rows {
                descriptors,
                rows: vec![Row {
                    values: vec![Value::Text(text.to_string())],
                }],
            }
        }
    }

    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        match self {
            RowSet::Rows { descriptors, .. } => descriptors,
            RowSet::Columns { descriptors, .. } => descriptors,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            RowSet::Rows { rows, .. } => rows.len(),
            RowSet::Columns { columns, .. } => columns.first().map_or(0, Vec::len),
        }
    }

    pub fn is_columnar(&self) -> bool {
        matches!(self, RowSet::Columns { .. })
    }
}

/// Completed request: rows plus timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub row_set: RowSet,
    pub execution_time_ms: u64,
    pub total_time_ms: u64,
}

impl QueryOutcome {
    pub fn new(row_set: RowSet) -> Self {
        Self {
            row_set,
            execution_time_ms: 0,
            total_time_ms: 0,
        }
    }

    pub fn empty() -> Self {
        Self::new(RowSet::empty())
    }
}

/// Per-request execution options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteOptions {
    /// Return columnar rather than row-major results
    pub column_format: bool,

    /// Cap on returned rows; execution may stop early
    pub limit: Option<i64>,

    /// Hard cap on scanned rows; mutually exclusive with `limit`
    pub at_most_n: Option<i64>,

    /// Per-request device override
    pub device: Option<DeviceMode>,
}

/// Opaque device-memory address held in the handle registry
pub type DevicePointer = u64;

/// Zero-copy export descriptor returned to the client
///
/// The triple is (shared-memory segment name, size, handle). The handle must
/// be released explicitly; handles never released leak their device memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    pub sm_handle: String,
    pub sm_size: u64,
    pub df_handle: String,
    pub df_size: u64,
}

/// Engine-side Arrow export: the client-visible frame plus the device
/// pointer the registry bookkeeps until release
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFrame {
    pub frame: DataFrame,
    pub dev_ptr: Option<DevicePointer>,
}
