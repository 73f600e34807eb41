// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Execution kernel boundary

use thiserror::Error;

use crate::config::DeviceMode;
use crate::results::{ArrowFrame, DataFrame, DevicePointer, RowSet};
use crate::sql::LegacyStatement;

/// Options forwarded to the kernel per request
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub column_format: bool,
    pub limit: Option<i64>,
    pub at_most_n: Option<i64>,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Failed(String),

    #[error("Query interrupted")]
    Interrupted,
}

/// Opaque plan → rows. Implementations own device selection details; the
/// router owns the locks that must be held around every call.
pub trait ExecutionEngine: Send + Sync {
    fn execute_plan(
        &self,
        plan: &str,
        device: DeviceMode,
        options: &EngineOptions,
    ) -> Result<RowSet, EngineError>;

    /// Explanation text for a plan; backs `EXPLAIN <query>`
    fn explain_plan(&self, plan: &str) -> Result<String, EngineError>;

    /// Execute a legacy-path statement the planner never saw
    fn execute_statement(
        &self,
        statement: &LegacyStatement,
        device: DeviceMode,
        options: &EngineOptions,
    ) -> Result<RowSet, EngineError>;

    /// Zero-copy Arrow export of a plan's result
    fn execute_arrow(
        &self,
        plan: &str,
        device: DeviceMode,
        device_id: usize,
        limit: Option<i64>,
    ) -> Result<ArrowFrame, EngineError>;

    /// Release an exported frame; `dev_ptr` is the registry's bookkept
    /// pointer for device-resident frames
    fn release_arrow(
        &self,
        frame: &DataFrame,
        dev_ptr: Option<DevicePointer>,
        device: DeviceMode,
        device_id: usize,
    ) -> Result<(), EngineError>;

    /// Abort running plan execution. Storage mutations already applied are
    /// not rolled back; callers must treat interrupted DML as unknown.
    fn interrupt(&self);

    fn gpus_present(&self) -> bool;

    fn gpu_count(&self) -> usize;
}
