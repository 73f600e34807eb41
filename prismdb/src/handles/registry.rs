// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Data frame handle registry

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{ServerError, ServerResult};
use crate::results::DevicePointer;

/// Handle → device pointer map. Guarded by its own mutex so export
/// bookkeeping never serializes against session traffic.
pub struct DataFrameHandleRegistry {
    handles: Mutex<HashMap<String, DevicePointer>>,
}

impl DataFrameHandleRegistry {
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Record a fresh export. A live handle registered twice means the
    /// engine produced a colliding handle name.
    pub fn put(&self, handle: &str, dev_ptr: DevicePointer) -> ServerResult<()> {
        let mut handles = self
            .handles
            .lock()
            .map_err(|_| ServerError::InternalInconsistency("handle map poisoned".to_string()))?;
        if handles.contains_key(handle) {
            return Err(ServerError::InternalInconsistency(format!(
                "data frame handle {} inserted twice",
                handle
            )));
        }
        handles.insert(handle.to_string(), dev_ptr);
        Ok(())
    }

    /// Remove and return an export. Unknown or already-taken handles fail:
    /// that is how double release and use-after-release surface.
    pub fn take(&self, handle: &str) -> ServerResult<DevicePointer> {
        let mut handles = self
            .handles
            .lock()
            .map_err(|_| ServerError::InternalInconsistency("handle map poisoned".to_string()))?;
        handles
            .remove(handle)
            .ok_or_else(|| ServerError::HandleNotFound(handle.to_string()))
    }

    pub fn live_count(&self) -> usize {
        self.handles.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for DataFrameHandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
