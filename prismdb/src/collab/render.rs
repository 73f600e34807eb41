// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Render service boundary

/// Backend renderer notified of session teardown so it can drop any
/// session-scoped render state
pub trait RenderService: Send + Sync {
    fn disconnect(&self, token: &str);
}
