// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Zero-copy data frame handle bookkeeping
//!
//! Device-resident exports keep their device pointer here until the client
//! releases the handle. The registry detects double release and release of
//! unknown handles. Handles never released leak their device memory; that
//! is an accepted risk, since only the client knows when its zero-copy
//! readers are done.

pub mod registry;

pub use registry::DataFrameHandleRegistry;
