// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Table and global lock coordination
//!
//! Deadlock avoidance rests on one invariant: locks are acquired in a
//! fixed, never-reversed order per statement category, and CheckpointLock
//! always precedes UpdateDeleteLock when both are needed. The
//! ExecutorOuterLock is the single global gate separating bulk concurrent
//! reads from exclusive row-inserting execution; it is taken after any
//! CheckpointLock and before row data is touched.
//!
//! Lock handles are owned guards: dropping a handle releases the lock, on
//! success, error, or panic unwind alike, so a request can never exit
//! holding a partial lock set.

pub mod coordinator;
pub mod keys;
pub mod plan;
pub mod table;

pub use coordinator::{GlobalLockHandle, LockCoordinator, TableLockHandle};
pub use keys::{GlobalLockKind, LockMode, TableKey, TableLockKind};
pub use plan::{StatementCategory, StatementLocks};
