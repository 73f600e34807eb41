// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session management
//!
//! Sessions bind an authenticated user to a database catalog handle and an
//! executor device mode. The registry is the only writer of the session
//! table:
//! - connect / disconnect / mode changes take the writer side
//! - lookups take the reader side and refresh last-access time
//! - the planner re-enters through one-shot elevation grants instead of a
//!   token-prefix back-channel

pub mod elevation;
pub mod models;
pub mod registry;

pub use elevation::ElevationGrant;
pub use models::{Session, SessionView};
pub use registry::SessionRegistry;
