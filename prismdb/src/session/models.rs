// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session state

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::catalog::{DatabaseCatalog, UserRecord};
use crate::config::DeviceMode;

/// Length of a session token
pub const TOKEN_LEN: usize = 32;

/// Generate a random alphanumeric session token
pub fn generate_token() -> String {
    (0..TOKEN_LEN).map(|_| fastrand::alphanumeric()).collect()
}

/// One live session
pub struct Session {
    pub token: String,
    pub user: UserRecord,
    pub catalog: Arc<dyn DatabaseCatalog>,
    pub device_mode: DeviceMode,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    elevated: bool,
}

impl Session {
    pub fn new(
        token: String,
        user: UserRecord,
        catalog: Arc<dyn DatabaseCatalog>,
        device_mode: DeviceMode,
    ) -> Self {
        let now = Utc::now();
        Self {
            token,
            user,
            catalog,
            device_mode,
            created_at: now,
            last_active: now,
            elevated: false,
        }
    }

    /// Refresh the last-access timestamp
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Grant transient superuser rights for the current call
    pub fn elevate(&mut self) {
        self.elevated = true;
    }

    /// Drop transient superuser rights
    pub fn de_elevate(&mut self) {
        self.elevated = false;
    }

    pub fn is_elevated(&self) -> bool {
        self.elevated
    }

    pub fn is_superuser(&self) -> bool {
        self.user.is_super || self.elevated
    }

    pub fn database_name(&self) -> &str {
        self.catalog.name()
    }

    pub fn is_expired(&self, idle_timeout: Duration) -> bool {
        let idle = Utc::now() - self.last_active;
        idle.num_milliseconds() > idle_timeout.as_millis() as i64
    }

    /// Immutable snapshot handed to request execution
    pub fn view(&self) -> SessionView {
        SessionView {
            token: self.token.clone(),
            user: self.user.clone(),
            catalog: self.catalog.clone(),
            device_mode: self.device_mode,
            superuser: self.is_superuser(),
        }
    }
}

/// Snapshot of the session fields a request needs, taken under the session
/// lock once per request
#[derive(Clone)]
pub struct SessionView {
    pub token: String,
    pub user: UserRecord,
    pub catalog: Arc<dyn DatabaseCatalog>,
    pub device_mode: DeviceMode,
    pub superuser: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_fixed_length_alphanumeric() {
        for _ in 0..100 {
            let token = generate_token();
            assert_eq!(token.len(), TOKEN_LEN);
            assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
