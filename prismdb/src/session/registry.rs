// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Concurrent session registry
//!
//! One reader/writer lock guards the session table. Tokens are retried at
//! generation time so they are unique among live sessions. Per-database
//! catalog handles are cached across sessions; on a cluster aggregator,
//! connect and disconnect are forwarded to the leaf tier under the same
//! token.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use crate::catalog::{AccessPrivileges, DatabaseCatalog, SystemCatalog, UserRecord};
use crate::collab::{LeafAggregator, RenderService};
use crate::config::{DeviceMode, ServerConfig};
use crate::error::{ServerError, ServerResult};
use crate::session::elevation::{generate_grant_id, ElevationGrant, PendingGrant};
use crate::session::models::{generate_token, Session};

type SessionMap = HashMap<String, Arc<RwLock<Session>>>;

pub struct SessionRegistry {
    sessions: RwLock<SessionMap>,
    catalogs: RwLock<HashMap<String, Arc<dyn DatabaseCatalog>>>,
    grants: Mutex<HashMap<String, PendingGrant>>,
    system_catalog: Arc<dyn SystemCatalog>,
    leaf_aggregator: Option<Arc<dyn LeafAggregator>>,
    render: Option<Arc<dyn RenderService>>,
    default_device: DeviceMode,
    cpu_mode_only: bool,
    grant_ttl: Duration,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(
        config: &ServerConfig,
        system_catalog: Arc<dyn SystemCatalog>,
        leaf_aggregator: Option<Arc<dyn LeafAggregator>>,
        render: Option<Arc<dyn RenderService>>,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            catalogs: RwLock::new(HashMap::new()),
            grants: Mutex::new(HashMap::new()),
            system_catalog,
            leaf_aggregator,
            render,
            default_device: config.device_mode,
            cpu_mode_only: config.cpu_mode_only,
            grant_ttl: config.elevation_grant_ttl,
            idle_timeout: config.session_idle_timeout,
        }
    }

    fn sessions_read(&self) -> ServerResult<RwLockReadGuard<'_, SessionMap>> {
        self.sessions
            .read()
            .map_err(|_| ServerError::InternalInconsistency("session table poisoned".to_string()))
    }

    fn sessions_write(&self) -> ServerResult<RwLockWriteGuard<'_, SessionMap>> {
        self.sessions
            .write()
            .map_err(|_| ServerError::InternalInconsistency("session table poisoned".to_string()))
    }

    fn write_session(session: &Arc<RwLock<Session>>) -> ServerResult<RwLockWriteGuard<'_, Session>> {
        session
            .write()
            .map_err(|_| ServerError::InternalInconsistency("session poisoned".to_string()))
    }

    /// Authenticate and create a session
    pub fn connect(&self, user: &str, password: &str, dbname: &str) -> ServerResult<String> {
        let mut sessions = self.sessions_write()?;
        let user_meta = self
            .system_catalog
            .user(user)
            .ok_or_else(|| ServerError::AuthFailure(format!("User {} does not exist.", user)))?;
        if !self.system_catalog.check_password(user, password) {
            return Err(ServerError::AuthFailure(format!(
                "Password for User {} is incorrect.",
                user
            )));
        }
        self.connect_impl(&mut sessions, user_meta, password, dbname, false)
    }

    /// Trusted bootstrap connection: no password check, no leaf forwarding
    pub fn internal_connect(&self, user: &str, dbname: &str) -> ServerResult<String> {
        let mut sessions = self.sessions_write()?;
        let user_meta = self
            .system_catalog
            .user(user)
            .ok_or_else(|| ServerError::AuthFailure(format!("User {} does not exist.", user)))?;
        self.connect_impl(&mut sessions, user_meta, "", dbname, true)
    }

    fn connect_impl(
        &self,
        sessions: &mut SessionMap,
        user_meta: UserRecord,
        password: &str,
        dbname: &str,
        trusted: bool,
    ) -> ServerResult<String> {
        let db_meta = self.system_catalog.database(dbname).ok_or_else(|| {
            ServerError::AuthorizationDenied(format!(
                "User {} is not authorized to access database {}",
                user_meta.name, dbname
            ))
        })?;
        if !self.system_catalog.check_database_access(
            &user_meta,
            &db_meta,
            AccessPrivileges::minimal_access(),
        ) {
            return Err(ServerError::AuthorizationDenied(format!(
                "User {} is not authorized to access database {}",
                user_meta.name, dbname
            )));
        }

        let mut token = generate_token();
        while sessions.contains_key(&token) {
            token = generate_token();
        }

        let catalog = {
            let mut catalogs = self.catalogs.write().map_err(|_| {
                ServerError::InternalInconsistency("catalog cache poisoned".to_string())
            })?;
            match catalogs.get(dbname) {
                Some(handle) => handle.clone(),
                None => {
                    let handle = self.system_catalog.open_database(&db_meta)?;
                    catalogs.insert(dbname.to_string(), handle.clone());
                    handle
                }
            }
        };

        let user_name = user_meta.name.clone();
        let session = Session::new(token.clone(), user_meta, catalog, self.default_device);
        sessions.insert(token.clone(), Arc::new(RwLock::new(session)));

        if !trusted {
            if let Some(leaf) = &self.leaf_aggregator {
                if leaf.leaf_count() > 0 {
                    if let Err(err) = leaf.connect(&token, &user_name, password, dbname) {
                        sessions.remove(&token);
                        return Err(err);
                    }
                }
            }
        }

        log::info!("User {} connected to database {}", user_name, dbname);
        Ok(token)
    }

    /// Tear down a session, propagating to dependent subsystems first
    pub fn disconnect(&self, token: &str) -> ServerResult<()> {
        let mut sessions = self.sessions_write()?;
        if let Some(leaf) = &self.leaf_aggregator {
            if leaf.leaf_count() > 0 {
                leaf.disconnect(token);
            }
        }
        if let Some(render) = &self.render {
            render.disconnect(token);
        }
        let session = sessions.remove(token).ok_or(ServerError::SessionNotFound)?;
        if let Ok(session) = session.read() {
            log::info!(
                "User {} disconnected from database {}",
                session.user.name,
                session.database_name()
            );
        }
        Ok(())
    }

    /// Resolve a session, refreshing its last-access time. A plain lookup
    /// always drops any transient elevation.
    pub fn lookup(&self, token: &str) -> ServerResult<Arc<RwLock<Session>>> {
        let session = {
            let sessions = self.sessions_read()?;
            sessions
                .get(token)
                .cloned()
                .ok_or(ServerError::SessionNotFound)?
        };
        {
            let mut guard = Self::write_session(&session)?;
            guard.de_elevate();
            guard.touch();
        }
        Ok(session)
    }

    /// Mint a one-shot elevation grant for the planner. Stale grants are
    /// purged on each mint.
    pub fn issue_elevation(&self, token: &str) -> ServerResult<ElevationGrant> {
        {
            let sessions = self.sessions_read()?;
            if !sessions.contains_key(token) {
                return Err(ServerError::SessionNotFound);
            }
        }
        let mut grants = self
            .grants
            .lock()
            .map_err(|_| ServerError::InternalInconsistency("grant table poisoned".to_string()))?;
        grants.retain(|_, grant| grant.issued_at.elapsed() <= self.grant_ttl);
        let grant_id = generate_grant_id();
        grants.insert(
            grant_id.clone(),
            PendingGrant {
                token: token.to_string(),
                issued_at: Instant::now(),
            },
        );
        Ok(ElevationGrant { grant_id })
    }

    /// Redeem a grant: resolves the granting session with transient
    /// superuser rights. Consumes the grant; a second redeem fails.
    pub fn redeem_elevation(&self, grant: &ElevationGrant) -> ServerResult<Arc<RwLock<Session>>> {
        let pending = {
            let mut grants = self.grants.lock().map_err(|_| {
                ServerError::InternalInconsistency("grant table poisoned".to_string())
            })?;
            grants.remove(grant.id())
        }
        .ok_or_else(|| {
            ServerError::AuthorizationDenied("elevation grant is not valid".to_string())
        })?;
        if pending.issued_at.elapsed() > self.grant_ttl {
            return Err(ServerError::AuthorizationDenied(
                "elevation grant has expired".to_string(),
            ));
        }
        let session = {
            let sessions = self.sessions_read()?;
            sessions
                .get(&pending.token)
                .cloned()
                .ok_or(ServerError::SessionNotFound)?
        };
        {
            let mut guard = Self::write_session(&session)?;
            guard.elevate();
            guard.touch();
        }
        Ok(session)
    }

    /// Switch a session's executor device mode
    pub fn set_execution_mode(&self, token: &str, mode: DeviceMode) -> ServerResult<()> {
        let sessions = self.sessions_write()?;
        let session = sessions.get(token).ok_or(ServerError::SessionNotFound)?;
        if mode == DeviceMode::Gpu && self.cpu_mode_only {
            return Err(ServerError::InvalidRequest(
                "Cannot switch to GPU mode in a server started in CPU-only mode.".to_string(),
            ));
        }
        let mut guard = Self::write_session(session)?;
        guard.device_mode = mode;
        guard.touch();
        log::info!("User {} sets {:?} mode.", guard.user.name, mode);
        Ok(())
    }

    /// Remove sessions idle past the configured timeout
    pub fn cleanup_expired(&self) -> usize {
        let expired: Vec<String> = match self.sessions_read() {
            Ok(sessions) => sessions
                .iter()
                .filter_map(|(token, session)| {
                    session
                        .read()
                        .ok()
                        .filter(|s| s.is_expired(self.idle_timeout))
                        .map(|_| token.clone())
                })
                .collect(),
            Err(_) => return 0,
        };
        let mut removed = 0;
        for token in expired {
            if self.disconnect(&token).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions_read().map(|s| s.len()).unwrap_or(0)
    }
}
