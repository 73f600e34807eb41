// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! The query router
//!
//! Owns the session registry, the lock coordinator, and the data frame
//! handle registry; everything else is an injected collaborator. Requests
//! run on the calling thread and block in lock acquisition; every lock
//! handle is dropped on every exit path of the request.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::{CatalogError, TableRecord};
use crate::collab::{
    AccessedTables, ClusterCoordinator, DeferredImport, EngineError, EngineOptions,
    ExecutionEngine, Epoch, Fragmenter, Importer, LeafAggregator, PlanOutcome, PlanRequest,
    Planner, RenderService,
};
use crate::collab::planner::PlannerError;
use crate::catalog::SystemCatalog;
use crate::config::{ClusterRole, DeviceMode, ServerConfig};
use crate::error::{ServerError, ServerResult};
use crate::handles::DataFrameHandleRegistry;
use crate::locks::{LockCoordinator, StatementCategory, StatementLocks, TableKey};
use crate::results::{DataFrame, ExecuteOptions, QueryOutcome, Row, RowSet, Value};
use crate::router::phase::{RequestPhase, RequestTrace};
use crate::session::{SessionRegistry, SessionView};
use crate::sql::{
    classify, scrub_sensitive, split_statements, Classification, ExplainFlavor, LegacyStatement,
    MetaCommand, StatementClass,
};
use crate::sql::legacy::parse_legacy_statement;

/// External services injected at construction
pub struct Collaborators {
    pub system_catalog: Arc<dyn SystemCatalog>,
    pub planner: Arc<dyn Planner>,
    pub engine: Arc<dyn ExecutionEngine>,
    pub fragmenter: Arc<dyn Fragmenter>,
    pub importer: Arc<dyn Importer>,
    pub leaf_aggregator: Option<Arc<dyn LeafAggregator>>,
    pub render: Option<Arc<dyn RenderService>>,
    pub cluster_coordinator: Option<Arc<dyn ClusterCoordinator>>,
}

pub struct QueryRouter {
    config: ServerConfig,
    sessions: SessionRegistry,
    locks: LockCoordinator,
    handles: DataFrameHandleRegistry,
    planner: Arc<dyn Planner>,
    engine: Arc<dyn ExecutionEngine>,
    fragmenter: Arc<dyn Fragmenter>,
    importer: Arc<dyn Importer>,
    leaf_aggregator: Option<Arc<dyn LeafAggregator>>,
    cluster_coordinator: Option<Arc<dyn ClusterCoordinator>>,
}

impl QueryRouter {
    pub fn new(config: ServerConfig, collaborators: Collaborators) -> Self {
        let sessions = SessionRegistry::new(
            &config,
            collaborators.system_catalog,
            collaborators.leaf_aggregator.clone(),
            collaborators.render,
        );
        let locks = LockCoordinator::new(config.lock_timeout);
        Self {
            config,
            sessions,
            locks,
            handles: DataFrameHandleRegistry::new(),
            planner: collaborators.planner,
            engine: collaborators.engine,
            fragmenter: collaborators.fragmenter,
            importer: collaborators.importer,
            leaf_aggregator: collaborators.leaf_aggregator,
            cluster_coordinator: collaborators.cluster_coordinator,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn lock_coordinator(&self) -> &LockCoordinator {
        &self.locks
    }

    pub fn handle_registry(&self) -> &DataFrameHandleRegistry {
        &self.handles
    }

    // --- session lifecycle -------------------------------------------------

    pub fn connect(&self, user: &str, password: &str, dbname: &str) -> ServerResult<String> {
        self.sessions.connect(user, password, dbname)
    }

    pub fn internal_connect(&self, user: &str, dbname: &str) -> ServerResult<String> {
        self.sessions.internal_connect(user, dbname)
    }

    pub fn disconnect(&self, token: &str) -> ServerResult<()> {
        self.sessions.disconnect(token)
    }

    pub fn set_execution_mode(&self, token: &str, mode: DeviceMode) -> ServerResult<()> {
        self.sessions.set_execution_mode(token, mode)
    }

    /// Abort a running query for this session. Only active when dynamic
    /// interrupt checking is enabled. Storage mutations already applied are
    /// not rolled back; an interrupted DML's effect is unknown to the caller.
    pub fn interrupt(&self, token: &str) -> ServerResult<()> {
        if !self.config.enable_dynamic_watchdog {
            return Ok(());
        }
        let view = self.session_view(token)?;
        if let Some(leaf) = &self.leaf_aggregator {
            if leaf.leaf_count() > 0 {
                leaf.interrupt(token);
            }
        }
        log::info!(
            "User {} interrupted session with database {}",
            view.user.name,
            view.catalog.name()
        );
        self.engine.interrupt();
        Ok(())
    }

    // --- epoch administration ---------------------------------------------

    pub fn table_epoch(&self, token: &str, db_id: i32, table_id: i32) -> ServerResult<Epoch> {
        self.session_view(token)?;
        self.fragmenter
            .epoch(db_id, table_id)
            .map_err(|e| ServerError::Execution(e.to_string()))
    }

    pub fn set_table_epoch(
        &self,
        token: &str,
        db_id: i32,
        table_id: i32,
        epoch: Epoch,
    ) -> ServerResult<()> {
        let view = self.session_view(token)?;
        if !view.superuser {
            return Err(ServerError::AuthorizationDenied(
                "Only superuser can set table epochs".to_string(),
            ));
        }
        self.fragmenter
            .set_epoch(db_id, table_id, epoch)
            .map_err(|e| ServerError::Execution(e.to_string()))
    }

    // --- execution ---------------------------------------------------------

    /// Execute one request: classify, route, lock, dispatch, and run any
    /// deferred import work the statement captured
    pub fn execute(
        &self,
        token: &str,
        sql: &str,
        options: &ExecuteOptions,
    ) -> ServerResult<QueryOutcome> {
        let mut trace = RequestTrace::new();
        if options.limit.is_some() && options.at_most_n.is_some() {
            return Err(ServerError::InvalidRequest(
                "At most one of limit and at_most_n can be set".to_string(),
            ));
        }
        let view = self.session_view(token)?;
        log::info!(
            "execute: user {} database {}: {}",
            view.user.name,
            view.catalog.name(),
            scrub_sensitive(sql)
        );

        if self.config.cluster_role == ClusterRole::Aggregator {
            trace.advance(RequestPhase::RoutedCluster);
            let coordinator = self
                .cluster_coordinator
                .as_deref()
                .ok_or(ServerError::DistributedUnsupported)?;
            let result = coordinator.execute(token, sql, options);
            trace.advance(RequestPhase::Returned);
            return result;
        }

        let started = Instant::now();
        let classification = classify(sql);
        trace.advance(RequestPhase::Classified);

        let result = self.dispatch(&view, token, sql, &classification, options, &mut trace);
        let result = result.and_then(|(mut outcome, deferred)| {
            if let Some(deferred) = deferred {
                trace.advance(RequestPhase::DeferredImport);
                self.run_deferred_import(&view, deferred)?;
            }
            outcome.total_time_ms = started.elapsed().as_millis() as u64;
            Ok(outcome)
        });
        trace.advance(RequestPhase::Returned);
        result
    }

    fn dispatch(
        &self,
        view: &SessionView,
        token: &str,
        sql: &str,
        classification: &Classification,
        options: &ExecuteOptions,
        trace: &mut RequestTrace,
    ) -> ServerResult<(QueryOutcome, Option<DeferredImport>)> {
        match &classification.class {
            StatementClass::Meta(MetaCommand::Describe { target }) => {
                trace.advance(RequestPhase::RoutedMeta);
                let outcome = self.describe_table(view, target, options)?;
                trace.advance(RequestPhase::Executed);
                Ok((outcome, None))
            }
            _ if classification.is_planner_eligible() => {
                trace.advance(RequestPhase::RoutedPlanner);
                self.execute_planner_path(view, token, classification, options, trace)
                    .map(|outcome| (outcome, None))
            }
            // the original text goes to the legacy path: an opaque
            // EXPLAIN stays wrapped and is refused downstream instead of
            // executing its inner statement
            _ => {
                trace.advance(RequestPhase::RoutedLegacy);
                log::info!("passing query to legacy processor");
                self.execute_legacy_path(view, token, sql, options, trace)
            }
        }
    }

    /// Meta command: synthesized locally from catalog metadata, no planner
    fn describe_table(
        &self,
        view: &SessionView,
        target: &str,
        options: &ExecuteOptions,
    ) -> ServerResult<QueryOutcome> {
        let columns = view.catalog.columns(target)?;
        let descriptors = vec![
            crate::results::ColumnDescriptor::new("Column", "TEXT", false),
            crate::results::ColumnDescriptor::new("Type", "TEXT", false),
            crate::results::ColumnDescriptor::new("Nullable", "BOOLEAN", false),
        ];
        let row_set = if options.column_format {
            let mut names = Vec::new();
            let mut types = Vec::new();
            let mut nullables = Vec::new();
            for column in &columns {
                names.push(Value::Text(column.name.clone()));
                types.push(Value::Text(column.type_name.clone()));
                nullables.push(Value::Boolean(column.nullable));
            }
            RowSet::Columns {
                descriptors,
                columns: vec![names, types, nullables],
            }
        } else {
            RowSet::Rows {
                descriptors,
                rows: columns
                    .iter()
                    .map(|column| Row {
                        values: vec![
                            Value::Text(column.name.clone()),
                            Value::Text(column.type_name.clone()),
                            Value::Boolean(column.nullable),
                        ],
                    })
                    .collect(),
            }
        };
        Ok(QueryOutcome::new(row_set))
    }

    /// Send a statement to the planner under a fresh elevation grant
    fn plan_statement(
        &self,
        token: &str,
        sql: &str,
        calcite_explain: bool,
    ) -> ServerResult<PlanOutcome> {
        let elevation = self.sessions.issue_elevation(token)?;
        let request = PlanRequest {
            session_token: token.to_string(),
            elevation,
            sql: sql.to_string(),
            legacy_syntax: self.config.legacy_syntax,
            explain: calcite_explain,
        };
        self.planner.process(request).map_err(map_planner_error)
    }

    /// Resolve planner-reported table names against the session catalog
    fn resolve_lock_tables(
        &self,
        view: &SessionView,
        accessed: &AccessedTables,
    ) -> ServerResult<BTreeMap<TableKey, bool>> {
        let mut tables = BTreeMap::new();
        for (name, written) in accessed.read_write_map() {
            let record = self.resolve_table(view, &name)?;
            tables.insert(TableKey::from(&record), written);
        }
        Ok(tables)
    }

    fn resolve_table(&self, view: &SessionView, name: &str) -> ServerResult<TableRecord> {
        view.catalog
            .table(name)
            .ok_or_else(|| ServerError::Catalog(CatalogError::TableNotFound(name.to_string())))
    }

    fn execute_planner_path(
        &self,
        view: &SessionView,
        token: &str,
        classification: &Classification,
        options: &ExecuteOptions,
        trace: &mut RequestTrace,
    ) -> ServerResult<QueryOutcome> {
        let flavor = classification.explain_flavor();
        let calcite_explain = flavor == Some(ExplainFlavor::Calcite);
        let plan = self.plan_statement(token, &classification.actual_query, calcite_explain)?;

        if calcite_explain {
            // the serialized plan itself is the answer; nothing executes
            trace.advance(RequestPhase::Executed);
            return Ok(QueryOutcome::new(RowSet::simple_message(
                "Explanation",
                &plan.plan,
                options.column_format,
            )));
        }

        let tables = self.resolve_lock_tables(view, &plan.accessed)?;
        let locks = StatementLocks::for_planner_tables(&self.locks, &tables)?;
        trace.advance(RequestPhase::Locked);
        log::debug!("lock sequence: {:?}", locks.acquisition_trace());

        let execution_started = Instant::now();
        let mut outcome = if flavor == Some(ExplainFlavor::Plain) {
            let explanation = self
                .engine
                .explain_plan(&plan.plan)
                .map_err(map_engine_error)?;
            QueryOutcome::new(RowSet::simple_message(
                "Explanation",
                &explanation,
                options.column_format,
            ))
        } else {
            let device = options.device.unwrap_or(view.device_mode);
            let rows = self
                .engine
                .execute_plan(&plan.plan, device, &engine_options(options))
                .map_err(map_engine_error)?;
            QueryOutcome::new(rows)
        };
        trace.advance(RequestPhase::Executed);
        outcome.execution_time_ms = execution_started.elapsed().as_millis() as u64;
        drop(locks);
        Ok(outcome)
    }

    fn execute_legacy_path(
        &self,
        view: &SessionView,
        token: &str,
        sql: &str,
        options: &ExecuteOptions,
        trace: &mut RequestTrace,
    ) -> ServerResult<(QueryOutcome, Option<DeferredImport>)> {
        let mut outcome = QueryOutcome::empty();
        let mut deferred = None;
        for statement_sql in split_statements(sql) {
            let statement = parse_legacy_statement(&statement_sql)?;
            if self.config.read_only && !statement.is_read_only_safe() {
                return Err(ServerError::InvalidRequest(
                    "Non-SELECT statements disabled: server running in read-only mode."
                        .to_string(),
                ));
            }
            // first failure aborts the remaining statements in the batch
            let (rows, statement_deferred) =
                self.execute_legacy_statement(view, token, &statement, options, trace)?;
            outcome.row_set = rows;
            if statement_deferred.is_some() {
                deferred = statement_deferred;
            }
        }
        Ok((outcome, deferred))
    }

    fn execute_legacy_statement(
        &self,
        view: &SessionView,
        token: &str,
        statement: &LegacyStatement,
        options: &ExecuteOptions,
        trace: &mut RequestTrace,
    ) -> ServerResult<(RowSet, Option<DeferredImport>)> {
        let device = options.device.unwrap_or(view.device_mode);
        let engine_opts = engine_options(options);

        match statement {
            LegacyStatement::Select { sql } => {
                let plan = self.plan_statement(token, sql, false)?;
                let reads = self.read_set(view, &plan.accessed)?;
                let locks = StatementLocks::for_legacy(
                    &self.locks,
                    StatementCategory::Select,
                    None,
                    &reads,
                )?;
                trace.advance(RequestPhase::Locked);
                log::debug!("lock sequence: {:?}", locks.acquisition_trace());
                let rows = self
                    .engine
                    .execute_plan(&plan.plan, device, &engine_opts)
                    .map_err(map_engine_error)?;
                trace.advance(RequestPhase::Executed);
                Ok((rows, None))
            }
            LegacyStatement::ExportQuery { query, .. } => {
                let plan = self.plan_statement(token, query, false)?;
                let reads = self.read_set(view, &plan.accessed)?;
                let locks = StatementLocks::for_legacy(
                    &self.locks,
                    StatementCategory::Select,
                    None,
                    &reads,
                )?;
                trace.advance(RequestPhase::Locked);
                log::debug!("lock sequence: {:?}", locks.acquisition_trace());
                let rows = self
                    .engine
                    .execute_statement(statement, device, &engine_opts)
                    .map_err(map_engine_error)?;
                trace.advance(RequestPhase::Executed);
                Ok((rows, None))
            }
            LegacyStatement::CopyFrom { table, source, .. } => {
                // lock only if the table exists; a geo load may create it
                // in its deferred half
                let record = view.catalog.table(table);
                let target = record.as_ref().map(TableKey::from);
                let _locks = StatementLocks::for_legacy(
                    &self.locks,
                    StatementCategory::CopyFrom,
                    target,
                    &BTreeSet::new(),
                )?;
                trace.advance(RequestPhase::Locked);
                let copy = self
                    .importer
                    .copy_from(&view.catalog, record.as_ref(), table, source)
                    .map_err(|e| ServerError::ImportError(e.to_string()))?;
                if copy.report.rows_rejected > 0 {
                    log::warn!(
                        "COPY into {} rejected {} rows",
                        table,
                        copy.report.rows_rejected
                    );
                }
                if let Some(record) = &record {
                    self.fragmenter
                        .checkpoint(record.db_id, record.table_id)
                        .map_err(|e| ServerError::Execution(e.to_string()))?;
                }
                trace.advance(RequestPhase::Executed);
                Ok((
                    RowSet::simple_message("Result", &copy.message, options.column_format),
                    copy.deferred,
                ))
            }
            LegacyStatement::DropTable { table, .. } => {
                let record = self.resolve_table(view, table)?;
                let _locks = StatementLocks::for_legacy(
                    &self.locks,
                    StatementCategory::DropOrTruncate,
                    Some(TableKey::from(&record)),
                    &BTreeSet::new(),
                )?;
                trace.advance(RequestPhase::Locked);
                view.catalog.drop_table(table)?;
                trace.advance(RequestPhase::Executed);
                Ok((RowSet::empty(), None))
            }
            LegacyStatement::TruncateTable { table, .. } => {
                let record = self.resolve_table(view, table)?;
                let _locks = StatementLocks::for_legacy(
                    &self.locks,
                    StatementCategory::DropOrTruncate,
                    Some(TableKey::from(&record)),
                    &BTreeSet::new(),
                )?;
                trace.advance(RequestPhase::Locked);
                view.catalog.truncate_table(table)?;
                self.fragmenter
                    .checkpoint(record.db_id, record.table_id)
                    .map_err(|e| ServerError::Execution(e.to_string()))?;
                trace.advance(RequestPhase::Executed);
                Ok((RowSet::empty(), None))
            }
            LegacyStatement::OtherDdl { sql } => {
                let message = view.catalog.run_ddl(sql)?;
                trace.advance(RequestPhase::Executed);
                Ok((
                    RowSet::simple_message("Result", &message, options.column_format),
                    None,
                ))
            }
            LegacyStatement::InsertValues { table, .. } => {
                let record = self.resolve_table(view, table)?;
                let locks = StatementLocks::for_legacy(
                    &self.locks,
                    StatementCategory::InsertValues,
                    Some(TableKey::from(&record)),
                    &BTreeSet::new(),
                )?;
                trace.advance(RequestPhase::Locked);
                log::debug!("lock sequence: {:?}", locks.acquisition_trace());
                let rows = self
                    .engine
                    .execute_statement(statement, device, &engine_opts)
                    .map_err(map_engine_error)?;
                trace.advance(RequestPhase::Executed);
                Ok((rows, None))
            }
            LegacyStatement::InsertQuery { table, sql } => {
                let record = self.resolve_table(view, table)?;
                let plan = self.plan_statement(token, sql, false)?;
                let reads = self.read_set(view, &plan.accessed)?;
                let locks = StatementLocks::for_legacy(
                    &self.locks,
                    StatementCategory::InsertSelect,
                    Some(TableKey::from(&record)),
                    &reads,
                )?;
                trace.advance(RequestPhase::Locked);
                log::debug!("lock sequence: {:?}", locks.acquisition_trace());
                let rows = self
                    .engine
                    .execute_statement(statement, device, &engine_opts)
                    .map_err(map_engine_error)?;
                trace.advance(RequestPhase::Executed);
                Ok((rows, None))
            }
            LegacyStatement::Mutation { table, .. } => {
                let record = self.resolve_table(view, table)?;
                let locks = StatementLocks::for_legacy(
                    &self.locks,
                    StatementCategory::UpdateDelete,
                    Some(TableKey::from(&record)),
                    &BTreeSet::new(),
                )?;
                trace.advance(RequestPhase::Locked);
                log::debug!("lock sequence: {:?}", locks.acquisition_trace());
                let rows = self
                    .engine
                    .execute_statement(statement, device, &engine_opts)
                    .map_err(map_engine_error)?;
                trace.advance(RequestPhase::Executed);
                Ok((rows, None))
            }
        }
    }

    /// Tables a statement only reads, as lock keys
    fn read_set(
        &self,
        view: &SessionView,
        accessed: &AccessedTables,
    ) -> ServerResult<BTreeSet<TableKey>> {
        let mut reads = BTreeSet::new();
        for (name, written) in accessed.read_write_map() {
            if !written {
                reads.insert(TableKey::from(&self.resolve_table(view, &name)?));
            }
        }
        Ok(reads)
    }

    /// Deferred half of a geo bulk load. The value is consumed here, so the
    /// import runs exactly once and only after the DDL half succeeded.
    fn run_deferred_import(&self, view: &SessionView, deferred: DeferredImport) -> ServerResult<()> {
        if let Some(leaf) = &self.leaf_aggregator {
            if leaf.leaf_count() > 0 {
                return Err(ServerError::ImportError(
                    "Distributed geo import is not yet supported".to_string(),
                ));
            }
        }
        let report = self
            .importer
            .import_geo_table(&view.catalog, &deferred)
            .map_err(|e| ServerError::ImportError(e.to_string()))?;
        if report.rows_rejected > 0 {
            log::warn!(
                "geo import into {} rejected {} rows",
                deferred.table,
                report.rows_rejected
            );
        }
        log::info!(
            "geo import into {} completed: {} rows",
            deferred.table,
            report.rows_completed
        );
        Ok(())
    }

    // --- zero-copy exports --------------------------------------------------

    /// Execute a planner-eligible statement and export the result as a
    /// zero-copy data frame. Device-resident frames are bookkept until the
    /// client releases them.
    pub fn execute_dataframe(
        &self,
        token: &str,
        sql: &str,
        device: DeviceMode,
        device_id: usize,
        limit: Option<i64>,
    ) -> ServerResult<DataFrame> {
        let mut trace = RequestTrace::new();
        let view = self.session_view(token)?;
        if device == DeviceMode::Gpu {
            if view.device_mode != DeviceMode::Gpu {
                return Err(ServerError::Execution(
                    "GPU mode is not allowed in this session".to_string(),
                ));
            }
            if !self.engine.gpus_present() {
                return Err(ServerError::Execution(
                    "no GPU is available in this server".to_string(),
                ));
            }
            if device_id >= self.engine.gpu_count() {
                return Err(ServerError::InvalidRequest(
                    "invalid device_id or unavailable GPU with this ID".to_string(),
                ));
            }
        }
        log::info!("execute_dataframe: {}", scrub_sensitive(sql));

        let classification = classify(sql);
        trace.advance(RequestPhase::Classified);
        if !classification.is_planner_eligible() {
            return Err(ServerError::InvalidRequest(
                "DDL or update DML are not supported by the data frame interface".to_string(),
            ));
        }
        if classification.explain_flavor() == Some(ExplainFlavor::Calcite) {
            return Err(ServerError::InvalidRequest(
                "explain is not supported by the data frame interface".to_string(),
            ));
        }
        trace.advance(RequestPhase::RoutedPlanner);

        let plan = self.plan_statement(token, &classification.actual_query, false)?;
        let tables = self.resolve_lock_tables(&view, &plan.accessed)?;
        let locks = StatementLocks::for_planner_tables(&self.locks, &tables)?;
        trace.advance(RequestPhase::Locked);
        log::debug!("lock sequence: {:?}", locks.acquisition_trace());

        let arrow = self
            .engine
            .execute_arrow(&plan.plan, device, device_id, limit)
            .map_err(map_engine_error)?;
        trace.advance(RequestPhase::Executed);
        if arrow.frame.sm_size == 0 {
            return Err(ServerError::Execution(
                "schema is missing in returned result".to_string(),
            ));
        }
        if let Some(dev_ptr) = arrow.dev_ptr {
            self.handles.put(&arrow.frame.df_handle, dev_ptr)?;
        }
        trace.advance(RequestPhase::Returned);
        drop(locks);
        Ok(arrow.frame)
    }

    /// Release a zero-copy export. Double release and release of unknown
    /// handles fail; they indicate a client-side lifetime bug.
    pub fn release_dataframe(
        &self,
        token: &str,
        frame: &DataFrame,
        device: DeviceMode,
        device_id: usize,
    ) -> ServerResult<()> {
        self.session_view(token)?;
        let dev_ptr = if device == DeviceMode::Gpu {
            Some(self.handles.take(&frame.df_handle)?)
        } else {
            None
        };
        self.engine
            .release_arrow(frame, dev_ptr, device, device_id)
            .map_err(map_engine_error)
    }

    fn session_view(&self, token: &str) -> ServerResult<SessionView> {
        let session = self.sessions.lookup(token)?;
        let guard = session
            .read()
            .map_err(|_| ServerError::InternalInconsistency("session poisoned".to_string()))?;
        Ok(guard.view())
    }
}

fn engine_options(options: &ExecuteOptions) -> EngineOptions {
    EngineOptions {
        column_format: options.column_format,
        limit: options.limit,
        at_most_n: options.at_most_n,
    }
}

fn map_engine_error(error: EngineError) -> ServerError {
    ServerError::Execution(error.to_string())
}

fn map_planner_error(error: PlannerError) -> ServerError {
    let message = error.to_string();
    if message.contains("java.lang.NullPointerException") {
        ServerError::Planner(
            "query failed from broken view or other schema related issue".to_string(),
        )
    } else {
        ServerError::Planner(message)
    }
}
