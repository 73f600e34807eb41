//! Test utilities for PrismDB integration tests
//!
//! `TestFixture` wires a QueryRouter against the in-memory catalog and
//! recording doubles for the planner, engine, fragmenter, and importer, so
//! tests can assert on what crossed each collaborator seam.

// Not every test binary touches every double.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use prismdb::catalog::{
    ColumnRecord, DatabaseCatalog, MemoryCatalog, SystemCatalog, TableRecord,
};
use prismdb::collab::{
    AccessedTables, CopyOutcome, DeferredImport, EngineError, EngineOptions, Epoch,
    ExecutionEngine, Fragmenter, FragmenterError, ImportReport, Importer, ImporterError,
    PlanOutcome, PlanRequest, Planner, PlannerError,
};
use prismdb::results::{ArrowFrame, DataFrame, DevicePointer, Row, RowSet, Value};
use prismdb::sql::LegacyStatement;
use prismdb::{Collaborators, DeviceMode, QueryRouter, ServerConfig};

/// Planner double: canned plan outcomes keyed by statement text, with a
/// recording of every request that crossed the seam
pub struct ScriptedPlanner {
    outcomes: Mutex<HashMap<String, PlanOutcome>>,
    pub requests: Mutex<Vec<PlanRequest>>,
    fail_with: Mutex<Option<String>>,
}

impl ScriptedPlanner {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    /// Canned outcome for one exact statement text
    pub fn script(&self, sql: &str, accessed: AccessedTables) {
        self.outcomes.lock().unwrap().insert(
            sql.to_string(),
            PlanOutcome {
                plan: format!("plan({})", sql),
                accessed,
            },
        );
    }

    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<PlanRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Planner for ScriptedPlanner {
    fn process(&self, request: PlanRequest) -> Result<PlanOutcome, PlannerError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(PlannerError::Rejected(message));
        }
        let outcomes = self.outcomes.lock().unwrap();
        Ok(outcomes.get(&request.sql).cloned().unwrap_or_else(|| PlanOutcome {
            plan: format!("plan({})", request.sql),
            accessed: AccessedTables {
                selected_from: vec!["t".to_string()],
                ..Default::default()
            },
        }))
    }
}

/// Engine double: records what it executed, returns a one-row result
pub struct RecordingEngine {
    pub executed_plans: Mutex<Vec<String>>,
    pub executed_statements: Mutex<Vec<String>>,
    pub released_handles: Mutex<Vec<String>>,
    pub interrupts: AtomicUsize,
    pub delay: Mutex<Option<Duration>>,
    arrow_dev_ptr: Mutex<Option<DevicePointer>>,
    arrow_counter: AtomicU64,
    gpu_count: usize,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            executed_plans: Mutex::new(Vec::new()),
            executed_statements: Mutex::new(Vec::new()),
            released_handles: Mutex::new(Vec::new()),
            interrupts: AtomicUsize::new(0),
            delay: Mutex::new(None),
            arrow_dev_ptr: Mutex::new(None),
            arrow_counter: AtomicU64::new(0),
            gpu_count: 0,
        }
    }

    pub fn with_gpus(count: usize) -> Self {
        let mut engine = Self::new();
        engine.gpu_count = count;
        engine
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn set_arrow_dev_ptr(&self, dev_ptr: DevicePointer) {
        *self.arrow_dev_ptr.lock().unwrap() = Some(dev_ptr);
    }

    fn pause(&self) {
        if let Some(delay) = *self.delay.lock().unwrap() {
            std::thread::sleep(delay);
        }
    }

    fn one_row(&self) -> RowSet {
        RowSet::Rows {
            descriptors: vec![prismdb::results::ColumnDescriptor::new(
                "Result", "BIGINT", false,
            )],
            rows: vec![Row {
                values: vec![Value::Integer(1)],
            }],
        }
    }
}

impl ExecutionEngine for RecordingEngine {
    fn execute_plan(
        &self,
        plan: &str,
        _device: DeviceMode,
        _options: &EngineOptions,
    ) -> Result<RowSet, EngineError> {
        self.pause();
        self.executed_plans.lock().unwrap().push(plan.to_string());
        Ok(self.one_row())
    }

    fn explain_plan(&self, plan: &str) -> Result<String, EngineError> {
        Ok(format!("explained {}", plan))
    }

    fn execute_statement(
        &self,
        statement: &LegacyStatement,
        _device: DeviceMode,
        _options: &EngineOptions,
    ) -> Result<RowSet, EngineError> {
        self.pause();
        self.executed_statements
            .lock()
            .unwrap()
            .push(statement.sql().to_string());
        Ok(self.one_row())
    }

    fn execute_arrow(
        &self,
        plan: &str,
        _device: DeviceMode,
        _device_id: usize,
        _limit: Option<i64>,
    ) -> Result<ArrowFrame, EngineError> {
        self.executed_plans.lock().unwrap().push(plan.to_string());
        let id = self.arrow_counter.fetch_add(1, Ordering::SeqCst);
        Ok(ArrowFrame {
            frame: DataFrame {
                sm_handle: format!("sm-{}", id),
                sm_size: 128,
                df_handle: format!("df-{}", id),
                df_size: 1024,
            },
            dev_ptr: *self.arrow_dev_ptr.lock().unwrap(),
        })
    }

    fn release_arrow(
        &self,
        frame: &DataFrame,
        _dev_ptr: Option<DevicePointer>,
        _device: DeviceMode,
        _device_id: usize,
    ) -> Result<(), EngineError> {
        self.released_handles
            .lock()
            .unwrap()
            .push(frame.df_handle.clone());
        Ok(())
    }

    fn interrupt(&self) {
        self.interrupts.fetch_add(1, Ordering::SeqCst);
    }

    fn gpus_present(&self) -> bool {
        self.gpu_count > 0
    }

    fn gpu_count(&self) -> usize {
        self.gpu_count
    }
}

/// Fragmenter double: records checkpoints and keeps an epoch map
pub struct RecordingFragmenter {
    pub checkpoints: Mutex<Vec<(i32, i32)>>,
    epochs: Mutex<HashMap<(i32, i32), Epoch>>,
}

impl RecordingFragmenter {
    pub fn new() -> Self {
        Self {
            checkpoints: Mutex::new(Vec::new()),
            epochs: Mutex::new(HashMap::new()),
        }
    }
}

impl Fragmenter for RecordingFragmenter {
    fn checkpoint(&self, db_id: i32, table_id: i32) -> Result<(), FragmenterError> {
        self.checkpoints.lock().unwrap().push((db_id, table_id));
        let mut epochs = self.epochs.lock().unwrap();
        *epochs.entry((db_id, table_id)).or_insert(0) += 1;
        Ok(())
    }

    fn insert_rows(
        &self,
        _db_id: i32,
        _table_id: i32,
        _rows: Vec<Row>,
    ) -> Result<(), FragmenterError> {
        Ok(())
    }

    fn epoch(&self, db_id: i32, table_id: i32) -> Result<Epoch, FragmenterError> {
        Ok(*self.epochs.lock().unwrap().get(&(db_id, table_id)).unwrap_or(&0))
    }

    fn set_epoch(&self, db_id: i32, table_id: i32, epoch: Epoch) -> Result<(), FragmenterError> {
        self.epochs.lock().unwrap().insert((db_id, table_id), epoch);
        Ok(())
    }
}

/// Importer double. In geo mode, `copy_from` captures a deferred import
/// instead of loading; `import_geo_table` creates the table and counts runs.
pub struct StubImporter {
    geo_mode: AtomicBool,
    pub geo_runs: AtomicUsize,
    fail_copy: AtomicBool,
}

impl StubImporter {
    pub fn new() -> Self {
        Self {
            geo_mode: AtomicBool::new(false),
            geo_runs: AtomicUsize::new(0),
            fail_copy: AtomicBool::new(false),
        }
    }

    pub fn enable_geo_mode(&self) {
        self.geo_mode.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_copy(&self) {
        self.fail_copy.store(true, Ordering::SeqCst);
    }
}

impl Importer for StubImporter {
    fn copy_from(
        &self,
        _catalog: &Arc<dyn DatabaseCatalog>,
        _table: Option<&TableRecord>,
        table_name: &str,
        source: &str,
    ) -> Result<CopyOutcome, ImporterError> {
        if self.fail_copy.swap(false, Ordering::SeqCst) {
            return Err(ImporterError::Failed(format!(
                "could not open {}",
                source
            )));
        }
        if self.geo_mode.load(Ordering::SeqCst) {
            return Ok(CopyOutcome {
                message: format!("Appending geo to table {}", table_name),
                report: ImportReport::default(),
                deferred: Some(DeferredImport {
                    table: table_name.to_string(),
                    source: source.to_string(),
                    params: Default::default(),
                }),
            });
        }
        Ok(CopyOutcome {
            message: "Loaded: 100 recs, Rejected: 2 recs".to_string(),
            report: ImportReport {
                rows_completed: 100,
                rows_rejected: 2,
            },
            deferred: None,
        })
    }

    fn import_geo_table(
        &self,
        catalog: &Arc<dyn DatabaseCatalog>,
        deferred: &DeferredImport,
    ) -> Result<ImportReport, ImporterError> {
        catalog
            .create_table(&deferred.table, Vec::new())
            .map_err(|e| ImporterError::Failed(e.to_string()))?;
        self.geo_runs.fetch_add(1, Ordering::SeqCst);
        Ok(ImportReport {
            rows_completed: 42,
            rows_rejected: 0,
        })
    }
}

/// A router wired against in-memory collaborator doubles
pub struct TestFixture {
    pub router: QueryRouter,
    pub system_catalog: Arc<MemoryCatalog>,
    pub database: Arc<dyn DatabaseCatalog>,
    pub planner: Arc<ScriptedPlanner>,
    pub engine: Arc<RecordingEngine>,
    pub fragmenter: Arc<RecordingFragmenter>,
    pub importer: Arc<StubImporter>,
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self::build(config, Arc::new(RecordingEngine::new()))
    }

    pub fn with_engine(config: ServerConfig, engine: RecordingEngine) -> Self {
        Self::build(config, Arc::new(engine))
    }

    fn build(config: ServerConfig, engine: Arc<RecordingEngine>) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let system_catalog = Arc::new(MemoryCatalog::new());
        system_catalog.add_user("admin", "adminpw", true);
        system_catalog.add_user("alice", "rightpw", false);
        let bob = system_catalog.add_user("bob", "bobpw", false);
        let d1 = system_catalog.add_database("d1", "alice");
        system_catalog.grant_access(&bob.name, d1.db_id);

        let database = system_catalog.open_database(&d1).unwrap();
        database
            .create_table(
                "t",
                vec![
                    ColumnRecord::new("x", "BIGINT", false),
                    ColumnRecord::new("y", "TEXT", true),
                ],
            )
            .unwrap();
        database
            .create_table("s", vec![ColumnRecord::new("x", "BIGINT", false)])
            .unwrap();

        let planner = Arc::new(ScriptedPlanner::new());
        let fragmenter = Arc::new(RecordingFragmenter::new());
        let importer = Arc::new(StubImporter::new());

        let router = QueryRouter::new(
            config,
            Collaborators {
                system_catalog: system_catalog.clone(),
                planner: planner.clone(),
                engine: engine.clone(),
                fragmenter: fragmenter.clone(),
                importer: importer.clone(),
                leaf_aggregator: None,
                render: None,
                cluster_coordinator: None,
            },
        );

        Self {
            router,
            system_catalog,
            database,
            planner,
            engine,
            fragmenter,
            importer,
        }
    }

    pub fn connect_alice(&self) -> String {
        self.router.connect("alice", "rightpw", "d1").unwrap()
    }

    pub fn table_key(&self, name: &str) -> (i32, i32) {
        let record = self.database.table(name).unwrap();
        (record.db_id, record.table_id)
    }
}
