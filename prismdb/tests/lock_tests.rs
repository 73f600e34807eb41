//! Lock protocol integration tests
//!
//! The protocol's observable guarantees: acquisition order per category,
//! full concurrency for pure readers, no deadlock between readers and
//! writers of the same table, and surfaced (never retried) conflicts.

mod testutils;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use prismdb::locks::{
    LockCoordinator, LockMode, StatementCategory, StatementLocks, TableKey, TableLockKind,
};
use prismdb::results::ExecuteOptions;
use prismdb::{ServerConfig, ServerError};
use testutils::{RecordingEngine, TestFixture};

#[test]
fn update_acquires_checkpoint_before_update_delete() {
    let coordinator = LockCoordinator::new(None);
    let locks = StatementLocks::for_legacy(
        &coordinator,
        StatementCategory::UpdateDelete,
        Some(TableKey::new(1, 1)),
        &BTreeSet::new(),
    )
    .unwrap();
    let trace = locks.acquisition_trace();
    assert!(trace[0].contains("CheckpointLock"));
    assert!(trace[1].contains("UpdateDeleteLock"));
}

#[test]
fn insert_values_gates_on_the_executor_outer_lock() {
    let coordinator = LockCoordinator::new(None);
    let locks = StatementLocks::for_legacy(
        &coordinator,
        StatementCategory::InsertValues,
        Some(TableKey::new(1, 1)),
        &BTreeSet::new(),
    )
    .unwrap();
    assert_eq!(
        locks.acquisition_trace(),
        &[
            "write CheckpointLock (1, 1)".to_string(),
            "write ExecutorOuterLock".to_string(),
        ]
    );
}

#[test]
fn planner_resolved_writes_follow_checkpoint_outer_upddel() {
    let coordinator = LockCoordinator::new(None);
    let mut tables = BTreeMap::new();
    tables.insert(TableKey::new(1, 1), true);
    tables.insert(TableKey::new(1, 2), false);
    let locks = StatementLocks::for_planner_tables(&coordinator, &tables).unwrap();
    assert_eq!(
        locks.acquisition_trace(),
        &[
            "write CheckpointLock (1, 1)".to_string(),
            "read ExecutorOuterLock".to_string(),
            "write UpdateDeleteLock (1, 1)".to_string(),
            "read UpdateDeleteLock (1, 2)".to_string(),
        ]
    );
}

#[test]
#[serial_test::serial]
fn concurrent_select_and_update_complete_without_deadlock() {
    let engine = RecordingEngine::new();
    engine.set_delay(Duration::from_millis(5));
    let fixture = Arc::new(TestFixture::with_engine(ServerConfig::default(), engine));
    let token = fixture.connect_alice();

    let mut handles = Vec::new();
    for _ in 0..4 {
        {
            let fixture = fixture.clone();
            let token = token.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..5 {
                    fixture
                        .router
                        .execute(&token, "SELECT * FROM t", &ExecuteOptions::default())
                        .unwrap();
                }
            }));
        }
        let fixture = fixture.clone();
        let token = token.clone();
        handles.push(std::thread::spawn(move || {
            for _ in 0..5 {
                fixture
                    .router
                    .execute(&token, "UPDATE t SET x = 1", &ExecuteOptions::default())
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    // every statement reached the engine
    assert_eq!(fixture.engine.executed_plans.lock().unwrap().len(), 20);
    assert_eq!(fixture.engine.executed_statements.lock().unwrap().len(), 20);
}

#[test]
#[serial_test::serial]
fn readers_run_fully_concurrently() {
    let fixture = Arc::new(TestFixture::new());
    let token = fixture.connect_alice();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let fixture = fixture.clone();
        let token = token.clone();
        handles.push(std::thread::spawn(move || {
            fixture
                .router
                .execute(&token, "SELECT * FROM t", &ExecuteOptions::default())
                .unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.join().unwrap().row_set.row_count(), 1);
    }
}

#[test]
fn held_checkpoint_lock_surfaces_as_conflict_under_timeout() {
    let fixture = TestFixture::with_config(ServerConfig {
        lock_timeout: Some(Duration::from_millis(20)),
        ..ServerConfig::default()
    });
    let token = fixture.connect_alice();
    let (db_id, table_id) = fixture.table_key("t");

    let held = fixture
        .router
        .lock_coordinator()
        .acquire_table(
            TableKey::new(db_id, table_id),
            TableLockKind::Checkpoint,
            LockMode::Exclusive,
        )
        .unwrap();

    let result = fixture
        .router
        .execute(&token, "DELETE FROM t WHERE x = 1", &ExecuteOptions::default());
    assert!(matches!(result, Err(ServerError::LockConflict(_))));

    drop(held);
    fixture
        .router
        .execute(&token, "DELETE FROM t WHERE x = 1", &ExecuteOptions::default())
        .unwrap();
}

#[test]
fn failed_acquisition_releases_the_partial_lock_set() {
    let fixture = TestFixture::with_config(ServerConfig {
        lock_timeout: Some(Duration::from_millis(20)),
        ..ServerConfig::default()
    });
    let token = fixture.connect_alice();
    let (db_id, t_id) = fixture.table_key("t");
    let key = TableKey::new(db_id, t_id);

    // block the second lock of the DELETE sequence
    let held = fixture
        .router
        .lock_coordinator()
        .acquire_table(key, TableLockKind::UpdateDelete, LockMode::Exclusive)
        .unwrap();
    let result = fixture
        .router
        .execute(&token, "DELETE FROM t", &ExecuteOptions::default());
    assert!(matches!(result, Err(ServerError::LockConflict(_))));
    drop(held);

    // the failed request must not still hold the checkpoint lock it took first
    fixture
        .router
        .lock_coordinator()
        .acquire_table(key, TableLockKind::Checkpoint, LockMode::Exclusive)
        .unwrap();
}
