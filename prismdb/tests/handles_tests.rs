//! Zero-copy data frame export and release tests

mod testutils;

use prismdb::{DeviceMode, ServerConfig, ServerError};
use testutils::{RecordingEngine, TestFixture};

fn gpu_fixture() -> TestFixture {
    let engine = RecordingEngine::with_gpus(1);
    engine.set_arrow_dev_ptr(0x7f00_0042);
    TestFixture::with_engine(
        ServerConfig {
            device_mode: DeviceMode::Gpu,
            ..ServerConfig::default()
        },
        engine,
    )
}

#[test]
fn export_registers_the_device_pointer_until_release() {
    let fixture = gpu_fixture();
    let token = fixture.connect_alice();

    let frame = fixture
        .router
        .execute_dataframe(&token, "SELECT * FROM t", DeviceMode::Gpu, 0, None)
        .unwrap();
    assert!(frame.sm_size > 0);
    assert_eq!(fixture.router.handle_registry().live_count(), 1);

    fixture
        .router
        .release_dataframe(&token, &frame, DeviceMode::Gpu, 0)
        .unwrap();
    assert_eq!(fixture.router.handle_registry().live_count(), 0);
    assert_eq!(
        fixture.engine.released_handles.lock().unwrap().as_slice(),
        &[frame.df_handle.clone()]
    );
}

#[test]
fn double_release_is_handle_not_found() {
    let fixture = gpu_fixture();
    let token = fixture.connect_alice();

    let frame = fixture
        .router
        .execute_dataframe(&token, "SELECT * FROM t", DeviceMode::Gpu, 0, None)
        .unwrap();
    fixture
        .router
        .release_dataframe(&token, &frame, DeviceMode::Gpu, 0)
        .unwrap();
    assert!(matches!(
        fixture
            .router
            .release_dataframe(&token, &frame, DeviceMode::Gpu, 0),
        Err(ServerError::HandleNotFound(_))
    ));
}

#[test]
fn gpu_export_requires_a_gpu_session() {
    // default config: CPU session mode
    let fixture = TestFixture::with_engine(ServerConfig::default(), RecordingEngine::with_gpus(1));
    let token = fixture.connect_alice();
    assert!(matches!(
        fixture
            .router
            .execute_dataframe(&token, "SELECT * FROM t", DeviceMode::Gpu, 0, None),
        Err(ServerError::Execution(_))
    ));
}

#[test]
fn gpu_export_validates_device_id() {
    let fixture = gpu_fixture();
    let token = fixture.connect_alice();
    assert!(matches!(
        fixture
            .router
            .execute_dataframe(&token, "SELECT * FROM t", DeviceMode::Gpu, 5, None),
        Err(ServerError::InvalidRequest(_))
    ));
}

#[test]
fn dataframe_interface_rejects_ddl_and_dml() {
    let fixture = gpu_fixture();
    let token = fixture.connect_alice();
    for sql in ["DROP TABLE t", "INSERT INTO t VALUES (1)", "desc t"] {
        assert!(matches!(
            fixture
                .router
                .execute_dataframe(&token, sql, DeviceMode::Gpu, 0, None),
            Err(ServerError::InvalidRequest(_))
        ));
    }
}

#[test]
fn cpu_exports_skip_device_pointer_bookkeeping() {
    let fixture = TestFixture::new();
    let token = fixture.connect_alice();

    let frame = fixture
        .router
        .execute_dataframe(&token, "SELECT * FROM t", DeviceMode::Cpu, 0, None)
        .unwrap();
    assert_eq!(fixture.router.handle_registry().live_count(), 0);
    fixture
        .router
        .release_dataframe(&token, &frame, DeviceMode::Cpu, 0)
        .unwrap();
}
