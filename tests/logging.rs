use std::{fs, thread::sleep, time::Duration};

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn writes_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dashboard.log");

    exec_dashboard::logging::init(true, Some(path.clone()));
    tracing::info!("layout committed");

    sleep(Duration::from_millis(100));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("layout committed"));

    // A second init keeps the installed subscriber and does not panic.
    exec_dashboard::logging::init(false, None);
}
