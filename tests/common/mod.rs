use chrono::{DateTime, TimeZone, Utc};
use railtrail::session::{ManualClock, SessionManager};
use railtrail::storage::SledStore;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn create_temp_store() -> (SledStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = SledStore::open(tmp.path().join("store")).expect("failed to open sled store");
    (store, tmp)
}

#[allow(dead_code)]
pub fn create_temp_manager() -> (SessionManager<SledStore, ManualClock>, TempDir) {
    let (store, tmp) = create_temp_store();
    let manager = SessionManager::with_clock(store, ManualClock::new(start_time()));
    (manager, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
