use kindieval_core::{logging_status, ConfigError, Tracker, TrackerError};

#[test]
fn config_file_drives_logging_storage_and_provider() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let db_path = dir.path().join("kindieval.db");
    let config_path = dir.path().join("kindieval.json");
    let config = serde_json::json!({
        "logging": { "level": "info", "log_dir": log_dir.to_str().unwrap() },
        "storage": { "db_path": db_path.to_str().unwrap() },
        "summary": { "enabled": true, "api_key": "test-key" }
    });
    std::fs::write(&config_path, config.to_string()).unwrap();

    let tracker = Tracker::from_config_file(&config_path).unwrap();
    assert_eq!(tracker.summary_provider_name(), "gemini");
    let (level, active_dir) = logging_status().expect("logging should be active");
    assert_eq!(level, "info");
    assert_eq!(active_dir, log_dir);
    assert!(log_dir.is_dir());

    assert_eq!(tracker.seed_reference_data().unwrap().targets, 8);
    drop(tracker);
    assert!(db_path.is_file());

    let reopened = Tracker::from_config_file(&config_path).unwrap();
    assert_eq!(reopened.catalog().unwrap().len(), 8);
    assert_eq!(reopened.seed_reference_data().unwrap().targets, 0);
}

#[test]
fn missing_config_file_opens_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = Tracker::from_config_file(dir.path().join("absent.json")).unwrap();
    assert_eq!(tracker.summary_provider_name(), "disabled");
    assert!(tracker.catalog().unwrap().is_empty());
}

#[test]
fn malformed_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"summary\": ").unwrap();

    let err = Tracker::from_config_file(&path).err().unwrap();
    assert!(matches!(err, TrackerError::Config(ConfigError::Parse { .. })));
}
