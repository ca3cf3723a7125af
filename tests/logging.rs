use std::fs;

use log::{LevelFilter, error, info, warn};
use purchase_fx::config::AppConfig;
use purchase_fx::logging;
use tempfile::tempdir;

#[test]
fn writes_every_level_to_configured_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.log");
    let config = AppConfig {
        log_file: Some(path.display().to_string()),
        log_level: "info".to_string(),
        ..AppConfig::default()
    };

    logging::init(&config).unwrap();

    info!("Test info message");
    warn!("Test warning message");
    error!("Test error message");
    log::logger().flush();

    let output = fs::read_to_string(&path).unwrap();
    assert!(output.contains("Test info message"));
    assert!(output.contains("Test warning message"));
    assert!(output.contains("Test error message"));
}

#[test]
fn unwritable_log_file_fails_bootstrap() {
    let dir = tempdir().unwrap();
    let config = AppConfig {
        log_file: Some(dir.path().join("missing").join("app.log").display().to_string()),
        ..AppConfig::default()
    };

    let Err(err) = logging::builder(&config) else {
        panic!("log file in a missing directory was opened");
    };
    assert!(err.to_string().starts_with("failed to open log file"));
}

#[test]
fn level_comes_from_config_not_environment() {
    // SAFETY: no test in this binary reads RUST_LOG.
    unsafe { std::env::set_var("RUST_LOG", "off") };
    let config = AppConfig {
        log_level: "warn".to_string(),
        ..AppConfig::default()
    };

    let logger = logging::builder(&config).unwrap().build();
    assert_eq!(logger.filter(), LevelFilter::Warn);
}
