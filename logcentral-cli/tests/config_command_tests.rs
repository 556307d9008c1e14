//! Integration tests for `logcentral config`.
//!
//! Exercises config loading and validation against real TOML files.

use std::fs;

use logcentral_core::config::LogCentralConfig;
use tempfile::TempDir;

#[tokio::test]
async fn test_config_validate_example_file() {
    // Given: the example config shipped with the repository
    let example = concat!(env!("CARGO_MANIFEST_DIR"), "/../logcentral.toml.example");

    // When: loading it
    let result = LogCentralConfig::load(example).await;

    // Then: it should be valid and match the built-in defaults
    let config = result.expect("example config should load");
    let defaults = LogCentralConfig::default();
    assert_eq!(config.coalescer.text_max_size, defaults.coalescer.text_max_size);
    assert_eq!(config.ism.retain_age, defaults.ism.retain_age);
    assert_eq!(config.ism.index_pattern, defaults.ism.index_pattern);
}

#[tokio::test]
async fn test_config_validate_malformed_toml() {
    // Given: a malformed TOML file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[general\nlog_level = \"info\"\n").expect("should write config");

    // When: loading the config
    let result = LogCentralConfig::load(&config_path).await;

    // Then: should fail
    assert!(result.is_err(), "malformed TOML should fail to load");
}

#[tokio::test]
async fn test_config_validate_missing_file() {
    // Given: a nonexistent path
    let config_path = std::path::PathBuf::from("/nonexistent/logcentral.toml");

    // When: loading the config
    let result = LogCentralConfig::load(&config_path).await;

    // Then: should fail with the path in the message
    let err = result.expect_err("missing file should fail to load");
    assert!(err.to_string().contains("/nonexistent/logcentral.toml"));
}

#[tokio::test]
async fn test_config_validate_empty_file_uses_defaults() {
    // Given: an empty config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("empty.toml");
    fs::write(&config_path, "").expect("should write empty file");

    // When: loading the config
    let config = LogCentralConfig::load(&config_path)
        .await
        .expect("empty config should load with defaults");

    // Then: defaults apply everywhere
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.coalescer.table_max_size, 1024 * 1024);
    assert_eq!(config.ism.rollover_size.to_string(), "30gb");
}

#[tokio::test]
async fn test_config_validate_zero_max_size_rejected() {
    // Given: a zero size bound
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logcentral.toml");
    fs::write(&config_path, "[coalescer]\ngzip_max_size = 0\n").expect("should write config");

    // When: loading the config
    let result = LogCentralConfig::load(&config_path).await;

    // Then: validation names the field
    let err = result.expect_err("zero max size should be rejected");
    assert!(err.to_string().contains("coalescer.gzip_max_size"));
}

#[tokio::test]
async fn test_config_unknown_log_format_rejected() {
    // Given: an unsupported log format
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logcentral.toml");
    fs::write(&config_path, "[general]\nlog_format = \"xml\"\n").expect("should write config");

    // When: loading the config
    let result = LogCentralConfig::load(&config_path).await;

    // Then: should fail
    assert!(result.is_err(), "unknown log format should be rejected");
}

#[tokio::test]
async fn test_config_mixed_threshold_types() {
    // Given: integer and string thresholds side by side
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logcentral.toml");
    fs::write(
        &config_path,
        r#"
[ism]
warm_age = 7
cold_age = "200gb"
retain_age = "0"
"#,
    )
    .expect("should write config");

    // When: loading the config
    let config = LogCentralConfig::load(&config_path)
        .await
        .expect("mixed thresholds should load");

    // Then: raw values are preserved for the policy builder
    assert_eq!(config.ism.warm_age.to_string(), "7");
    assert_eq!(config.ism.cold_age.to_string(), "200gb");
    assert_eq!(config.ism.retain_age.to_string(), "0");
}
