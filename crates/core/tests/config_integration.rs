//! logcentral.toml 통합 설정 테스트
//!
//! - logcentral.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use logcentral_core::config::LogCentralConfig;
use logcentral_core::error::{ConfigError, LogCentralError};
use logcentral_core::types::ThresholdValue;

// =============================================================================
// logcentral.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../logcentral.toml.example");
    let config = LogCentralConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../logcentral.toml.example");
    let config = LogCentralConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../logcentral.toml.example");
    let from_file = LogCentralConfig::parse(content).expect("should parse");
    let from_code = LogCentralConfig::default();

    // 모든 기본값이 코드 Default 구현과 일치하는지 확인
    assert_eq!(from_file.general.log_level, from_code.general.log_level);
    assert_eq!(from_file.general.log_format, from_code.general.log_format);

    assert_eq!(
        from_file.coalescer.table_max_size,
        from_code.coalescer.table_max_size
    );
    assert_eq!(
        from_file.coalescer.text_max_size,
        from_code.coalescer.text_max_size
    );
    assert_eq!(
        from_file.coalescer.gzip_max_size,
        from_code.coalescer.gzip_max_size
    );
    assert_eq!(
        from_file.coalescer.output_prefix,
        from_code.coalescer.output_prefix
    );

    assert_eq!(from_file.ism.warm_age, from_code.ism.warm_age);
    assert_eq!(from_file.ism.cold_age, from_code.ism.cold_age);
    assert_eq!(from_file.ism.retain_age, from_code.ism.retain_age);
    assert_eq!(from_file.ism.rollover_age, from_code.ism.rollover_age);
    assert_eq!(from_file.ism.rollover_size, from_code.ism.rollover_size);
    assert_eq!(from_file.ism.index_pattern, from_code.ism.index_pattern);
    assert_eq!(from_file.ism.priority, from_code.ism.priority);
    assert_eq!(from_file.ism.timestamp_field, from_code.ism.timestamp_field);
}

// =============================================================================
// 부분 설정 로딩 테스트
// =============================================================================

#[test]
fn partial_config_general_only() {
    let toml = r#"
[general]
log_level = "debug"
log_format = "pretty"
"#;
    let config = LogCentralConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.general.log_format, "pretty");
    // 나머지 섹션은 기본값
    assert_eq!(config.coalescer.text_max_size, 20 * 1024 * 1024);
    assert_eq!(config.ism.retain_age, ThresholdValue::Days(180));
}

#[test]
fn partial_config_ism_only() {
    let toml = r#"
[ism]
warm_age = 1
cold_age = 2
retain_age = 3
"#;
    let config = LogCentralConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.ism.warm_age, ThresholdValue::Days(1));
    assert_eq!(config.ism.cold_age, ThresholdValue::Days(2));
    assert_eq!(config.ism.retain_age, ThresholdValue::Days(3));
    // general은 기본값
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn zero_size_bound_in_file_fails_validation() {
    let toml = r#"
[coalescer]
table_max_size = 0
"#;
    let config = LogCentralConfig::parse(toml).expect("should parse");
    let err = config.validate().expect_err("zero bound must be rejected");
    assert!(matches!(
        err,
        LogCentralError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn wrong_type_fails_to_parse() {
    let toml = r#"
[coalescer]
text_max_size = "big"
"#;
    let err = LogCentralConfig::parse(toml).expect_err("string size must fail");
    assert!(matches!(
        err,
        LogCentralError::Config(ConfigError::ParseFailed { .. })
    ));
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
async fn load_from_file_applies_values() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("logcentral.toml");
    std::fs::write(&path, "[ism]\nwarm_age = \"12h\"\n").expect("should write config");

    let config = LogCentralConfig::from_file(&path)
        .await
        .expect("should load");
    assert_eq!(config.ism.warm_age, ThresholdValue::from("12h"));
}

#[tokio::test]
async fn load_empty_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "").expect("should write config");

    let config = LogCentralConfig::from_file(&path)
        .await
        .expect("empty file should load");
    assert_eq!(config.general.log_level, "info");
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[general]
log_level = "debug"
"#;
    let original = std::env::var("LOGCENTRAL_GENERAL_LOG_LEVEL").ok();
    // SAFETY: serial 테스트로 환경변수 동시 접근을 방지합니다.
    unsafe {
        std::env::set_var("LOGCENTRAL_GENERAL_LOG_LEVEL", "error");
    }

    let mut config = LogCentralConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    assert_eq!(config.general.log_level, "error");

    // SAFETY: serial 테스트로 환경변수 동시 접근을 방지합니다.
    unsafe {
        match original {
            Some(val) => std::env::set_var("LOGCENTRAL_GENERAL_LOG_LEVEL", val),
            None => std::env::remove_var("LOGCENTRAL_GENERAL_LOG_LEVEL"),
        }
    }
}

#[test]
#[serial_test::serial]
fn env_override_threshold_fields() {
    let original = std::env::var("LOGCENTRAL_ISM_RETAIN_AGE").ok();
    // SAFETY: serial 테스트로 환경변수 동시 접근을 방지합니다.
    unsafe {
        std::env::set_var("LOGCENTRAL_ISM_RETAIN_AGE", "400gb");
    }

    let mut config = LogCentralConfig::default();
    config.apply_env_overrides();
    assert_eq!(config.ism.retain_age, ThresholdValue::from("400gb"));

    // SAFETY: serial 테스트로 환경변수 동시 접근을 방지합니다.
    unsafe {
        match original {
            Some(val) => std::env::set_var("LOGCENTRAL_ISM_RETAIN_AGE", val),
            None => std::env::remove_var("LOGCENTRAL_ISM_RETAIN_AGE"),
        }
    }
}

#[test]
#[serial_test::serial]
fn env_override_size_bound() {
    let original = std::env::var("LOGCENTRAL_COALESCER_TEXT_MAX_SIZE").ok();
    // SAFETY: serial 테스트로 환경변수 동시 접근을 방지합니다.
    unsafe {
        std::env::set_var("LOGCENTRAL_COALESCER_TEXT_MAX_SIZE", "4096");
    }

    let mut config = LogCentralConfig::default();
    config.apply_env_overrides();
    assert_eq!(config.coalescer.text_max_size, 4096);

    // SAFETY: serial 테스트로 환경변수 동시 접근을 방지합니다.
    unsafe {
        match original {
            Some(val) => std::env::set_var("LOGCENTRAL_COALESCER_TEXT_MAX_SIZE", val),
            None => std::env::remove_var("LOGCENTRAL_COALESCER_TEXT_MAX_SIZE"),
        }
    }
}
