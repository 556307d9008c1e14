//! 설정 관리 -- logcentral.toml 파싱 및 런타임 설정
//!
//! [`LogCentralConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGCENTRAL_ISM_RETAIN_AGE=30d` 형식)
//! 3. 설정 파일 (`logcentral.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logcentral_core::error::LogCentralError> {
//! use logcentral_core::config::LogCentralConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogCentralConfig::load("logcentral.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogCentralConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogCentralError};
use crate::types::ThresholdValue;

/// 1 MiB
pub const MIB: u64 = 1024 * 1024;

/// logcentral 통합 설정
///
/// `logcentral.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogCentralConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 파일 병합기 설정
    #[serde(default)]
    pub coalescer: CoalescerConfig,
    /// 인덱스 수명주기(ISM) 설정
    #[serde(default)]
    pub ism: IsmConfig,
}

impl LogCentralConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogCentralError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogCentralError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogCentralError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogCentralError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogCentralError> {
        toml::from_str(toml_str).map_err(|e| {
            LogCentralError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGCENTRAL_{SECTION}_{FIELD}`
    /// 예: `LOGCENTRAL_COALESCER_TEXT_MAX_SIZE=10485760`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGCENTRAL_GENERAL_LOG_LEVEL");
        override_string(
            &mut self.general.log_format,
            "LOGCENTRAL_GENERAL_LOG_FORMAT",
        );

        // Coalescer
        override_u64(
            &mut self.coalescer.table_max_size,
            "LOGCENTRAL_COALESCER_TABLE_MAX_SIZE",
        );
        override_u64(
            &mut self.coalescer.text_max_size,
            "LOGCENTRAL_COALESCER_TEXT_MAX_SIZE",
        );
        override_u64(
            &mut self.coalescer.gzip_max_size,
            "LOGCENTRAL_COALESCER_GZIP_MAX_SIZE",
        );
        override_string(
            &mut self.coalescer.output_prefix,
            "LOGCENTRAL_COALESCER_OUTPUT_PREFIX",
        );
        override_string(
            &mut self.coalescer.input_extension,
            "LOGCENTRAL_COALESCER_INPUT_EXTENSION",
        );

        // ISM
        override_threshold(&mut self.ism.warm_age, "LOGCENTRAL_ISM_WARM_AGE");
        override_threshold(&mut self.ism.cold_age, "LOGCENTRAL_ISM_COLD_AGE");
        override_threshold(&mut self.ism.retain_age, "LOGCENTRAL_ISM_RETAIN_AGE");
        override_threshold(&mut self.ism.rollover_age, "LOGCENTRAL_ISM_ROLLOVER_AGE");
        override_threshold(
            &mut self.ism.rollover_size,
            "LOGCENTRAL_ISM_ROLLOVER_SIZE",
        );
        override_string(&mut self.ism.index_pattern, "LOGCENTRAL_ISM_INDEX_PATTERN");
        override_u32(&mut self.ism.priority, "LOGCENTRAL_ISM_PRIORITY");
        override_string(
            &mut self.ism.timestamp_field,
            "LOGCENTRAL_ISM_TIMESTAMP_FIELD",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 임계값 문자열의 형식 검증은 `logcentral-ism`이 정책 생성 시점에 수행합니다.
    pub fn validate(&self) -> Result<(), LogCentralError> {
        self.general.validate()?;

        // 병합 크기 상한 검증
        let size_bounds = [
            ("coalescer.table_max_size", self.coalescer.table_max_size),
            ("coalescer.text_max_size", self.coalescer.text_max_size),
            ("coalescer.gzip_max_size", self.coalescer.gzip_max_size),
        ];
        for (field, value) in size_bounds {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: "must be greater than 0".to_owned(),
                }
                .into());
            }
        }

        if self.coalescer.output_prefix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "coalescer.output_prefix".to_owned(),
                reason: "must not contain path separators".to_owned(),
            }
            .into());
        }

        if self.ism.index_pattern.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ism.index_pattern".to_owned(),
                reason: "index pattern must not be empty".to_owned(),
            }
            .into());
        }

        if self.ism.timestamp_field.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ism.timestamp_field".to_owned(),
                reason: "timestamp field must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl GeneralConfig {
    /// 허용되는 로그 레벨
    pub const LOG_LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];
    /// 허용되는 로그 형식
    pub const LOG_FORMATS: [&'static str; 2] = ["json", "pretty"];

    /// 로그 레벨과 형식을 검증합니다.
    ///
    /// CLI `--log-level` 오버라이드도 같은 규칙으로 검증합니다.
    pub fn validate(&self) -> Result<(), LogCentralError> {
        if !Self::LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", Self::LOG_LEVELS.join(", ")),
            }
            .into());
        }

        if !Self::LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", Self::LOG_FORMATS.join(", ")),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 파일 병합기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoalescerConfig {
    /// 컬럼형(Parquet) 청크 크기 상한 (인메모리 테이블 바이트)
    pub table_max_size: u64,
    /// 텍스트 청크 크기 상한 (바이트)
    pub text_max_size: u64,
    /// gzip 청크 크기 상한 (압축 해제 후 바이트)
    pub gzip_max_size: u64,
    /// 출력 파일 이름 접두어
    pub output_prefix: String,
    /// 입력 파일 확장자 필터 (빈 문자열이면 전체)
    pub input_extension: String,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            table_max_size: MIB,
            text_max_size: 20 * MIB,
            gzip_max_size: 20 * MIB,
            output_prefix: String::new(),
            input_extension: String::new(),
        }
    }
}

/// 인덱스 수명주기(ISM) 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsmConfig {
    /// hot -> warm 전환 임계값
    pub warm_age: ThresholdValue,
    /// warm -> cold 전환 임계값
    pub cold_age: ThresholdValue,
    /// 삭제 임계값
    pub retain_age: ThresholdValue,
    /// 롤오버 인덱스 나이 조건
    pub rollover_age: ThresholdValue,
    /// 롤오버 프라이머리 샤드 크기 조건
    pub rollover_size: ThresholdValue,
    /// 정책이 적용될 인덱스 패턴
    pub index_pattern: String,
    /// ISM 템플릿 우선순위
    pub priority: u32,
    /// cold 마이그레이션 시 사용할 타임스탬프 필드
    pub timestamp_field: String,
    /// 정책 설명
    pub description: String,
}

impl Default for IsmConfig {
    fn default() -> Self {
        Self {
            warm_age: ThresholdValue::default(),
            cold_age: ThresholdValue::default(),
            retain_age: ThresholdValue::Days(180),
            rollover_age: ThresholdValue::default(),
            rollover_size: ThresholdValue::Text("30gb".to_owned()),
            index_pattern: "logcentral-*".to_owned(),
            priority: 100,
            timestamp_field: "@timestamp".to_owned(),
            description: "logcentral index lifecycle policy".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_threshold(target: &mut ThresholdValue, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        // FromStr은 Infallible
        if let Ok(parsed) = val.parse::<ThresholdValue>() {
            *target = parsed;
        }
    }
}
