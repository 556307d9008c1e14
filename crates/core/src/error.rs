//! 에러 타입 -- 도메인별 에러 정의

/// logcentral 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogCentralError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
///
/// 각 컴포넌트 크레이트의 상세 에러는 문자열로 축약되어 이 타입으로 전달됩니다.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 파일 병합 실패
    #[error("merge failed: {0}")]
    Merge(String),

    /// 수명주기 정책 생성 실패
    #[error("lifecycle policy failed: {0}")]
    Lifecycle(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_top_level() {
        let err: LogCentralError = ConfigError::InvalidValue {
            field: "coalescer.text_max_size".to_owned(),
            reason: "must be greater than 0".to_owned(),
        }
        .into();
        assert!(matches!(err, LogCentralError::Config(_)));
        assert!(err.to_string().contains("text_max_size"));
    }

    #[test]
    fn pipeline_error_display() {
        let err = PipelineError::Merge("decode error in a.gz".to_owned());
        assert_eq!(err.to_string(), "merge failed: decode error in a.gz");
    }

    #[test]
    fn io_error_converts_to_top_level() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LogCentralError = io.into();
        assert!(matches!(err, LogCentralError::Io(_)));
    }
}
