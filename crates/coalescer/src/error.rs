//! 병합기 에러 타입
//!
//! [`CoalescerError`]는 병합 과정에서 발생하는 모든 에러를 표현합니다.
//! 어떤 에러든 진행 중인 병합을 즉시 중단시키며, 부분 재시도나 건너뛰기는 없습니다.
//! `From<CoalescerError> for LogCentralError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use logcentral_core::error::{LogCentralError, PipelineError};

/// 병합기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum CoalescerError {
    /// 잘못된 파라미터 (0 이하의 크기 상한, 알 수 없는 형식 등)
    #[error("invalid parameter: {field}: {reason}")]
    InvalidParameter {
        /// 파라미터 이름
        field: String,
        /// 거부 사유
        reason: String,
    },

    /// 입력 blob 읽기/디코드 실패 (읽을 수 없는 blob, 손상된 gzip, 잘못된 UTF-8, 손상된 Parquet)
    #[error("decode error: {format} blob '{blob}': {reason}")]
    Decode {
        /// 입력 blob 이름
        blob: String,
        /// 디코드 형식
        format: String,
        /// 실패 사유
        reason: String,
    },

    /// 청크의 기준 스키마로 테이블을 맞출 수 없음
    #[error("schema mismatch in '{blob}': {reason}")]
    SchemaMismatch {
        /// 문제가 된 입력 blob 이름
        blob: String,
        /// 불일치 내용
        reason: String,
    },

    /// 출력 blob 쓰기 실패
    #[error("sink error: {name}: {source}")]
    Sink {
        /// 출력 blob 이름
        name: String,
        /// 원인 I/O 에러
        source: std::io::Error,
    },

    /// 입력 목록 조회 등 기타 I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoalescerError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(blob: &str, format: &str, reason: impl ToString) -> Self {
        Self::Decode {
            blob: blob.to_owned(),
            format: format.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn sink(name: &str, source: std::io::Error) -> Self {
        Self::Sink {
            name: name.to_owned(),
            source,
        }
    }
}

impl From<CoalescerError> for LogCentralError {
    fn from(err: CoalescerError) -> Self {
        LogCentralError::Pipeline(PipelineError::Merge(err.to_string()))
    }
}
