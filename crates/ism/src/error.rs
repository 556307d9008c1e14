//! ISM 에러 타입
//!
//! [`IsmError`]는 임계값 해석과 상태 전환 과정의 에러를 표현합니다.
//! 모든 에러는 즉시 실패하며, `From<IsmError> for LogCentralError` 변환으로
//! 상위 레이어에 `?` 연산자로 전파됩니다.

use logcentral_core::error::{LogCentralError, PipelineError};

/// ISM 도메인 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IsmError {
    /// 해석할 수 없는 임계값
    #[error("invalid parameter: {field}: {reason}")]
    InvalidParameter {
        /// 파라미터 이름 (`warm_age`, `rollover_size` 등)
        field: String,
        /// 거부 사유
        reason: String,
    },

    /// 종료 상태에서 전환 시도
    #[error("invalid state transition: '{state}' is terminal")]
    InvalidStateTransition {
        /// 현재 상태 이름
        state: String,
    },
}

impl IsmError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }
}

impl From<IsmError> for LogCentralError {
    fn from(err: IsmError) -> Self {
        LogCentralError::Pipeline(PipelineError::Lifecycle(err.to_string()))
    }
}
