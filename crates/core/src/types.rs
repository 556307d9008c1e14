//! 공통 도메인 타입

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// ISM 임계값 입력
///
/// 설정 파일과 CLI에서 정수(일 단위) 또는 미리 포맷된 문자열
/// (`"30d"`, `"12h"`, `"200gb"`)로 입력됩니다. 해석과 검증은
/// `logcentral-ism` 크레이트가 담당하며, 여기서는 원본 형태만 보존합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdValue {
    /// 일 단위 정수
    Days(u64),
    /// 단위가 포함된 문자열
    Text(String),
}

impl Default for ThresholdValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for ThresholdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl FromStr for ThresholdValue {
    type Err = std::convert::Infallible;

    /// 숫자로만 이루어진 문자열은 일 단위로, 나머지는 문자열 그대로 보존합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<u64>() {
            Ok(days) => Ok(Self::Days(days)),
            Err(_) => Ok(Self::Text(trimmed.to_owned())),
        }
    }
}

impl From<u64> for ThresholdValue {
    fn from(days: u64) -> Self {
        Self::Days(days)
    }
}

impl From<&str> for ThresholdValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for ThresholdValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
