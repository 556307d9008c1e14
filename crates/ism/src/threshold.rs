//! 임계값 해석
//!
//! 입력은 정수(일 단위) 또는 `<양의 정수><단위>` 문자열입니다.
//!
//! | 입력 | 결과 |
//! |------|------|
//! | `0`, `""`, `"0"`, `"0d"` | [`Threshold::Unset`] |
//! | `7`, `"7"` | `Age("7d")` |
//! | `"12h"` (`d`, `h`, `m`, `s`, `ms`) | `Age("12h")` -> `min_index_age` |
//! | `"200gb"` (`b`, `kb`, `mb`, `gb`, `tb`, `pb`) | `Size("200gb")` -> `min_primary_shard_size` |
//! | 그 외 (`"abc"`, `"-1"`, `"5x"`) | [`IsmError::InvalidParameter`] |
//!
//! 단위는 대소문자를 구분하지 않으며 소문자로 정규화됩니다.

use logcentral_core::types::ThresholdValue;

use crate::error::IsmError;
use crate::state::Conditions;

const AGE_UNITS: [&str; 5] = ["d", "h", "m", "s", "ms"];
const SIZE_UNITS: [&str; 6] = ["b", "kb", "mb", "gb", "tb", "pb"];

/// 해석된 임계값
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Threshold {
    /// 설정 안 됨
    #[default]
    Unset,
    /// 인덱스 나이 (`"30d"`, `"12h"`)
    Age(String),
    /// 프라이머리 샤드 크기 (`"200gb"`)
    Size(String),
}

impl Threshold {
    /// 설정 값을 해석합니다. `field`는 에러 메시지에 쓰입니다.
    pub fn parse(field: &str, value: &ThresholdValue) -> Result<Self, IsmError> {
        match value {
            ThresholdValue::Days(0) => Ok(Self::Unset),
            ThresholdValue::Days(days) => Ok(Self::Age(format!("{days}d"))),
            ThresholdValue::Text(text) => Self::parse_str(field, text),
        }
    }

    /// 문자열 임계값을 해석합니다.
    pub fn parse_str(field: &str, raw: &str) -> Result<Self, IsmError> {
        let text = raw.trim().to_ascii_lowercase();
        if text.is_empty() {
            return Ok(Self::Unset);
        }

        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        let (digits, unit) = text.split_at(split);
        if digits.is_empty() {
            return Err(IsmError::invalid(
                field,
                format!("'{raw}' must start with a non-negative integer"),
            ));
        }
        let amount: u64 = digits
            .parse()
            .map_err(|_| IsmError::invalid(field, format!("'{raw}' is out of range")))?;

        let unit = if unit.is_empty() { "d" } else { unit };
        let is_age = AGE_UNITS.contains(&unit);
        if !is_age && !SIZE_UNITS.contains(&unit) {
            return Err(IsmError::invalid(
                field,
                format!("unknown unit '{unit}' in '{raw}'"),
            ));
        }

        if amount == 0 {
            return Ok(Self::Unset);
        }
        let normalized = format!("{amount}{unit}");
        Ok(if is_age {
            Self::Age(normalized)
        } else {
            Self::Size(normalized)
        })
    }

    /// 설정 여부
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// 전환 조건으로 변환합니다. 미설정이면 `None`입니다.
    pub fn condition(&self) -> Option<Conditions> {
        match self {
            Self::Unset => None,
            Self::Age(age) => Some(Conditions::min_index_age(age.clone())),
            Self::Size(size) => Some(Conditions::min_primary_shard_size(size.clone())),
        }
    }
}
