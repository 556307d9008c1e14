//! 수명주기 상태와 정책 문서 구성 요소
//!
//! 직렬화 결과는 검색 엔진 인덱스 관리 API가 기대하는 형태를 따릅니다.
//!
//! ```json
//! {
//!   "name": "hot",
//!   "actions": [{ "rollover": { "min_primary_shard_size": "30gb" } }],
//!   "transitions": [{ "state_name": "warm", "conditions": { "min_index_age": "1d" } }]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IsmError;
use crate::threshold::Threshold;

/// 기본 타임스탬프 필드
pub const DEFAULT_TIMESTAMP_FIELD: &str = "@timestamp";

/// 수명주기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// 쓰기 대상 인덱스
    Hot,
    /// 읽기 위주 노드로 이동
    Warm,
    /// 저비용 스토리지로 이동
    Cold,
    /// 삭제. `after_cold`이면 cold 스토리지에서 삭제합니다.
    Delete {
        /// cold 상태에서 도착했는지 여부
        after_cold: bool,
    },
}

impl State {
    /// 정책 문서에 쓰이는 상태 이름
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
            Self::Delete { .. } => "delete",
        }
    }

    /// 종료 상태 여부
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }

    /// 이 상태에서 수행할 액션 목록
    pub fn actions(&self, settings: &ActionSettings) -> Vec<Action> {
        match self {
            Self::Hot => vec![Action::Rollover(settings.rollover.clone())],
            Self::Warm => vec![Action::WarmMigration {}],
            Self::Cold => vec![Action::ColdMigration {
                timestamp_field: settings.timestamp_field.clone(),
            }],
            Self::Delete { after_cold: true } => vec![Action::ColdDelete {}],
            Self::Delete { after_cold: false } => vec![Action::Delete {}],
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// hot 상태 롤오버 조건
///
/// 두 조건 모두 설정될 수 있으며, 둘 다 비어있으면 `{"rollover": {}}`가 됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverCondition {
    /// 인덱스 나이 조건
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_index_age: Option<String>,
    /// 프라이머리 샤드 크기 조건
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_primary_shard_size: Option<String>,
}

impl RolloverCondition {
    /// 나이/크기 임계값으로 롤오버 조건을 만듭니다.
    ///
    /// `age`는 시간 단위, `size`는 크기 단위여야 합니다.
    pub fn from_thresholds(age: &Threshold, size: &Threshold) -> Result<Self, IsmError> {
        let min_index_age = match age {
            Threshold::Unset => None,
            Threshold::Age(age) => Some(age.clone()),
            Threshold::Size(size) => {
                return Err(IsmError::invalid(
                    "rollover_age",
                    format!("'{size}' is a size, expected an age"),
                ));
            }
        };
        let min_primary_shard_size = match size {
            Threshold::Unset => None,
            Threshold::Size(size) => Some(size.clone()),
            Threshold::Age(age) => {
                return Err(IsmError::invalid(
                    "rollover_size",
                    format!("'{age}' is an age, expected a size"),
                ));
            }
        };
        Ok(Self {
            min_index_age,
            min_primary_shard_size,
        })
    }
}

/// 상태 액션
///
/// 각 액션은 `{"<action_type>": {<parameters>}}` 형태의 단일 키 맵으로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// 조건 충족 시 새 쓰기 인덱스로 롤오버
    Rollover(RolloverCondition),
    /// warm 노드로 이동
    WarmMigration {},
    /// cold 스토리지로 이동
    ColdMigration {
        /// 인덱스 시간 범위 계산에 쓰이는 필드
        timestamp_field: String,
    },
    /// 인덱스 삭제
    Delete {},
    /// cold 스토리지의 인덱스 삭제
    ColdDelete {},
}

/// 전환 조건
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    /// 인덱스 나이 조건
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_index_age: Option<String>,
    /// 프라이머리 샤드 크기 조건
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_primary_shard_size: Option<String>,
}

impl Conditions {
    /// 나이 조건
    pub fn min_index_age(age: impl Into<String>) -> Self {
        Self {
            min_index_age: Some(age.into()),
            min_primary_shard_size: None,
        }
    }

    /// 크기 조건
    pub fn min_primary_shard_size(size: impl Into<String>) -> Self {
        Self {
            min_index_age: None,
            min_primary_shard_size: Some(size.into()),
        }
    }
}

/// 다음 상태로의 전환
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// 도착 상태 이름
    pub state_name: String,
    /// 전환 조건
    pub conditions: Conditions,
}

/// 정책 문서의 상태 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyState {
    /// 상태 이름 (`hot`, `warm`, `cold`, `delete`)
    pub name: String,
    /// 액션 목록
    pub actions: Vec<Action>,
    /// 전환 목록. 최대 1개이며, 종료 상태에서는 비어있고 직렬화에서 생략됩니다.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<Transition>,
}

impl PolicyState {
    /// 전환이 없는 상태를 만듭니다.
    pub fn terminal(state: State, settings: &ActionSettings) -> Self {
        Self {
            name: state.name().to_owned(),
            actions: state.actions(settings),
            transitions: Vec::new(),
        }
    }

    /// `state`에서 `transition`으로 떠나는 상태를 만듭니다.
    pub fn departing(state: State, settings: &ActionSettings, transition: Transition) -> Self {
        Self {
            name: state.name().to_owned(),
            actions: state.actions(settings),
            transitions: vec![transition],
        }
    }

    /// 단일 전환
    pub fn transition(&self) -> Option<&Transition> {
        self.transitions.first()
    }
}

/// 상태 액션 파라미터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSettings {
    /// hot 롤오버 조건
    pub rollover: RolloverCondition,
    /// cold 마이그레이션 타임스탬프 필드
    pub timestamp_field: String,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            rollover: RolloverCondition::default(),
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_owned(),
        }
    }
}
