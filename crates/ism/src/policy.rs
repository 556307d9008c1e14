//! 정책 문서 생성
//!
//! [`IsmPolicyBuilder`]는 [`Ism`]을 끝까지 실행하여 상태 목록을 모으고,
//! delete로 끝났다면 종료 상태를 덧붙여 [`PolicyDocument`]를 만듭니다.
//!
//! # 출력 예시
//! ```json
//! {
//!   "policy": {
//!     "description": "logcentral index lifecycle policy",
//!     "default_state": "hot",
//!     "states": [
//!       { "name": "hot", "actions": [{ "rollover": {} }],
//!         "transitions": [{ "state_name": "delete", "conditions": { "min_index_age": "3d" } }] },
//!       { "name": "delete", "actions": [{ "delete": {} }] }
//!     ],
//!     "ism_template": [{ "index_patterns": ["logcentral-*"], "priority": 100 }]
//!   }
//! }
//! ```

use logcentral_core::config::IsmConfig;
use logcentral_core::metrics as m;
use logcentral_core::types::ThresholdValue;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::IsmError;
use crate::machine::{Ism, Thresholds};
use crate::state::{ActionSettings, DEFAULT_TIMESTAMP_FIELD, PolicyState, RolloverCondition, State};
use crate::threshold::Threshold;

/// 인덱스 관리 API에 제출하는 정책 문서
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// 정책 본문
    pub policy: Policy,
}

/// 정책 본문
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// 정책 설명
    pub description: String,
    /// 새 인덱스의 시작 상태 (항상 `hot`)
    pub default_state: String,
    /// 상태 목록 (hot부터 순서대로)
    pub states: Vec<PolicyState>,
    /// 자동 적용 템플릿
    pub ism_template: Vec<IsmTemplate>,
}

/// 인덱스 패턴별 자동 적용 템플릿
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsmTemplate {
    /// 적용 대상 인덱스 패턴
    pub index_patterns: Vec<String>,
    /// 템플릿 우선순위
    pub priority: u32,
}

impl PolicyDocument {
    /// 상태 목록
    pub fn states(&self) -> &[PolicyState] {
        &self.policy.states
    }

    /// 사람이 읽기 좋은 JSON 문자열
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// 정책 문서 빌더
///
/// 임계값은 원본 형태로 받아 [`build`](IsmPolicyBuilder::build) 시점에 해석합니다.
#[derive(Debug, Clone)]
pub struct IsmPolicyBuilder {
    warm_age: ThresholdValue,
    cold_age: ThresholdValue,
    retain_age: ThresholdValue,
    rollover_age: ThresholdValue,
    rollover_size: ThresholdValue,
    index_patterns: Vec<String>,
    priority: u32,
    timestamp_field: String,
    description: String,
}

impl IsmPolicyBuilder {
    /// 모든 임계값이 비어있는 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            warm_age: ThresholdValue::default(),
            cold_age: ThresholdValue::default(),
            retain_age: ThresholdValue::default(),
            rollover_age: ThresholdValue::default(),
            rollover_size: ThresholdValue::default(),
            index_patterns: Vec::new(),
            priority: 100,
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_owned(),
            description: String::new(),
        }
    }

    /// `[ism]` 설정 섹션으로 빌더를 생성합니다.
    pub fn from_config(config: &IsmConfig) -> Self {
        Self {
            warm_age: config.warm_age.clone(),
            cold_age: config.cold_age.clone(),
            retain_age: config.retain_age.clone(),
            rollover_age: config.rollover_age.clone(),
            rollover_size: config.rollover_size.clone(),
            index_patterns: vec![config.index_pattern.clone()],
            priority: config.priority,
            timestamp_field: config.timestamp_field.clone(),
            description: config.description.clone(),
        }
    }

    /// hot -> warm 임계값
    pub fn warm_age(mut self, value: impl Into<ThresholdValue>) -> Self {
        self.warm_age = value.into();
        self
    }

    /// warm -> cold 임계값
    pub fn cold_age(mut self, value: impl Into<ThresholdValue>) -> Self {
        self.cold_age = value.into();
        self
    }

    /// 삭제 임계값
    pub fn retain_age(mut self, value: impl Into<ThresholdValue>) -> Self {
        self.retain_age = value.into();
        self
    }

    /// 롤오버 인덱스 나이
    pub fn rollover_age(mut self, value: impl Into<ThresholdValue>) -> Self {
        self.rollover_age = value.into();
        self
    }

    /// 롤오버 프라이머리 샤드 크기
    pub fn rollover_size(mut self, value: impl Into<ThresholdValue>) -> Self {
        self.rollover_size = value.into();
        self
    }

    /// 적용 인덱스 패턴을 교체합니다.
    pub fn index_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.index_patterns = vec![pattern.into()];
        self
    }

    /// 템플릿 우선순위
    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// cold 마이그레이션 타임스탬프 필드
    pub fn timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }

    /// 정책 설명
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 정책 문서를 생성합니다.
    ///
    /// # Errors
    /// 임계값을 해석할 수 없으면 [`IsmError::InvalidParameter`]를 반환합니다.
    pub fn build(&self) -> Result<PolicyDocument, IsmError> {
        let thresholds = Thresholds::parse(&self.warm_age, &self.cold_age, &self.retain_age)?;
        let rollover = RolloverCondition::from_thresholds(
            &Threshold::parse("rollover_age", &self.rollover_age)?,
            &Threshold::parse("rollover_size", &self.rollover_size)?,
        )?;
        if self.timestamp_field.trim().is_empty() {
            return Err(IsmError::invalid(
                "timestamp_field",
                "timestamp field must not be empty",
            ));
        }

        let mut ism = Ism::with_settings(ActionSettings {
            rollover,
            timestamp_field: self.timestamp_field.clone(),
        });
        let mut states = Vec::new();
        while ism.has_next() {
            ism.run(&thresholds)?;
            if let Some(status) = ism.get_status() {
                states.push(status.clone());
            }
        }
        states.extend(ism.terminal());

        metrics::counter!(m::ISM_POLICIES_GENERATED_TOTAL).increment(1);
        info!(
            states = states.len(),
            patterns = ?self.index_patterns,
            "generated lifecycle policy"
        );

        // 패턴이 없으면 자동 적용 없이 수동 연결용 정책이 됨
        let ism_template = if self.index_patterns.is_empty() {
            Vec::new()
        } else {
            vec![IsmTemplate {
                index_patterns: self.index_patterns.clone(),
                priority: self.priority,
            }]
        };

        Ok(PolicyDocument {
            policy: Policy {
                description: self.description.clone(),
                default_state: State::Hot.name().to_owned(),
                states,
                ism_template,
            },
        })
    }
}

impl Default for IsmPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
