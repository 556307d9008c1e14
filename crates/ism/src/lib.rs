#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`threshold`]: 임계값 해석 (`"30d"`, `"200gb"`, 정수 일수)
//! - [`state`]: 상태, 액션, 전환, 정책 상태 타입
//! - [`machine`]: 전환 함수 [`next`]와 드라이버 [`Ism`]
//! - [`policy`]: 정책 문서 생성기 [`IsmPolicyBuilder`]
//! - [`error`]: 도메인 에러 타입

pub mod error;
pub mod machine;
pub mod policy;
pub mod state;
pub mod threshold;

// --- 주요 타입 re-export ---

pub use error::IsmError;
pub use machine::{Ism, Thresholds, next};
pub use policy::{IsmPolicyBuilder, IsmTemplate, Policy, PolicyDocument};
pub use state::{
    Action, ActionSettings, Conditions, PolicyState, RolloverCondition, State, Transition,
};
pub use threshold::Threshold;
