//! ISM 상태 기계
//!
//! [`next`]는 현재 상태와 임계값만으로 다음 전환을 결정하는 순수 함수이고,
//! [`Ism`]은 이를 한 단계씩 실행하며 정책 상태를 기록하는 드라이버입니다.
//!
//! | 현재 | 참조 임계값 | 설정됨 | 미설정 |
//! |------|------------|--------|--------|
//! | Hot | `warm_age` | Warm | `retain_age`가 있으면 Delete, 없으면 종료 |
//! | Warm | `cold_age` | Cold | `retain_age`가 있으면 Delete, 없으면 종료 |
//! | Cold | `retain_age` | Delete (`cold_delete`) | 종료 |
//! | Delete | - | 종료 | - |

use logcentral_core::metrics as m;
use logcentral_core::types::ThresholdValue;
use tracing::debug;

use crate::error::IsmError;
use crate::state::{ActionSettings, PolicyState, State, Transition};
use crate::threshold::Threshold;

/// 상태 전환 임계값
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Thresholds {
    /// hot -> warm
    pub warm_age: Threshold,
    /// warm -> cold
    pub cold_age: Threshold,
    /// -> delete
    pub retain_age: Threshold,
}

impl Thresholds {
    /// 원본 입력 값을 해석합니다.
    pub fn parse(
        warm_age: &ThresholdValue,
        cold_age: &ThresholdValue,
        retain_age: &ThresholdValue,
    ) -> Result<Self, IsmError> {
        Ok(Self {
            warm_age: Threshold::parse("warm_age", warm_age)?,
            cold_age: Threshold::parse("cold_age", cold_age)?,
            retain_age: Threshold::parse("retain_age", retain_age)?,
        })
    }
}

/// 현재 상태에서의 다음 전환을 계산합니다.
///
/// 종료해야 하면 `None`을 반환합니다.
pub fn next(state: State, thresholds: &Thresholds) -> Option<(Transition, State)> {
    let (threshold, arriving) = match state {
        State::Hot => promote_or_delete(&thresholds.warm_age, State::Warm, thresholds)?,
        State::Warm => promote_or_delete(&thresholds.cold_age, State::Cold, thresholds)?,
        State::Cold if thresholds.retain_age.is_set() => {
            (&thresholds.retain_age, State::Delete { after_cold: true })
        }
        State::Cold | State::Delete { .. } => return None,
    };
    let conditions = threshold.condition()?;
    Some((
        Transition {
            state_name: arriving.name().to_owned(),
            conditions,
        },
        arriving,
    ))
}

fn promote_or_delete<'a>(
    promote: &'a Threshold,
    target: State,
    thresholds: &'a Thresholds,
) -> Option<(&'a Threshold, State)> {
    if promote.is_set() {
        Some((promote, target))
    } else if thresholds.retain_age.is_set() {
        Some((&thresholds.retain_age, State::Delete { after_cold: false }))
    } else {
        None
    }
}

/// ISM 드라이버
///
/// `hot`에서 시작하여 [`run`](Ism::run) 한 번에 전환 하나를 수행합니다.
///
/// # 사용 예시
/// ```
/// use logcentral_ism::{Ism, Thresholds, Threshold};
///
/// let thresholds = Thresholds {
///     warm_age: Threshold::Age("1d".into()),
///     cold_age: Threshold::Age("2d".into()),
///     retain_age: Threshold::Age("3d".into()),
/// };
/// let mut ism = Ism::new();
/// let mut states = Vec::new();
/// while ism.has_next() {
///     ism.run(&thresholds).unwrap();
///     states.push(ism.get_status().unwrap().name.clone());
/// }
/// assert_eq!(states, ["hot", "warm", "cold"]);
/// assert!(ism.run(&thresholds).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Ism {
    state: State,
    settings: ActionSettings,
    status: Option<PolicyState>,
    finished: bool,
}

impl Ism {
    /// 기본 액션 설정으로 생성합니다.
    pub fn new() -> Self {
        Self::with_settings(ActionSettings::default())
    }

    /// 액션 설정을 지정하여 생성합니다.
    pub fn with_settings(settings: ActionSettings) -> Self {
        Self {
            state: State::Hot,
            settings,
            status: None,
            finished: false,
        }
    }

    /// 현재 상태
    pub fn state(&self) -> State {
        self.state
    }

    /// 전환을 하나 수행합니다.
    ///
    /// 다음 상태가 없으면 현재 상태를 전환 없는 종료 상태로 기록합니다.
    ///
    /// # Errors
    /// 이미 종료된 뒤 호출하면 [`IsmError::InvalidStateTransition`]을 반환합니다.
    pub fn run(&mut self, thresholds: &Thresholds) -> Result<(), IsmError> {
        if self.finished {
            return Err(IsmError::InvalidStateTransition {
                state: self.state.name().to_owned(),
            });
        }

        match next(self.state, thresholds) {
            Some((transition, arriving)) => {
                debug!(
                    from = %self.state,
                    to = %arriving,
                    conditions = ?transition.conditions,
                    "lifecycle transition"
                );
                metrics::counter!(m::ISM_TRANSITIONS_TOTAL).increment(1);
                self.status = Some(PolicyState::departing(
                    self.state,
                    &self.settings,
                    transition,
                ));
                self.state = arriving;
                self.finished = arriving.is_terminal();
            }
            None => {
                debug!(state = %self.state, "lifecycle ends without transition");
                self.status = Some(PolicyState::terminal(self.state, &self.settings));
                self.finished = true;
            }
        }
        Ok(())
    }

    /// 마지막 `run`이 기록한 정책 상태
    ///
    /// 전환했다면 떠난 상태와 전환을, 종료했다면 전환 없는 현재 상태를 돌려줍니다.
    /// 아직 `run`을 호출하지 않았으면 `None`입니다.
    pub fn get_status(&self) -> Option<&PolicyState> {
        self.status.as_ref()
    }

    /// 전환이 더 남았는지 여부
    pub fn has_next(&self) -> bool {
        !self.finished
    }

    /// 도착한 delete 상태의 정책 상태
    ///
    /// delete로 전환하여 종료된 경우에만 `Some`입니다.
    pub fn terminal(&self) -> Option<PolicyState> {
        self.state
            .is_terminal()
            .then(|| PolicyState::terminal(self.state, &self.settings))
    }
}

impl Default for Ism {
    fn default() -> Self {
        Self::new()
    }
}
