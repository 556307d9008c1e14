//! 크기 기반 청크 분할 -- 형식과 무관한 병합 알고리즘
//!
//! 항목 스트림을 순서대로 소비하면서 누적 크기가 `max_size`를 넘지 않도록
//! 배치([`Batch`])로 묶습니다.
//!
//! # 규칙
//! - 현재 배치가 비어있지 않고, 다음 항목을 더하면 `max_size`를 초과하면
//!   현재 배치를 내보내고 새 배치를 시작합니다.
//! - 항목은 항상 (새로 시작했을 수도 있는) 배치에 추가됩니다.
//!   따라서 상한보다 큰 단일 항목은 분할되지 않고 단독 배치가 됩니다.
//! - 입력이 끝나면 비어있지 않은 마지막 배치를 내보냅니다.
//!   입력이 없으면 배치도 없습니다 (빈 배치 1개가 아님).
//!
//! 배치는 지연(lazy) 생성되므로 전체 입력을 메모리에 올리지 않습니다.

use std::convert::Infallible;
use std::mem;

use crate::error::CoalescerError;

/// 봉인된 배치
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    items: Vec<T>,
    size: u64,
}

impl<T> Batch<T> {
    /// 배치에 포함된 항목 수
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 배치가 비어있는지 확인합니다. 알고리즘이 내보내는 배치는 항상 비어있지 않습니다.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// sizer로 계산한 누적 크기
    pub fn size(&self) -> u64 {
        self.size
    }

    /// 항목 슬라이스
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// 항목을 소유권과 함께 꺼냅니다.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// 실패할 수 있는 항목 스트림에 대한 청크 분할 이터레이터
///
/// 항목 스트림에서 에러가 나오면 진행 중인 배치를 버리고 에러를 한 번 내보낸 뒤 종료합니다.
pub struct TryCoalesce<I, F, T> {
    items: I,
    max_size: u64,
    sizer: F,
    batch: Vec<T>,
    batch_size: u64,
    done: bool,
}

impl<I, F, T, E> Iterator for TryCoalesce<I, F, T>
where
    I: Iterator<Item = Result<T, E>>,
    F: FnMut(&T) -> u64,
{
    type Item = Result<Batch<T>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.items.next() {
                Some(Ok(item)) => {
                    let size = (self.sizer)(&item);
                    let overflows = self
                        .batch_size
                        .checked_add(size)
                        .is_none_or(|total| total > self.max_size);

                    if !self.batch.is_empty() && overflows {
                        let sealed = Batch {
                            items: mem::take(&mut self.batch),
                            size: self.batch_size,
                        };
                        self.batch.push(item);
                        self.batch_size = size;
                        return Some(Ok(sealed));
                    }

                    self.batch.push(item);
                    self.batch_size = self.batch_size.saturating_add(size);
                }
                Some(Err(err)) => {
                    self.done = true;
                    self.batch.clear();
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    if self.batch.is_empty() {
                        return None;
                    }
                    return Some(Ok(Batch {
                        items: mem::take(&mut self.batch),
                        size: mem::take(&mut self.batch_size),
                    }));
                }
            }
        }
    }
}

/// 실패할 수 있는 항목 스트림을 크기 기반 배치로 묶습니다.
///
/// `max_size`가 0이면 [`CoalescerError::InvalidParameter`]를 반환합니다.
pub fn try_coalesce<I, F, T, E>(
    items: I,
    max_size: u64,
    sizer: F,
) -> Result<TryCoalesce<I::IntoIter, F, T>, CoalescerError>
where
    I: IntoIterator<Item = Result<T, E>>,
    F: FnMut(&T) -> u64,
{
    validate_max_size(max_size)?;
    Ok(TryCoalesce {
        items: items.into_iter(),
        max_size,
        sizer,
        batch: Vec::new(),
        batch_size: 0,
        done: false,
    })
}

type Infallibly<I, T> = std::iter::Map<I, fn(T) -> Result<T, Infallible>>;

/// 실패하지 않는 항목 스트림에 대한 청크 분할 이터레이터
pub struct Coalesce<I: Iterator, F> {
    inner: TryCoalesce<Infallibly<I, I::Item>, F, I::Item>,
}

impl<I, F> Iterator for Coalesce<I, F>
where
    I: Iterator,
    F: FnMut(&I::Item) -> u64,
{
    type Item = Batch<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|result| match result {
            Ok(batch) => batch,
            Err(never) => match never {},
        })
    }
}

/// 항목 스트림을 크기 기반 배치로 묶습니다.
///
/// # 사용 예시
/// ```
/// use logcentral_coalescer::coalesce;
///
/// let sizes = vec![6u64, 6, 6, 6, 6];
/// let batches: Vec<_> = coalesce(sizes, 20, |s| *s).unwrap().collect();
/// assert_eq!(batches.len(), 2);
/// assert_eq!(batches[0].size(), 18);
/// assert_eq!(batches[1].size(), 12);
/// ```
pub fn coalesce<I, F>(
    items: I,
    max_size: u64,
    sizer: F,
) -> Result<Coalesce<I::IntoIter, F>, CoalescerError>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> u64,
{
    let wrap: fn(I::Item) -> Result<I::Item, Infallible> = Ok;
    let inner = try_coalesce(items.into_iter().map(wrap), max_size, sizer)?;
    Ok(Coalesce { inner })
}

pub(crate) fn validate_max_size(max_size: u64) -> Result<(), CoalescerError> {
    if max_size == 0 {
        return Err(CoalescerError::invalid(
            "max_size",
            "must be greater than 0",
        ));
    }
    Ok(())
}
