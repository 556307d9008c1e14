//! 형식별 어댑터 -- 입력 blob 디코드, 항목 크기 계산, 출력 인코드
//!
//! 병합 대상 형식은 [`Format`]으로 닫혀 있으며, 형식마다 하나의 어댑터가 있습니다.
//!
//! | 형식 | 항목 | 크기 | 출력 |
//! |------|------|------|------|
//! | [`Format::Table`] | Parquet record batch | 인메모리 배열 크기 | Parquet (Snappy) |
//! | [`Format::Text`] | UTF-8 텍스트 전체 | 바이트 길이 | 이어붙인 텍스트 |
//! | [`Format::Gzip`] | 압축 해제된 UTF-8 텍스트 | 바이트 길이 | gzip 압축 텍스트 |

pub mod gzip;
pub mod table;
pub mod text;

pub use gzip::GzipAdapter;
pub use table::{TableAdapter, TableChunk};
pub use text::TextAdapter;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use logcentral_core::config::MIB;
use serde::{Deserialize, Serialize};

use crate::error::CoalescerError;
use crate::storage::Blob;

/// 병합 대상 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// 컬럼형 테이블 (Parquet)
    Table,
    /// 줄 단위 텍스트
    ///
    /// blob 내용을 바이트 그대로 이어붙입니다. 구분자를 넣지 않으므로
    /// 각 입력 blob은 `\n`으로 끝나야 줄 경계가 유지됩니다.
    Text,
    /// gzip 압축 텍스트 (줄 경계 규칙은 `Text`와 같음)
    Gzip,
}

impl Format {
    /// 모든 형식 목록
    pub const ALL: [Format; 3] = [Format::Table, Format::Text, Format::Gzip];

    /// 형식 이름 (메트릭 레이블, 출력에 사용)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Text => "text",
            Self::Gzip => "gzip",
        }
    }

    /// 출력 blob 확장자. 텍스트는 확장자가 없습니다.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Table => ".parquet",
            Self::Text => "",
            Self::Gzip => ".gz",
        }
    }

    /// 기본 청크 크기 상한 (바이트)
    ///
    /// 테이블은 인메모리 크기 기준 1 MiB, 텍스트/gzip은 압축 해제 기준 20 MiB입니다.
    pub fn default_max_size(&self) -> u64 {
        match self {
            Self::Table => MIB,
            Self::Text | Self::Gzip => 20 * MIB,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = CoalescerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "parquet" => Ok(Self::Table),
            "text" | "plain" => Ok(Self::Text),
            "gzip" | "gz" | "gzip-text" => Ok(Self::Gzip),
            other => Err(CoalescerError::invalid(
                "format",
                format!("unknown format '{other}', expected table, text or gzip"),
            )),
        }
    }
}

/// 디코드된 항목 이터레이터
pub type ItemIter<T> = Box<dyn Iterator<Item = Result<T, CoalescerError>>>;

/// 형식별 입출력 어댑터
///
/// 병합 루프는 이 trait만 보고 동작합니다.
/// 구현체는 상태가 없고, 한 번의 병합 안에서 재사용됩니다.
pub trait FormatAdapter {
    /// 청크 분할 단위 항목
    type Item: 'static;

    /// 어댑터가 처리하는 형식
    const FORMAT: Format;

    /// 입력 blob 하나를 항목 스트림으로 디코드합니다.
    ///
    /// 디코드 실패는 [`CoalescerError::Decode`]로 보고합니다.
    fn stream_in(&self, blob: Blob) -> Result<ItemIter<Self::Item>, CoalescerError>;

    /// 항목 크기 (청크 상한 비교 기준)
    fn sizer(item: &Self::Item) -> u64;

    /// 청크 하나를 출력 blob `name`으로 인코드합니다.
    ///
    /// `items`는 비어있지 않습니다.
    fn stream_out<W: Write + Send>(
        &self,
        items: Vec<Self::Item>,
        out: W,
        name: &str,
    ) -> Result<(), CoalescerError>;
}
