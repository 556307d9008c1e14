//! gzip 텍스트 어댑터
//!
//! 입력은 다중 멤버 gzip 스트림까지 허용하며, 압축을 푼 UTF-8 텍스트가 항목입니다.
//! 크기 상한은 압축 해제 후 바이트 기준입니다.
//! 출력은 청크 텍스트를 이어붙여 기본 압축 레벨로 한 번 압축합니다.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use super::text::{decode_utf8, write_concatenated};
use super::{Format, FormatAdapter, ItemIter};
use crate::error::CoalescerError;
use crate::storage::Blob;

/// gzip 압축 텍스트 어댑터
#[derive(Debug, Clone, Copy)]
pub struct GzipAdapter {
    level: Compression,
}

impl GzipAdapter {
    /// 압축 레벨을 지정하여 생성합니다 (0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for GzipAdapter {
    fn default() -> Self {
        Self {
            level: Compression::default(),
        }
    }
}

impl FormatAdapter for GzipAdapter {
    type Item = String;
    const FORMAT: Format = Format::Gzip;

    fn stream_in(&self, blob: Blob) -> Result<ItemIter<String>, CoalescerError> {
        let mut decoded = Vec::new();
        MultiGzDecoder::new(&blob.data[..])
            .read_to_end(&mut decoded)
            .map_err(|e| CoalescerError::decode(&blob.name, Self::FORMAT.as_str(), e))?;
        let text = decode_utf8(&blob.name, Self::FORMAT, decoded)?;
        Ok(Box::new(std::iter::once(Ok(text))))
    }

    fn sizer(item: &String) -> u64 {
        item.len() as u64
    }

    fn stream_out<W: Write + Send>(
        &self,
        items: Vec<String>,
        out: W,
        name: &str,
    ) -> Result<(), CoalescerError> {
        let mut encoder = GzEncoder::new(out, self.level);
        write_concatenated(&items, &mut encoder).map_err(|e| CoalescerError::sink(name, e))?;
        let mut out = encoder.finish().map_err(|e| CoalescerError::sink(name, e))?;
        out.flush().map_err(|e| CoalescerError::sink(name, e))
    }
}
