//! 텍스트 어댑터
//!
//! blob 하나가 항목 하나입니다. 출력은 청크 내 텍스트를 순서대로 그대로 이어붙입니다.
//! 구분자를 추가하지 않으므로 줄 경계는 입력이 책임집니다.

use std::io::Write;

use super::{Format, FormatAdapter, ItemIter};
use crate::error::CoalescerError;
use crate::storage::Blob;

/// 줄 단위 텍스트 어댑터
#[derive(Debug, Clone, Copy, Default)]
pub struct TextAdapter;

impl FormatAdapter for TextAdapter {
    type Item = String;
    const FORMAT: Format = Format::Text;

    fn stream_in(&self, blob: Blob) -> Result<ItemIter<String>, CoalescerError> {
        let text = decode_utf8(&blob.name, Self::FORMAT, blob.data.to_vec())?;
        Ok(Box::new(std::iter::once(Ok(text))))
    }

    fn sizer(item: &String) -> u64 {
        item.len() as u64
    }

    fn stream_out<W: Write + Send>(
        &self,
        items: Vec<String>,
        mut out: W,
        name: &str,
    ) -> Result<(), CoalescerError> {
        write_concatenated(&items, &mut out).map_err(|e| CoalescerError::sink(name, e))?;
        out.flush().map_err(|e| CoalescerError::sink(name, e))
    }
}

/// 바이트를 UTF-8 텍스트로 검증합니다.
pub(crate) fn decode_utf8(
    blob: &str,
    format: Format,
    bytes: Vec<u8>,
) -> Result<String, CoalescerError> {
    String::from_utf8(bytes).map_err(|e| {
        CoalescerError::decode(
            blob,
            format.as_str(),
            format!("invalid utf-8 at byte {}", e.utf8_error().valid_up_to()),
        )
    })
}

pub(crate) fn write_concatenated<W: Write>(items: &[String], out: &mut W) -> std::io::Result<()> {
    for item in items {
        out.write_all(item.as_bytes())?;
    }
    Ok(())
}
