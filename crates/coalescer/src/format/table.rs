//! 컬럼형 테이블(Parquet) 어댑터
//!
//! 입력 blob을 record batch 단위로 지연 디코드하며, 각 batch가 청크 분할 항목입니다.
//! 크기는 batch의 인메모리 배열 크기입니다.
//!
//! # 스키마 조정
//! 청크의 첫 batch 스키마가 그 청크의 기준 스키마입니다. 나머지 batch는 기준 스키마로 맞춥니다.
//! - 기준 스키마에 없는 컬럼이 있으면 [`CoalescerError::SchemaMismatch`]
//! - 빠진 컬럼은 nullable이면 null로 채우고, 아니면 `SchemaMismatch`
//! - 타입이 다르면 cast하고, cast 실패(값 손실 포함)는 `SchemaMismatch`
//!
//! 어떤 경우에도 데이터를 조용히 버리지 않습니다.

use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, new_null_array};
use arrow::compute::{CastOptions, cast_with_options};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use super::{Format, FormatAdapter, ItemIter};
use crate::error::CoalescerError;
use crate::storage::Blob;

/// 출처 blob 이름이 붙은 record batch
#[derive(Debug, Clone)]
pub struct TableChunk {
    /// 이 batch를 읽은 입력 blob 이름
    pub source: Arc<str>,
    /// 행 데이터
    pub batch: RecordBatch,
}

/// Parquet 테이블 어댑터
#[derive(Debug, Clone, Copy, Default)]
pub struct TableAdapter;

impl TableAdapter {
    fn writer_properties() -> WriterProperties {
        WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build()
    }
}

impl FormatAdapter for TableAdapter {
    type Item = TableChunk;
    const FORMAT: Format = Format::Table;

    fn stream_in(&self, blob: Blob) -> Result<ItemIter<TableChunk>, CoalescerError> {
        let source: Arc<str> = Arc::from(blob.name.as_str());
        let reader = ParquetRecordBatchReaderBuilder::try_new(blob.data)
            .and_then(|builder| builder.build())
            .map_err(|e| CoalescerError::decode(&source, Self::FORMAT.as_str(), e))?;

        Ok(Box::new(reader.map(move |batch| {
            batch
                .map(|batch| TableChunk {
                    source: Arc::clone(&source),
                    batch,
                })
                .map_err(|e| CoalescerError::decode(&source, Self::FORMAT.as_str(), e))
        })))
    }

    fn sizer(item: &TableChunk) -> u64 {
        item.batch.get_array_memory_size() as u64
    }

    fn stream_out<W: Write + Send>(
        &self,
        items: Vec<TableChunk>,
        out: W,
        name: &str,
    ) -> Result<(), CoalescerError> {
        let Some(first) = items.first() else {
            return Ok(());
        };
        let schema = first.batch.schema();

        let props = Self::writer_properties();
        let mut writer = ArrowWriter::try_new(out, Arc::clone(&schema), Some(props))
            .map_err(|e| CoalescerError::sink(name, std::io::Error::other(e)))?;

        for chunk in &items {
            let batch = conform(chunk, &schema)?;
            writer
                .write(&batch)
                .map_err(|e| CoalescerError::sink(name, std::io::Error::other(e)))?;
        }

        writer
            .close()
            .map_err(|e| CoalescerError::sink(name, std::io::Error::other(e)))?;
        Ok(())
    }
}

/// batch를 기준 스키마에 맞춥니다.
fn conform(chunk: &TableChunk, schema: &SchemaRef) -> Result<RecordBatch, CoalescerError> {
    let batch = &chunk.batch;
    let incoming = batch.schema();
    if incoming.fields() == schema.fields() {
        return Ok(batch.clone());
    }

    let mismatch = |reason: String| CoalescerError::SchemaMismatch {
        blob: chunk.source.to_string(),
        reason,
    };

    if let Some(extra) = incoming
        .fields()
        .iter()
        .find(|field| schema.field_with_name(field.name()).is_err())
    {
        return Err(mismatch(format!(
            "column '{}' is not in the governing schema",
            extra.name()
        )));
    }

    let cast_options = CastOptions {
        safe: false,
        ..Default::default()
    };

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let column = match incoming.index_of(field.name()) {
            Ok(index) => {
                let column = batch.column(index);
                if column.data_type() == field.data_type() {
                    Arc::clone(column)
                } else {
                    cast_with_options(column, field.data_type(), &cast_options).map_err(|e| {
                        mismatch(format!(
                            "column '{}' cannot be cast from {} to {}: {e}",
                            field.name(),
                            column.data_type(),
                            field.data_type()
                        ))
                    })?
                }
            }
            Err(_) if field.is_nullable() => new_null_array(field.data_type(), batch.num_rows()),
            Err(_) => {
                return Err(mismatch(format!(
                    "non-nullable column '{}' is missing",
                    field.name()
                )));
            }
        };
        columns.push(column);
    }

    RecordBatch::try_new(Arc::clone(schema), columns).map_err(|e| mismatch(e.to_string()))
}
