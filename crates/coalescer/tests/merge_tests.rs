//! 통합 테스트 -- 소스 -> 청크 분할 -> 싱크 전체 병합 흐름 검증
//!
//! 인메모리 소스/싱크와 실제 디렉토리 양쪽으로 병합 결과를 확인합니다.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use logcentral_coalescer::storage::BlobIter;
use logcentral_coalescer::{
    Blob, BlobSink, BlobSource, CoalescerError, DirSink, DirSource, Format, PendingBlob, merge,
};

// --- 인메모리 헬퍼 ---

struct MemorySource {
    blobs: Vec<Blob>,
}

impl MemorySource {
    fn new(blobs: Vec<Blob>) -> Self {
        Self { blobs }
    }
}

impl BlobSource for MemorySource {
    fn blobs(&self) -> Result<BlobIter<'_>, CoalescerError> {
        Ok(Box::new(self.blobs.iter().cloned().map(Ok)))
    }
}

#[derive(Clone, Default)]
struct MemorySink {
    committed: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemorySink {
    fn outputs(&self) -> BTreeMap<String, Vec<u8>> {
        self.committed.lock().unwrap().clone()
    }
}

struct MemoryPending {
    name: String,
    buf: Vec<u8>,
    committed: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl Write for MemoryPending {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl PendingBlob for MemoryPending {
    fn commit(self: Box<Self>) -> Result<String, CoalescerError> {
        let location = format!("memory://{}", self.name);
        self.committed.lock().unwrap().insert(self.name, self.buf);
        Ok(location)
    }
}

impl BlobSink for MemorySink {
    fn create(&self, name: &str) -> Result<Box<dyn PendingBlob>, CoalescerError> {
        Ok(Box::new(MemoryPending {
            name: name.to_owned(),
            buf: Vec::new(),
            committed: Arc::clone(&self.committed),
        }))
    }
}

/// 쓰기가 항상 실패하는 싱크
struct BrokenSink;

struct BrokenPending;

impl Write for BrokenPending {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl PendingBlob for BrokenPending {
    fn commit(self: Box<Self>) -> Result<String, CoalescerError> {
        panic!("a failed write must never be committed");
    }
}

impl BlobSink for BrokenSink {
    fn create(&self, _name: &str) -> Result<Box<dyn PendingBlob>, CoalescerError> {
        Ok(Box::new(BrokenPending))
    }
}

// --- 데이터 헬퍼 ---

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn gunzip(data: &[u8]) -> String {
    let mut out = String::new();
    MultiGzDecoder::new(data).read_to_string(&mut out).unwrap();
    out
}

fn log_batch(start: i64, rows: usize) -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("message", DataType::Utf8, true),
    ]);
    let ids: Vec<i64> = (start..start + rows as i64).collect();
    let messages: Vec<String> = ids.iter().map(|i| format!("event {i}")).collect();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(ids)),
        Arc::new(StringArray::from(messages)),
    ];
    RecordBatch::try_new(Arc::new(schema), columns).unwrap()
}

fn to_parquet(batch: &RecordBatch) -> Vec<u8> {
    let mut out = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut out, batch.schema(), None).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
    out
}

fn parquet_batches(data: &[u8]) -> Vec<RecordBatch> {
    ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::copy_from_slice(data))
        .unwrap()
        .build()
        .unwrap()
        .map(Result::unwrap)
        .collect()
}

// --- 텍스트 ---

/// 6 MB 파일 5개, 상한 20 MB -> 출력 2개, 합계 30 MB
#[test]
fn test_five_text_files_make_two_outputs() {
    const MB: usize = 1_000_000;
    let blobs = (0..5u8)
        .map(|i| Blob::new(format!("part-{i}.log"), vec![b'a' + i; 6 * MB]))
        .collect();
    let source = MemorySource::new(blobs);
    let sink = MemorySink::default();

    let report = merge(&source, &sink, 20 * MB as u64, Format::Text).unwrap();

    assert_eq!(report.inputs, 5);
    assert_eq!(report.items, 5);
    assert_eq!(report.outputs.len(), 2);
    assert_eq!(report.outputs[0].items, 3);
    assert_eq!(report.outputs[1].items, 2);

    let outputs = sink.outputs();
    assert_eq!(outputs.len(), 2);
    let total: usize = outputs.values().map(Vec::len).sum();
    assert_eq!(total, 30 * MB);
    for output in &report.outputs {
        assert!(outputs[&output.name].len() as u64 <= 20 * MB as u64);
    }
}

/// 출력을 생성 순서대로 이어붙이면 입력을 순서대로 이어붙인 것과 같아야 함
#[test]
fn test_text_merge_preserves_order() {
    let blobs = vec![
        Blob::new("1.log", "first\n"),
        Blob::new("2.log", "second\n"),
        Blob::new("3.log", "third\n"),
    ];
    let sink = MemorySink::default();
    let report = merge(&MemorySource::new(blobs), &sink, 10, Format::Text).unwrap();

    let outputs = sink.outputs();
    let joined: String = report
        .outputs
        .iter()
        .map(|o| String::from_utf8(outputs[&o.name].clone()).unwrap())
        .collect();
    assert_eq!(joined, "first\nsecond\nthird\n");
}

#[test]
fn test_empty_source_produces_no_outputs() {
    let sink = MemorySink::default();
    let report = merge(&MemorySource::new(Vec::new()), &sink, 100, Format::Gzip).unwrap();
    assert_eq!(report.inputs, 0);
    assert!(report.outputs.is_empty());
    assert!(sink.outputs().is_empty());
}

#[test]
fn test_zero_max_size_is_invalid_parameter() {
    let sink = MemorySink::default();
    let result = merge(&MemorySource::new(vec![Blob::new("a", "x")]), &sink, 0, Format::Text);
    assert!(matches!(result, Err(CoalescerError::InvalidParameter { .. })));
}

#[test]
fn test_invalid_utf8_aborts_merge() {
    let blobs = vec![
        Blob::new("ok.log", "fine\n"),
        Blob::new("bad.log", vec![0xff, 0xfe, 0xfd]),
    ];
    let sink = MemorySink::default();
    let result = merge(&MemorySource::new(blobs), &sink, 1024, Format::Text);
    assert!(matches!(result, Err(CoalescerError::Decode { ref blob, .. }) if blob == "bad.log"));
    // 실패한 청크는 커밋되지 않음
    assert!(sink.outputs().is_empty());
}

// --- gzip ---

#[test]
fn test_gzip_merge_round_trip() {
    let blobs = vec![
        Blob::new("a.gz", gzip(b"alpha\n")),
        Blob::new("b.gz", gzip(b"beta\n")),
        Blob::new("c.gz", gzip(b"gamma\n")),
    ];
    let sink = MemorySink::default();
    let report = merge(&MemorySource::new(blobs), &sink, 11, Format::Gzip).unwrap();

    // 상한은 압축 해제 크기 기준: alpha+beta = 11, gamma는 다음 청크
    assert_eq!(report.outputs.len(), 2);
    assert_eq!(report.payload_bytes, 17);

    let outputs = sink.outputs();
    let first = &report.outputs[0];
    assert!(first.name.ends_with(".gz"));
    assert_eq!(gunzip(&outputs[&first.name]), "alpha\nbeta\n");
    assert_eq!(gunzip(&outputs[&report.outputs[1].name]), "gamma\n");
}

#[test]
fn test_corrupt_gzip_is_decode_error() {
    let blobs = vec![Blob::new("broken.gz", b"\x1f\x8b\x08garbage".to_vec())];
    let result = merge(&MemorySource::new(blobs), &MemorySink::default(), 1024, Format::Gzip);
    assert!(matches!(result, Err(CoalescerError::Decode { .. })));
}

#[test]
fn test_sink_failure_is_sink_error() {
    let blobs = vec![Blob::new("a.log", "data\n")];
    let result = merge(&MemorySource::new(blobs), &BrokenSink, 1024, Format::Text);
    assert!(matches!(result, Err(CoalescerError::Sink { .. })));
}

// --- 테이블 ---

#[test]
fn test_table_merge_preserves_row_count() {
    let blobs: Vec<Blob> = (0..4)
        .map(|i| Blob::new(format!("t{i}.parquet"), to_parquet(&log_batch(i * 100, 100))))
        .collect();
    let sink = MemorySink::default();
    let report = merge(&MemorySource::new(blobs), &sink, 1024 * 1024, Format::Table).unwrap();

    assert_eq!(report.inputs, 4);
    let outputs = sink.outputs();
    let rows: usize = outputs
        .values()
        .flat_map(|data| parquet_batches(data))
        .map(|b| b.num_rows())
        .sum();
    assert_eq!(rows, 400);
    assert!(report.outputs.iter().all(|o| o.name.ends_with(".parquet")));
}

#[test]
fn test_table_small_bound_splits_outputs() {
    let blobs: Vec<Blob> = (0..3)
        .map(|i| Blob::new(format!("t{i}.parquet"), to_parquet(&log_batch(i * 10, 10))))
        .collect();
    let sink = MemorySink::default();
    // 1바이트 상한: 모든 batch가 단독 청크
    let report = merge(&MemorySource::new(blobs), &sink, 1, Format::Table).unwrap();
    assert_eq!(report.outputs.len(), 3);
    assert!(report.outputs.iter().all(|o| o.items == 1));
}

#[test]
fn test_table_missing_nullable_column_is_null_filled() {
    let full = log_batch(0, 5);
    let ids_only = RecordBatch::try_new(
        Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)])),
        vec![Arc::new(Int64Array::from(vec![10, 11, 12])) as ArrayRef],
    )
    .unwrap();
    let blobs = vec![
        Blob::new("full.parquet", to_parquet(&full)),
        Blob::new("ids.parquet", to_parquet(&ids_only)),
    ];
    let sink = MemorySink::default();
    let report = merge(&MemorySource::new(blobs), &sink, 1024 * 1024, Format::Table).unwrap();
    assert_eq!(report.outputs.len(), 1);

    let batches = parquet_batches(&sink.outputs()[&report.outputs[0].name]);
    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, 8);
    let nulls: usize = batches.iter().map(|b| b.column(1).null_count()).sum();
    assert_eq!(nulls, 3);
}

#[test]
fn test_table_extra_column_fails_loudly() {
    let wide = RecordBatch::try_new(
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("message", DataType::Utf8, true),
            Field::new("host", DataType::Utf8, true),
        ])),
        vec![
            Arc::new(Int64Array::from(vec![1])) as ArrayRef,
            Arc::new(StringArray::from(vec!["m"])),
            Arc::new(StringArray::from(vec!["web-01"])),
        ],
    )
    .unwrap();
    let blobs = vec![
        Blob::new("narrow.parquet", to_parquet(&log_batch(0, 2))),
        Blob::new("wide.parquet", to_parquet(&wide)),
    ];
    let sink = MemorySink::default();
    let result = merge(&MemorySource::new(blobs), &sink, 1024 * 1024, Format::Table);
    assert!(
        matches!(result, Err(CoalescerError::SchemaMismatch { ref blob, .. }) if blob == "wide.parquet")
    );
    assert!(sink.outputs().is_empty());
}

#[test]
fn test_corrupt_parquet_is_decode_error() {
    let blobs = vec![Blob::new("junk.parquet", b"not a parquet file".to_vec())];
    let result = merge(&MemorySource::new(blobs), &MemorySink::default(), 1024, Format::Table);
    assert!(matches!(result, Err(CoalescerError::Decode { .. })));
}

// --- 디렉토리 ---

fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_dir_merge_leaves_no_temp_files() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for i in 0..6 {
        std::fs::write(input.path().join(format!("{i}.log")), format!("line {i}\n")).unwrap();
    }

    let report = merge(
        &DirSource::new(input.path()),
        &DirSink::new(output.path()).unwrap(),
        14,
        Format::Text,
    )
    .unwrap();

    let mut expected: Vec<String> = report.outputs.iter().map(|o| o.name.clone()).collect();
    expected.sort();
    assert_eq!(dir_entries(output.path()), expected);
    // 입력은 그대로
    assert_eq!(dir_entries(input.path()).len(), 6);
}

#[test]
fn test_dir_merge_failure_leaves_no_temp_files() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("a.gz"), gzip(b"ok\n")).unwrap();
    std::fs::write(input.path().join("b.gz"), b"corrupt").unwrap();

    let result = merge(
        &DirSource::new(input.path()),
        &DirSink::new(output.path()).unwrap(),
        1024,
        Format::Gzip,
    );
    assert!(matches!(result, Err(CoalescerError::Decode { .. })));
    assert!(dir_entries(output.path()).is_empty());
}
