//! 병합 실행 -- 소스 -> 청크 분할 -> 싱크
//!
//! [`merge`]는 입력 blob을 하나씩 디코드하여 항목 스트림으로 펼치고,
//! [`try_coalesce`](crate::chunk::try_coalesce)로 크기 기반 청크를 만든 뒤
//! 청크마다 출력 blob 하나를 씁니다.
//!
//! 처리는 동기식이며 한 번에 입력 blob 하나만 메모리에 올립니다.
//! 어떤 에러든 병합을 즉시 중단시키고, 실패한 청크의 출력은 커밋되지 않습니다.
//! 이미 커밋된 이전 청크의 출력은 남습니다.

use std::cell::Cell;
use std::time::Instant;

use chrono::Utc;
use logcentral_core::metrics as m;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::chunk::{try_coalesce, validate_max_size};
use crate::error::CoalescerError;
use crate::format::{Format, FormatAdapter, GzipAdapter, ItemIter, TableAdapter, TextAdapter};
use crate::storage::{BlobSink, BlobSource};

/// 출력 blob 이름 생성기
///
/// 이름 형식: `[{prefix}-]{UTC 타임스탬프}-{무작위 8자}{확장자}`
/// (예: `merged-20240115T120000123Z-1a2b3c4d.gz`)
#[derive(Debug, Clone, Default)]
pub struct OutputNamer {
    prefix: String,
}

impl OutputNamer {
    /// 접두어를 지정하여 생성합니다. 빈 문자열이면 접두어 없이 이름을 만듭니다.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// 새 출력 이름을 만듭니다.
    pub fn next_name(&self, format: Format) -> String {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%S%3fZ");
        let suffix = Uuid::new_v4().simple().to_string();
        let suffix = &suffix[..8];
        let ext = format.extension();
        if self.prefix.is_empty() {
            format!("{timestamp}-{suffix}{ext}")
        } else {
            format!("{}-{timestamp}-{suffix}{ext}", self.prefix)
        }
    }
}

/// 커밋된 출력 blob 하나의 요약
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputBlob {
    /// 출력 blob 이름
    pub name: String,
    /// 싱크가 보고한 최종 위치
    pub location: String,
    /// 포함된 항목 수
    pub items: usize,
    /// 항목 크기 합계 (sizer 기준, 압축 전)
    pub payload_bytes: u64,
}

/// 병합 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// 병합 형식
    pub format: Format,
    /// 읽은 입력 blob 수
    pub inputs: usize,
    /// 전체 항목 수
    pub items: usize,
    /// 항목 크기 합계 (sizer 기준, 압축 전)
    pub payload_bytes: u64,
    /// 커밋된 출력 목록 (생성 순서)
    pub outputs: Vec<OutputBlob>,
}

/// 소스의 모든 blob을 `max_size` 이하 청크로 다시 묶어 싱크에 씁니다.
///
/// # Errors
/// - `max_size`가 0: [`CoalescerError::InvalidParameter`]
/// - 손상된 입력: [`CoalescerError::Decode`]
/// - 테이블 스키마 불일치: [`CoalescerError::SchemaMismatch`]
/// - 출력 실패: [`CoalescerError::Sink`]
pub fn merge(
    source: &dyn BlobSource,
    sink: &dyn BlobSink,
    max_size: u64,
    format: Format,
) -> Result<MergeReport, CoalescerError> {
    merge_with_namer(source, sink, max_size, format, &OutputNamer::default())
}

/// 출력 이름 생성기를 지정하여 병합합니다.
pub fn merge_with_namer(
    source: &dyn BlobSource,
    sink: &dyn BlobSink,
    max_size: u64,
    format: Format,
    namer: &OutputNamer,
) -> Result<MergeReport, CoalescerError> {
    validate_max_size(max_size)?;

    let started = Instant::now();
    let result = match format {
        Format::Table => run(&TableAdapter, source, sink, max_size, namer),
        Format::Text => run(&TextAdapter, source, sink, max_size, namer),
        Format::Gzip => run(&GzipAdapter::default(), source, sink, max_size, namer),
    };
    let elapsed = started.elapsed();

    let outcome = if result.is_ok() { "success" } else { "failure" };
    metrics::counter!(
        m::COALESCER_MERGES_TOTAL,
        m::LABEL_FORMAT => format.as_str(),
        m::LABEL_RESULT => outcome
    )
    .increment(1);
    metrics::histogram!(m::COALESCER_MERGE_DURATION_SECONDS, m::LABEL_FORMAT => format.as_str())
        .record(elapsed.as_secs_f64());

    match &result {
        Ok(report) => info!(
            format = %format,
            inputs = report.inputs,
            items = report.items,
            outputs = report.outputs.len(),
            payload_bytes = report.payload_bytes,
            elapsed_ms = elapsed.as_millis() as u64,
            "merge completed"
        ),
        Err(e) => warn!(format = %format, error = %e, "merge aborted"),
    }

    result
}

fn run<A: FormatAdapter>(
    adapter: &A,
    source: &dyn BlobSource,
    sink: &dyn BlobSink,
    max_size: u64,
    namer: &OutputNamer,
) -> Result<MergeReport, CoalescerError> {
    let format = A::FORMAT;
    let inputs = Cell::new(0usize);

    let items = source.blobs()?.flat_map(|blob| -> ItemIter<A::Item> {
        let decoded = blob.and_then(|blob| {
            inputs.set(inputs.get() + 1);
            metrics::counter!(m::COALESCER_INPUTS_TOTAL, m::LABEL_FORMAT => format.as_str())
                .increment(1);
            debug!(blob = %blob.name, bytes = blob.data.len(), "decoding input blob");
            adapter.stream_in(blob)
        });
        match decoded {
            Ok(items) => items,
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    });

    let mut report = MergeReport {
        format,
        inputs: 0,
        items: 0,
        payload_bytes: 0,
        outputs: Vec::new(),
    };

    for batch in try_coalesce(items, max_size, A::sizer)? {
        let batch = batch?;
        let (count, size) = (batch.len(), batch.size());
        let name = namer.next_name(format);

        let mut pending = sink.create(&name)?;
        adapter.stream_out(batch.into_items(), &mut pending, &name)?;
        let location = pending.commit()?;

        debug!(
            output = %name,
            items = count,
            payload_bytes = size,
            "committed merged chunk"
        );
        metrics::counter!(m::COALESCER_OUTPUTS_TOTAL, m::LABEL_FORMAT => format.as_str())
            .increment(1);
        metrics::histogram!(m::COALESCER_CHUNK_SIZE_BYTES, m::LABEL_FORMAT => format.as_str())
            .record(size as f64);

        report.items += count;
        report.payload_bytes += size;
        report.outputs.push(OutputBlob {
            name,
            location,
            items: count,
            payload_bytes: size,
        });
    }

    report.inputs = inputs.get();
    Ok(report)
}
