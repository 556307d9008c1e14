//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않은 경우 기록은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logcentral_`
//! - 모듈명: `coalescer_`, `ism_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), `_bytes` (histogram/size)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logcentral_core::metrics::COALESCER_OUTPUTS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 입력/출력 형식 레이블 키 (table, text, gzip)
pub const LABEL_FORMAT: &str = "format";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Coalescer 메트릭 ───────────────────────────────────────────────

/// Coalescer: 읽은 입력 blob 수 (counter, label: format)
pub const COALESCER_INPUTS_TOTAL: &str = "logcentral_coalescer_inputs_total";

/// Coalescer: 생성된 출력 blob 수 (counter, label: format)
pub const COALESCER_OUTPUTS_TOTAL: &str = "logcentral_coalescer_outputs_total";

/// Coalescer: 병합 실행 수 (counter, labels: format, result)
pub const COALESCER_MERGES_TOTAL: &str = "logcentral_coalescer_merges_total";

/// Coalescer: 출력 청크 크기 (histogram, 바이트)
pub const COALESCER_CHUNK_SIZE_BYTES: &str = "logcentral_coalescer_chunk_size_bytes";

/// Coalescer: 병합 소요 시간 (histogram, 초)
pub const COALESCER_MERGE_DURATION_SECONDS: &str = "logcentral_coalescer_merge_duration_seconds";

// ─── ISM 메트릭 ─────────────────────────────────────────────────────

/// ISM: 생성된 정책 문서 수 (counter)
pub const ISM_POLICIES_GENERATED_TOTAL: &str = "logcentral_ism_policies_generated_total";

/// ISM: 수행된 상태 전환 수 (counter)
pub const ISM_TRANSITIONS_TOTAL: &str = "logcentral_ism_transitions_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    // Coalescer
    describe_counter!(
        COALESCER_INPUTS_TOTAL,
        "Total number of input blobs read by the coalescer"
    );
    describe_counter!(
        COALESCER_OUTPUTS_TOTAL,
        "Total number of merged output blobs committed"
    );
    describe_counter!(
        COALESCER_MERGES_TOTAL,
        "Total number of merge runs by format and result"
    );
    describe_histogram!(
        COALESCER_CHUNK_SIZE_BYTES,
        "Cumulative item size of each emitted chunk in bytes"
    );
    describe_histogram!(
        COALESCER_MERGE_DURATION_SECONDS,
        "Time to complete a single merge run in seconds"
    );

    // ISM
    describe_counter!(
        ISM_POLICIES_GENERATED_TOTAL,
        "Total number of lifecycle policy documents generated"
    );
    describe_counter!(
        ISM_TRANSITIONS_TOTAL,
        "Total number of lifecycle state transitions computed"
    );
}
