#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`chunk`]: 형식과 무관한 크기 기반 청크 분할 알고리즘 (`coalesce`)
//! - [`format`]: 형식별 어댑터 (Parquet 테이블, 텍스트, gzip)
//! - [`storage`]: blob 소스/싱크 추상화와 로컬 디렉토리 구현
//! - [`merge`]: 소스 -> 청크 -> 싱크 병합 실행 (`merge`)
//! - [`coalescer`]: 설정 기반 병합 파사드
//! - [`error`]: 도메인 에러 타입

pub mod chunk;
pub mod coalescer;
pub mod error;
pub mod format;
pub mod merge;
pub mod storage;

// --- 주요 타입 re-export ---

pub use chunk::{Batch, Coalesce, TryCoalesce, coalesce, try_coalesce};
pub use coalescer::Coalescer;
pub use error::CoalescerError;
pub use format::Format;
pub use merge::{MergeReport, OutputBlob, OutputNamer, merge, merge_with_namer};
pub use storage::{Blob, BlobSink, BlobSource, DirSink, DirSource, PendingBlob};
